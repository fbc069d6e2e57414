use super::*;
use crate::location::MemoryLocation;
use crate::request::{MockHttpClient, ReqwestHttpClient};
use crate::store::MemoryStore;
use serde_json::json;
use talkboard_shared::{CODE_OK, CODE_UNKNOWN, Id, SessionUser};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

const BASE: &str = "http://api.test";

struct Harness {
    http: Rc<MockHttpClient>,
    users: Rc<UserStore>,
    location: MemoryLocation,
    client: ApiClient<Rc<MockHttpClient>>,
}

fn harness() -> Harness {
    let http = Rc::new(MockHttpClient::new());
    let users = Rc::new(UserStore::new(MemoryStore::new(), "user"));
    let location = MemoryLocation::new("/posts");
    let client = ApiClient::new(
        ClientConfig::new(BASE).unwrap(),
        http.clone(),
        users.clone(),
        Rc::new(location.clone()),
    );
    Harness {
        http,
        users,
        location,
        client,
    }
}

fn url(path: &str) -> String {
    format!("{}{}", BASE, path)
}

fn sample_user() -> SessionUser {
    SessionUser {
        user_id: Id::Number(1),
        email: "a@b.com".to_string(),
        nickname: "n".to_string(),
        profile_image_url: None,
    }
}

// =========================================================
// 归一化 (normalize)
// =========================================================

#[test]
fn normalize_never_leaks_raw_bodies() {
    let statuses = [200, 201, 204, 400, 401, 403, 404, 409, 500, 502];
    let bodies = [
        "",
        "   ",
        "<html>oops</html>",
        "{broken",
        "null",
        "[1,2]",
        r#"{"code":"X"}"#,
        r#"{"data":{"a":1}}"#,
        r#"{"detail":"Not authenticated"}"#,
        r#"{"detail":{"code":"D"}}"#,
        r#"{"code":123}"#,
    ];

    for status in statuses {
        for body in bodies {
            match normalize(status, body) {
                Ok(envelope) => {
                    assert!((200..300).contains(&status), "{} {}", status, body);
                    assert!(!envelope.code.is_empty());
                }
                Err(err) => {
                    assert!(!(200..300).contains(&status), "{} {}", status, body);
                    assert_eq!(err.status, status);
                    assert!(!err.message.is_empty());
                }
            }
        }
    }
}

#[test]
fn status_204_ignores_body() {
    assert_eq!(normalize(204, ""), Ok(Envelope::ok()));
    assert_eq!(normalize(204, r#"{"code":"DELETED"}"#), Ok(Envelope::ok()));
    assert_eq!(normalize(204, "garbage"), Ok(Envelope::ok()));
}

#[test]
fn success_envelope_is_passed_through() {
    let envelope = normalize(200, r#"{"code":"LOGIN_OK","data":{"userId":1}}"#).unwrap();
    assert_eq!(envelope.code, "LOGIN_OK");
    assert_eq!(envelope.data, json!({"userId": 1}));
}

#[test]
fn success_without_code_defaults_to_ok() {
    let envelope = normalize(200, r#"{"data":[1,2]}"#).unwrap();
    assert_eq!(envelope.code, CODE_OK);
    assert_eq!(envelope.data, json!([1, 2]));

    // 非信封形态整体作为 data
    let envelope = normalize(200, r#"[{"postId":1}]"#).unwrap();
    assert_eq!(envelope.code, CODE_OK);
    assert_eq!(envelope.data, json!([{"postId": 1}]));
}

#[test]
fn success_with_unparseable_body_is_ok() {
    assert_eq!(normalize(200, "not json"), Ok(Envelope::ok()));
    assert_eq!(normalize(201, ""), Ok(Envelope::ok()));
}

#[test]
fn failure_message_precedence() {
    let err = normalize(404, r#"{"code":"POST_NOT_FOUND","detail":"x"}"#).unwrap_err();
    assert_eq!(err.message, "POST_NOT_FOUND");
    assert_eq!(err.code.as_deref(), Some("POST_NOT_FOUND"));

    let err = normalize(401, r#"{"detail":"Not authenticated"}"#).unwrap_err();
    assert_eq!(err.message, "Not authenticated");
    assert_eq!(err.code, None);

    let err = normalize(422, r#"{"detail":{"code":"INVALID_EMAIL"}}"#).unwrap_err();
    assert_eq!(err.message, "INVALID_EMAIL");
    assert_eq!(err.code.as_deref(), Some("INVALID_EMAIL"));

    let err = normalize(500, r#"{"something":"else"}"#).unwrap_err();
    assert_eq!(err.message, "HTTP 500");
    assert_eq!(err.code, None);
}

#[test]
fn failure_with_unparseable_body_is_unknown() {
    let err = normalize(502, "<html>Bad Gateway</html>").unwrap_err();
    assert_eq!(err.code.as_deref(), Some(CODE_UNKNOWN));
    assert_eq!(err.message, CODE_UNKNOWN);
    assert_eq!(err.status, 502);
}

#[test]
fn into_data_reports_shape_mismatch() {
    let envelope = normalize(200, r#"{"code":"OK","data":{"postId":"x"}}"#).unwrap();
    let err = envelope.into_data::<Vec<String>>().unwrap_err();
    assert!(matches!(err, ClientError::Decode(_)));

    assert_eq!(Envelope::ok().into_optional_data::<String>(), Ok(None));
}

// =========================================================
// 请求构建
// =========================================================

#[tokio::test]
async fn json_requests_carry_credentials_and_content_type() {
    let h = harness();
    h.http.mock_json(
        HttpMethod::Post,
        &url("/posts"),
        201,
        json!({"code": "POST_CREATED", "data": {"postId": 9}}),
    );

    let envelope = h.client.post("/posts", &json!({"title": "t"})).await.unwrap();
    assert_eq!(envelope.code, "POST_CREATED");

    let req = h.http.last_request().unwrap();
    assert!(req.with_credentials);
    assert_eq!(
        req.headers.get("Content-Type").map(String::as_str),
        Some("application/json")
    );
    assert_eq!(req.body, RequestBody::Json(r#"{"title":"t"}"#.to_string()));
}

#[tokio::test]
async fn multipart_requests_do_not_force_content_type() {
    let h = harness();
    h.http.mock_json(
        HttpMethod::Post,
        &url("/files"),
        201,
        json!({"code": "FILE_UPLOADED", "data": {"fileId": 3, "fileUrl": "/f/3.png"}}),
    );

    let form = MultipartForm::new().file("file", "a.png", "image/png", vec![1, 2, 3]);
    h.client.post_form("/files", form).await.unwrap();

    let req = h.http.last_request().unwrap();
    assert!(req.with_credentials);
    assert!(!req.headers.contains_key("Content-Type"));
    assert!(matches!(req.body, RequestBody::Multipart(ref f) if f.parts.len() == 1));
}

#[tokio::test]
async fn delete_with_204_yields_ok_envelope() {
    let h = harness();
    h.http
        .mock_response(HttpMethod::Delete, &url("/posts/1"), 204, "ignored");
    let envelope = h.client.delete("/posts/1").await.unwrap();
    assert_eq!(envelope, Envelope::ok());
}

#[tokio::test]
async fn patch_uses_the_same_envelope_and_session_rules() {
    let h = harness();
    h.users.set_user(sample_user());
    h.http
        .mock_response(HttpMethod::Patch, &url("/users/me"), 204, "garbage");

    let envelope = h
        .client
        .patch("/users/me", &json!({"nickname": "m"}))
        .await
        .unwrap();
    assert_eq!(envelope, Envelope::ok());

    let req = h.http.last_request().unwrap();
    assert_eq!(req.method, HttpMethod::Patch);
    assert!(req.with_credentials);
    assert_eq!(
        req.headers.get("Content-Type").map(String::as_str),
        Some("application/json")
    );
    assert_eq!(req.body, RequestBody::Json(r#"{"nickname":"m"}"#.to_string()));

    h.http.mock_json(
        HttpMethod::Patch,
        &url("/users/me"),
        401,
        json!({"detail": {"code": "X"}}),
    );
    let err = h
        .client
        .patch("/users/me", &json!({"nickname": "m"}))
        .await
        .unwrap_err();
    assert_eq!(err.code(), Some("X"));
    assert_eq!(err.status(), Some(401));
    assert!(!h.users.is_logged_in());
    assert_eq!(h.location.fragment(), "/login");
}

#[tokio::test]
async fn network_failure_surfaces_as_network_error() {
    let h = harness();
    h.users.set_user(sample_user());
    h.http.mock_network_error(HttpMethod::Get, &url("/posts/1"));

    let err = h.client.get("/posts/1").await.unwrap_err();
    assert!(matches!(err, ClientError::Network(_)));
    // 网络错误不影响会话
    assert!(h.users.is_logged_in());
    assert!(h.location.history().is_empty());
}

#[tokio::test]
async fn failures_are_not_retried() {
    let h = harness();
    h.http.mock_json(
        HttpMethod::Get,
        &url("/posts/1"),
        500,
        json!({"code": "INTERNAL"}),
    );
    let err = h.client.get("/posts/1").await.unwrap_err();
    assert_eq!(err.code(), Some("INTERNAL"));
    assert_eq!(err.status(), Some(500));
    assert_eq!(h.http.request_count(), 1);
}

// =========================================================
// 401 处理
// =========================================================

#[tokio::test]
async fn unauthorized_clears_user_and_redirects_each_time() {
    let h = harness();
    h.users.set_user(sample_user());
    h.http.mock_json(
        HttpMethod::Get,
        &url("/users/me"),
        401,
        json!({"detail": "Not authenticated"}),
    );

    let first = h.client.get("/users/me").await.unwrap_err();
    assert_eq!(first.status(), Some(401));
    assert!(!h.users.is_logged_in());
    assert_eq!(h.location.fragment(), "/login");

    // 第二次 401：身份已为空，依然清除并跳转，不报错
    h.location.set_fragment("/posts");
    let second = h.client.get("/users/me").await.unwrap_err();
    assert_eq!(second.status(), Some(401));
    assert!(!h.users.is_logged_in());
    assert_eq!(h.location.fragment(), "/login");
    assert_eq!(
        h.location.history(),
        vec!["/login".to_string(), "/posts".to_string(), "/login".to_string()]
    );
}

#[tokio::test]
async fn session_redirect_can_be_suppressed() {
    let h = harness();
    h.users.set_user(sample_user());
    h.http.mock_json(
        HttpMethod::Post,
        &url("/auth/login"),
        401,
        json!({"code": "INVALID_CREDENTIALS"}),
    );

    let err = h
        .client
        .without_session_redirect()
        .post("/auth/login", &json!({"email": "a@b.com", "password": "x"}))
        .await
        .unwrap_err();

    assert_eq!(err.code(), Some("INVALID_CREDENTIALS"));
    assert!(h.users.is_logged_in());
    assert_eq!(h.location.fragment(), "/posts");
    assert!(h.location.history().is_empty());

    // 原客户端不受影响
    h.http.mock_json(HttpMethod::Get, &url("/users/me"), 401, json!({}));
    h.client.get("/users/me").await.unwrap_err();
    assert!(!h.users.is_logged_in());
}

// =========================================================
// 真实 HTTP（Cookie 会话）
// =========================================================

/// 极简 HTTP 服务：第一次请求下发 Cookie，之后只有带上 Cookie 的请求才返回 200
async fn serve_session(listener: TcpListener) {
    for _ in 0..2 {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
        }
        let request = String::from_utf8_lossy(&buf).to_ascii_lowercase();

        let response = if request.starts_with("get /auth/session") {
            let body = r#"{"code":"LOGIN_OK","data":null}"#;
            format!(
                "HTTP/1.1 200 OK\r\nSet-Cookie: sid=abc; Path=/\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                body.len(),
                body
            )
        } else if request.contains("cookie: sid=abc") {
            let body = r#"{"code":"OK","data":{"userId":1,"email":"a@b.com","nickname":"n"}}"#;
            format!(
                "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                body.len(),
                body
            )
        } else {
            let body = r#"{"detail":"Not authenticated"}"#;
            format!(
                "HTTP/1.1 401 Unauthorized\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                body.len(),
                body
            )
        };
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.unwrap();
    }
}

#[tokio::test]
async fn reqwest_transport_forwards_session_cookie() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    let server = tokio::spawn(serve_session(listener));

    let users = Rc::new(UserStore::new(MemoryStore::new(), "user"));
    let location = MemoryLocation::new("/posts");
    let client = ApiClient::new(
        ClientConfig::new(&base).unwrap(),
        ReqwestHttpClient::new(),
        users.clone(),
        Rc::new(location.clone()),
    );

    let login = client.get("/auth/session").await.unwrap();
    assert_eq!(login.code, "LOGIN_OK");

    let me: SessionUser = client.get("/users/me").await.unwrap().into_data().unwrap();
    assert_eq!(me, sample_user());
    assert!(location.history().is_empty());

    server.await.unwrap();
}

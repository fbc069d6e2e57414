//! 论坛 API
//!
//! 在 `ApiClient` 之上为每个后端接口提供带类型的方法，
//! 并负责与会话相关的副作用（登录写入用户、登出/注销清除用户）。

use std::fmt::Display;

use talkboard_shared::protocol::endpoints;
use talkboard_shared::{
    ChangePasswordRequest, Comment, CommentRequest, Id, LikeSummary, LoginRequest, PostCreated,
    PostDetail, PostDraft, PostListPayload, PostSummary, SessionUser, SignupRequest,
    UpdateProfileRequest, UploadedFile,
};

use crate::client::ApiClient;
use crate::error::{ClientError, ClientResult};
use crate::request::{HttpClient, MultipartForm};

/// 重复点赞
pub const CODE_ALREADY_LIKED: &str = "ALREADY_LIKED";
/// 取消不存在的点赞
pub const CODE_LIKE_NOT_FOUND: &str = "LIKE_NOT_FOUND";

/// 帖子列表的一页
#[derive(Debug, Clone, PartialEq)]
pub struct PostPage {
    pub page: u32,
    pub posts: Vec<PostSummary>,
    pub has_more: bool,
}

/// 点赞切换后的状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LikeState {
    pub liked: bool,
    /// 服务端返回的最新点赞数（未返回时由调用方自行增减）
    pub like_count: Option<u64>,
}

pub struct BoardApi<C> {
    client: ApiClient<C>,
}

impl<C> Clone for BoardApi<C> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
        }
    }
}

impl<C: HttpClient> BoardApi<C> {
    pub fn new(client: ApiClient<C>) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &ApiClient<C> {
        &self.client
    }

    // =========================================================
    // 账号
    // =========================================================

    /// 登录；成功后写入会话用户
    pub async fn login(&self, email: &str, password: &str) -> ClientResult<SessionUser> {
        let req = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let user: SessionUser = self
            .client
            .without_session_redirect()
            .post(endpoints::LOGIN, &req)
            .await?
            .into_data()?;

        tracing::info!(user_id = %user.user_id, "logged in");
        self.client.users().set_user(user.clone());
        Ok(user)
    }

    pub async fn signup(&self, req: &SignupRequest) -> ClientResult<()> {
        self.client
            .without_session_redirect()
            .post(endpoints::SIGNUP, req)
            .await?;
        Ok(())
    }

    /// 登出；无论服务端是否成功，本地会话都会被清除
    pub async fn logout(&self) -> ClientResult<()> {
        let result = self
            .client
            .without_session_redirect()
            .post_empty(endpoints::LOGOUT)
            .await;
        self.client.users().clear_user();
        if let Err(e) = &result {
            tracing::warn!(error = %e, "server logout failed, local session cleared");
        }
        result.map(|_| ())
    }

    /// 从服务端刷新当前用户并覆盖本地记录
    pub async fn refresh_me(&self) -> ClientResult<SessionUser> {
        let user: SessionUser = self.client.get(endpoints::ME).await?.into_data()?;
        self.client.users().set_user(user.clone());
        Ok(user)
    }

    /// 修改昵称/头像
    ///
    /// 服务端返回了用户就以它为准，否则把修改合并到本地记录。
    pub async fn update_profile(&self, req: &UpdateProfileRequest) -> ClientResult<()> {
        let envelope = self.client.put(endpoints::ME, req).await?;
        match envelope.into_optional_data::<SessionUser>() {
            Ok(Some(user)) => self.client.users().set_user(user),
            Ok(None) | Err(_) => self.client.users().update_user(|user| {
                user.nickname = req.nickname.clone();
                if req.profile_image_url.is_some() {
                    user.profile_image_url = req.profile_image_url.clone();
                }
            }),
        }
        Ok(())
    }

    pub async fn change_password(&self, new_password: &str) -> ClientResult<()> {
        let req = ChangePasswordRequest {
            new_password: new_password.to_string(),
        };
        self.client.put(endpoints::PASSWORD, &req).await?;
        Ok(())
    }

    /// 注销账号；成功后清除会话
    pub async fn delete_account(&self) -> ClientResult<()> {
        self.client.delete(endpoints::ME).await?;
        tracing::info!("account deleted");
        self.client.users().clear_user();
        Ok(())
    }

    // =========================================================
    // 文件
    // =========================================================

    pub async fn upload_image(
        &self,
        file_name: &str,
        mime: &str,
        bytes: Vec<u8>,
    ) -> ClientResult<UploadedFile> {
        let form = MultipartForm::new().file(endpoints::FILE_FIELD, file_name, mime, bytes);
        self.client
            .post_form(endpoints::FILES, form)
            .await?
            .into_data()
    }

    // =========================================================
    // 帖子
    // =========================================================

    /// 读取第 `page` 页（从 1 开始）
    pub async fn list_posts(&self, page: u32) -> ClientResult<PostPage> {
        let size = self.client.config().page_size;
        let payload: Option<PostListPayload> = self
            .client
            .get(&endpoints::posts_page(page, size))
            .await?
            .into_optional_data()?;

        let (posts, has_next) = match payload {
            Some(PostListPayload::Items(posts)) => (posts, None),
            Some(PostListPayload::Paged { posts, has_next }) => (posts, has_next),
            None => (Vec::new(), None),
        };
        // 没有 hasNext 时，满页即认为还有下一页
        let has_more = has_next.unwrap_or(posts.len() as u32 >= size);

        Ok(PostPage {
            page,
            posts,
            has_more,
        })
    }

    pub async fn create_post(&self, draft: &PostDraft) -> ClientResult<Id> {
        let created: PostCreated = self
            .client
            .post(endpoints::POSTS, draft)
            .await?
            .into_data()?;
        Ok(created.post_id)
    }

    pub async fn get_post(&self, id: impl Display) -> ClientResult<PostDetail> {
        self.client.get(&endpoints::post(id)).await?.into_data()
    }

    pub async fn update_post(&self, id: impl Display, draft: &PostDraft) -> ClientResult<()> {
        self.client.put(&endpoints::post(id), draft).await?;
        Ok(())
    }

    pub async fn delete_post(&self, id: impl Display) -> ClientResult<()> {
        self.client.delete(&endpoints::post(id)).await?;
        Ok(())
    }

    /// 记录一次浏览
    pub async fn record_view(&self, id: impl Display) -> ClientResult<()> {
        self.client.post_empty(&endpoints::post_views(id)).await?;
        Ok(())
    }

    // =========================================================
    // 点赞
    // =========================================================

    /// 按当前状态切换点赞
    ///
    /// 本地状态与服务端不一致（`ALREADY_LIKED` / `LIKE_NOT_FOUND`）时改走相反的操作。
    pub async fn toggle_like(&self, id: impl Display, liked: bool) -> ClientResult<LikeState> {
        let path = endpoints::post_like(id);
        let (first, fallback_code) = if liked {
            (self.unlike(&path).await, CODE_LIKE_NOT_FOUND)
        } else {
            (self.like(&path).await, CODE_ALREADY_LIKED)
        };

        match first {
            Ok(like_count) => Ok(LikeState {
                liked: !liked,
                like_count,
            }),
            Err(e) if e.code() == Some(fallback_code) => {
                tracing::debug!(code = fallback_code, "like state out of sync, reversing");
                let like_count = if liked {
                    self.like(&path).await?
                } else {
                    self.unlike(&path).await?
                };
                Ok(LikeState {
                    liked,
                    like_count,
                })
            }
            Err(e) => Err(e),
        }
    }

    async fn like(&self, path: &str) -> ClientResult<Option<u64>> {
        let envelope = self.client.post_empty(path).await?;
        Ok(like_count(envelope.into_optional_data::<LikeSummary>()))
    }

    async fn unlike(&self, path: &str) -> ClientResult<Option<u64>> {
        let envelope = self.client.delete(path).await?;
        Ok(like_count(envelope.into_optional_data::<LikeSummary>()))
    }

    // =========================================================
    // 评论
    // =========================================================

    pub async fn list_comments(&self, post_id: impl Display) -> ClientResult<Vec<Comment>> {
        let comments: Option<Vec<Comment>> = self
            .client
            .get(&endpoints::post_comments(post_id))
            .await?
            .into_optional_data()?;
        Ok(comments.unwrap_or_default())
    }

    pub async fn create_comment(&self, post_id: impl Display, content: &str) -> ClientResult<()> {
        let req = CommentRequest {
            content: content.to_string(),
        };
        self.client
            .post(&endpoints::post_comments(post_id), &req)
            .await?;
        Ok(())
    }

    pub async fn update_comment(&self, comment_id: impl Display, content: &str) -> ClientResult<()> {
        let req = CommentRequest {
            content: content.to_string(),
        };
        self.client.put(&endpoints::comment(comment_id), &req).await?;
        Ok(())
    }

    pub async fn delete_comment(&self, comment_id: impl Display) -> ClientResult<()> {
        self.client.delete(&endpoints::comment(comment_id)).await?;
        Ok(())
    }
}

// 点赞数只是附带信息，解析不了就交给调用方本地增减
fn like_count(summary: Result<Option<LikeSummary>, ClientError>) -> Option<u64> {
    summary.ok().flatten().and_then(|s| s.like_count)
}

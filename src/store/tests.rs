use super::*;
use std::cell::Cell;
use talkboard_shared::Id;

const KEY: &str = "user";

fn sample_user() -> SessionUser {
    SessionUser {
        user_id: Id::Number(1),
        email: "a@b.com".to_string(),
        nickname: "n".to_string(),
        profile_image_url: Some("/img/me.png".to_string()),
    }
}

// =========================================================
// 基本读写
// =========================================================

#[test]
fn starts_logged_out() {
    let store = UserStore::new(MemoryStore::new(), KEY);
    assert!(!store.is_logged_in());
    assert!(store.get_user().is_none());
}

#[test]
fn set_user_marks_logged_in_and_persists() {
    let storage = MemoryStore::new();
    let store = UserStore::new(storage.clone(), KEY);

    store.set_user(sample_user());

    assert!(store.is_logged_in());
    assert_eq!(store.get_user(), Some(sample_user()));
    let raw = storage.get(KEY).unwrap();
    let persisted: SessionUser = serde_json::from_str(&raw).unwrap();
    assert_eq!(persisted, sample_user());
}

#[test]
fn clear_user_removes_record_and_key() {
    let storage = MemoryStore::new();
    let store = UserStore::new(storage.clone(), KEY);
    store.set_user(sample_user());

    store.clear_user();

    assert!(!store.is_logged_in());
    assert!(!storage.contains(KEY));
    // 再次清除不应出错
    store.clear_user();
    assert!(!store.is_logged_in());
}

// =========================================================
// 恢复
// =========================================================

#[test]
fn restore_after_restart_returns_equal_user() {
    let storage = MemoryStore::new();
    {
        let before_restart = UserStore::new(storage.clone(), KEY);
        before_restart.set_user(sample_user());
    }

    let after_restart = UserStore::new(storage.clone(), KEY);
    assert!(!after_restart.is_logged_in());

    let restored = after_restart.restore_user();
    assert_eq!(restored, Some(sample_user()));
    assert!(after_restart.is_logged_in());
    assert_eq!(after_restart.get_user(), Some(sample_user()));
}

#[test]
fn restore_with_corrupted_record_logs_out_and_clears_key() {
    let storage = MemoryStore::new();
    storage.insert_raw(KEY, "{not json");
    let store = UserStore::new(storage.clone(), KEY);

    assert_eq!(store.restore_user(), None);
    assert!(!store.is_logged_in());
    assert!(!storage.contains(KEY));
}

#[test]
fn restore_with_wrong_shape_is_treated_as_absent() {
    let storage = MemoryStore::new();
    storage.insert_raw(KEY, r#"{"nickname":"only"}"#);
    let store = UserStore::new(storage.clone(), KEY);

    assert_eq!(store.restore_user(), None);
    assert!(!storage.contains(KEY));
}

#[test]
fn restore_without_record_is_none() {
    let store = UserStore::new(MemoryStore::new(), KEY);
    assert_eq!(store.restore_user(), None);
    assert!(!store.is_logged_in());
}

#[test]
fn custom_key_is_honored() {
    let storage = MemoryStore::new();
    let store = UserStore::new(storage.clone(), "board_user");
    store.set_user(sample_user());
    assert!(storage.contains("board_user"));
    assert!(!storage.contains(KEY));
}

// =========================================================
// 更新与订阅
// =========================================================

#[test]
fn update_user_writes_through() {
    let storage = MemoryStore::new();
    let store = UserStore::new(storage.clone(), KEY);
    store.set_user(sample_user());

    store.update_user(|u| u.nickname = "renamed".to_string());

    assert_eq!(store.get_user().unwrap().nickname, "renamed");
    let persisted: SessionUser = serde_json::from_str(&storage.get(KEY).unwrap()).unwrap();
    assert_eq!(persisted.nickname, "renamed");
}

#[test]
fn update_user_without_user_is_noop() {
    let storage = MemoryStore::new();
    let store = UserStore::new(storage.clone(), KEY);
    store.update_user(|u| u.nickname = "ghost".to_string());
    assert!(!store.is_logged_in());
    assert!(!storage.contains(KEY));
}

#[test]
fn subscribers_see_every_mutation() {
    let store = UserStore::new(MemoryStore::new(), KEY);
    let calls = Rc::new(Cell::new(0));
    let last_logged_in = Rc::new(Cell::new(false));
    {
        let calls = calls.clone();
        let last_logged_in = last_logged_in.clone();
        store.subscribe(move |user| {
            calls.set(calls.get() + 1);
            last_logged_in.set(user.is_some());
        });
    }

    store.set_user(sample_user());
    assert_eq!(calls.get(), 1);
    assert!(last_logged_in.get());

    store.clear_user();
    assert_eq!(calls.get(), 2);
    assert!(!last_logged_in.get());
}

/// 存储不可用（写入失败）时，内存中的会话仍然有效
#[test]
fn unavailable_storage_degrades_softly() {
    struct BrokenStore;
    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> Option<String> {
            None
        }
        fn set(&self, _key: &str, _value: &str) -> bool {
            false
        }
        fn delete(&self, _key: &str) -> bool {
            false
        }
    }

    let store = UserStore::new(BrokenStore, KEY);
    store.set_user(sample_user());
    assert!(store.is_logged_in());
    assert_eq!(store.restore_user(), None);
    store.clear_user();
    assert!(!store.is_logged_in());
}

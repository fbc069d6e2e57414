//! 启动装配
//!
//! 进程启动时只构造一次：恢复会话用户，再把同一个 `UserStore`
//! 注入访问层，由调用方继续交给路由器和页面。

use std::rc::Rc;

use crate::api::BoardApi;
use crate::client::ApiClient;
use crate::config::ClientConfig;
use crate::location::Location;
use crate::request::HttpClient;
use crate::store::{KeyValueStore, UserStore};

pub struct Services<C> {
    pub users: Rc<UserStore>,
    pub location: Rc<dyn Location>,
    pub api: BoardApi<C>,
}

impl<C> Clone for Services<C> {
    fn clone(&self) -> Self {
        Self {
            users: self.users.clone(),
            location: self.location.clone(),
            api: self.api.clone(),
        }
    }
}

impl<C: HttpClient> Services<C> {
    pub fn start(
        config: ClientConfig,
        http: C,
        storage: impl KeyValueStore + 'static,
        location: Rc<dyn Location>,
    ) -> Self {
        let users = Rc::new(UserStore::new(storage, config.user_storage_key.clone()));
        match users.restore_user() {
            Some(user) => tracing::info!(user_id = %user.user_id, "session restored"),
            None => tracing::debug!("no stored session"),
        }

        tracing::debug!(base_url = %config.base_url, page_size = config.page_size, "client configured");
        let client = ApiClient::new(config, http, users.clone(), location.clone());

        Self {
            users,
            location,
            api: BoardApi::new(client),
        }
    }
}

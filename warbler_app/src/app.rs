use crate::config::Config;
use warbler_db::{follow::SqliteFollowRepo, message::SqliteMessageRepo, user::SqliteUserRepo};
use warbler_db::{Db, GetDb};
use warbler_domain::{GetConfig, System};

use std::sync::Arc;
use time::OffsetDateTime;

#[derive(Clone)]
pub struct App {
    pub config: Arc<Config>,
    pub db: Db,
}

impl System for App {
    fn get_current_time(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }
}

impl GetConfig for App {
    fn get_session_signing_key(&self) -> &hmac::Hmac<sha2::Sha384> {
        &self.config.session_signing_key.0
    }
}

impl GetDb for App {
    fn get_db(&self) -> &Db {
        &self.db
    }
}

impl warbler_domain::user::repo::DelegateUserRepo<Self> for App {
    type Target = SqliteUserRepo;
}

impl warbler_domain::follow::repo::DelegateFollowRepo<Self> for App {
    type Target = SqliteFollowRepo;
}

impl warbler_domain::message::repo::DelegateMessageRepo<Self> for App {
    type Target = SqliteMessageRepo;
}

#[cfg(test)]
pub mod test {
    use super::*;

    /// A real app on a fresh in-memory database.
    pub async fn test_app() -> App {
        App {
            config: Arc::new(Config {
                database_url: "sqlite::memory:".to_string(),
                session_signing_key: "foobar".parse().unwrap(),
                listen_addr: "127.0.0.1:0".parse().unwrap(),
            }),
            db: Db::in_memory().await.unwrap(),
        }
    }
}

use warbler_domain::error::WbError;

use anyhow::Context;
use entrait::entrait;
use sqlx::error::DatabaseError;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;

pub mod follow;
pub mod message;
pub mod user;

#[derive(Clone)]
pub struct Db {
    pub pool: SqlitePool,
}

impl Db {
    pub async fn init(url: &str) -> anyhow::Result<Self> {
        let options = SqliteConnectOptions::from_str(url)
            .context("malformed database_url")?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(8)
            .connect_with(options)
            .await
            .context("could not connect to database_url")?;

        sqlx::migrate!("../migrations").run(&pool).await?;
        tracing::info!("database migrated");

        Ok(Db { pool })
    }

    /// A fresh, migrated database living in memory.
    pub async fn in_memory() -> anyhow::Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

        // Every new connection to `:memory:` is a new empty database,
        // so the pool has to keep exactly one connection alive.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .context("could not open in-memory database")?;

        sqlx::migrate!("../migrations").run(&pool).await?;

        Ok(Db { pool })
    }
}

#[entrait]
pub trait GetDb {
    fn get_db(&self) -> &Db;
}

impl GetDb for Db {
    fn get_db(&self) -> &Db {
        self
    }
}

trait DbResultExt<T> {
    /// SQLite reports unique violations as `UNIQUE constraint failed: table.column`.
    fn on_unique_violation(
        self,
        column: &str,
        f: impl FnOnce(Box<dyn DatabaseError>) -> WbError,
    ) -> Result<T, WbError>;

    fn on_foreign_key_violation(
        self,
        f: impl FnOnce(Box<dyn DatabaseError>) -> WbError,
    ) -> Result<T, WbError>;
}

impl<T, E> DbResultExt<T> for Result<T, E>
where
    E: Into<WbError>,
{
    fn on_unique_violation(
        self,
        column: &str,
        map_err: impl FnOnce(Box<dyn DatabaseError>) -> WbError,
    ) -> Result<T, WbError> {
        self.map_err(|e| match e.into() {
            WbError::Sqlx(sqlx::Error::Database(dbe))
                if dbe.is_unique_violation() && dbe.message().contains(column) =>
            {
                map_err(dbe)
            }
            e => e,
        })
    }

    fn on_foreign_key_violation(
        self,
        map_err: impl FnOnce(Box<dyn DatabaseError>) -> WbError,
    ) -> Result<T, WbError> {
        self.map_err(|e| match e.into() {
            WbError::Sqlx(sqlx::Error::Database(dbe)) if dbe.is_foreign_key_violation() => {
                map_err(dbe)
            }
            e => e,
        })
    }
}

#[cfg(test)]
mod test_delegation {
    use super::*;

    impl warbler_domain::user::repo::DelegateUserRepo<Self> for Db {
        type Target = user::SqliteUserRepo;
    }

    impl warbler_domain::follow::repo::DelegateFollowRepo<Self> for Db {
        type Target = follow::SqliteFollowRepo;
    }

    impl warbler_domain::message::repo::DelegateMessageRepo<Self> for Db {
        type Target = message::SqliteMessageRepo;
    }
}

#[cfg(test)]
async fn create_test_db() -> entrait::Impl<Db> {
    entrait::Impl::new(
        Db::in_memory()
            .await
            .expect("failed to create test database"),
    )
}

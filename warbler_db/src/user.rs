use crate::DbResultExt;
use crate::GetDb;

use warbler_domain::error::{WbError, WbResult};
use warbler_domain::user::repo::*;
use warbler_domain::user::UserId;
use warbler_domain::PasswordHash;

use entrait::*;
use uuid::Uuid;

pub(crate) const USER_COLUMNS: &str =
    "user_id, username, email, password_hash, image_url, header_image_url, bio, location";

#[derive(sqlx::FromRow)]
pub(crate) struct UserRow {
    user_id: Uuid,
    username: String,
    email: String,
    password_hash: String,
    image_url: Option<String>,
    header_image_url: Option<String>,
    bio: Option<String>,
    location: Option<String>,
}

impl UserRow {
    pub(crate) fn into_user(self) -> User {
        self.into_user_and_credentials().0
    }

    fn into_user_and_credentials(self) -> (User, Credentials) {
        (
            User {
                user_id: UserId(self.user_id),
                username: self.username,
                image_url: self.image_url,
                header_image_url: self.header_image_url,
                bio: self.bio,
                location: self.location,
            },
            Credentials {
                email: self.email,
                password_hash: PasswordHash(self.password_hash),
            },
        )
    }
}

pub struct SqliteUserRepo;

#[entrait]
impl warbler_domain::user::repo::UserRepoImpl for SqliteUserRepo {
    pub async fn insert_user(
        deps: &impl GetDb,
        username: &str,
        email: &str,
        password_hash: PasswordHash,
        image_url: Option<&str>,
    ) -> WbResult<(User, Credentials)> {
        let mut tx = deps.get_db().pool.begin().await?;
        let user_id = Uuid::new_v4();

        sqlx::query(
            r#"INSERT INTO users (user_id, username, email, password_hash, image_url) VALUES (?, ?, ?, ?, ?)"#,
        )
        .bind(user_id)
        .bind(username)
        .bind(email)
        .bind(password_hash.as_ref())
        .bind(image_url)
        .execute(&mut *tx)
        .await
        .on_unique_violation("users.username", |_| WbError::UsernameTaken)
        .on_unique_violation("users.email", |_| WbError::EmailTaken)?;

        tx.commit().await?;

        Ok((
            User {
                user_id: UserId(user_id),
                username: username.to_string(),
                image_url: image_url.map(str::to_string),
                header_image_url: None,
                bio: None,
                location: None,
            },
            Credentials {
                email: email.to_string(),
                password_hash,
            },
        ))
    }

    pub async fn find_user_by_id(deps: &impl GetDb, user_id: UserId) -> WbResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE user_id = ?"
        ))
        .bind(user_id.0)
        .fetch_optional(&deps.get_db().pool)
        .await?;

        Ok(row.map(UserRow::into_user))
    }

    pub async fn find_user_credentials_by_id(
        deps: &impl GetDb,
        user_id: UserId,
    ) -> WbResult<Option<(User, Credentials)>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE user_id = ?"
        ))
        .bind(user_id.0)
        .fetch_optional(&deps.get_db().pool)
        .await?;

        Ok(row.map(UserRow::into_user_and_credentials))
    }

    pub async fn find_user_credentials_by_username(
        deps: &impl GetDb,
        username: &str,
    ) -> WbResult<Option<(User, Credentials)>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = ?"
        ))
        .bind(username)
        .fetch_optional(&deps.get_db().pool)
        .await?;

        Ok(row.map(UserRow::into_user_and_credentials))
    }

    pub async fn search_users(deps: &impl GetDb, query: Option<&str>) -> WbResult<Vec<User>> {
        let rows = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            SELECT {USER_COLUMNS} FROM users
            WHERE ? IS NULL OR username LIKE '%' || ? || '%'
            ORDER BY username
            "#
        ))
        .bind(query)
        .bind(query)
        .fetch_all(&deps.get_db().pool)
        .await?;

        Ok(rows.into_iter().map(UserRow::into_user).collect())
    }

    pub async fn update_user(
        deps: &impl GetDb,
        current_user_id: UserId,
        update: UserUpdate<'_>,
    ) -> WbResult<(User, Credentials)> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            UPDATE users SET
                username = COALESCE(?, username),
                email = COALESCE(?, email),
                image_url = COALESCE(?, image_url),
                header_image_url = COALESCE(?, header_image_url),
                bio = COALESCE(?, bio),
                location = COALESCE(?, location)
            WHERE user_id = ?
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(update.username)
        .bind(update.email)
        .bind(update.image_url)
        .bind(update.header_image_url)
        .bind(update.bio)
        .bind(update.location)
        .bind(current_user_id.0)
        .fetch_optional(&deps.get_db().pool)
        .await
        .on_unique_violation("users.username", |_| WbError::UsernameTaken)
        .on_unique_violation("users.email", |_| WbError::EmailTaken)?
        .ok_or(WbError::UserNotFound)?;

        Ok(row.into_user_and_credentials())
    }

    pub async fn delete_user(deps: &impl GetDb, user_id: UserId) -> WbResult<()> {
        let result = sqlx::query("DELETE FROM users WHERE user_id = ?")
            .bind(user_id.0)
            .execute(&deps.get_db().pool)
            .await?;

        if result.rows_affected() == 0 {
            Err(WbError::UserNotFound)
        } else {
            Ok(())
        }
    }
}

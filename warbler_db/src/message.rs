use crate::DbResultExt;
use crate::GetDb;

use warbler_domain::error::{WbError, WbResult};
use warbler_domain::message::Message;
use warbler_domain::timestamp::Timestamp;
use warbler_domain::UserId;

use entrait::*;
use uuid::Uuid;

// Timestamps are stored as RFC 3339 text with a variable-length fraction, which
// does not sort lexically, so listings order by `julianday(m.timestamp)`.
const MESSAGE_SELECT: &str = r#"
    SELECT m.message_id, m.text, m.timestamp, m.user_id, u.username, u.image_url
    FROM messages m
    JOIN users u ON u.user_id = m.user_id
"#;

#[derive(sqlx::FromRow)]
struct MessageRow {
    message_id: i64,
    text: String,
    timestamp: Timestamp,
    user_id: Uuid,
    username: String,
    image_url: Option<String>,
}

impl From<MessageRow> for Message {
    fn from(row: MessageRow) -> Self {
        Self {
            message_id: row.message_id,
            text: row.text,
            timestamp: row.timestamp,
            author: UserId(row.user_id),
            author_username: row.username,
            author_image_url: row.image_url,
        }
    }
}

pub struct SqliteMessageRepo;

#[entrait]
impl warbler_domain::message::repo::MessageRepoImpl for SqliteMessageRepo {
    pub async fn insert_message(
        deps: &impl GetDb,
        author: UserId,
        text: &str,
        timestamp: Timestamp,
    ) -> WbResult<Message> {
        let mut tx = deps.get_db().pool.begin().await?;

        let message_id: i64 = sqlx::query_scalar(
            r#"INSERT INTO messages (text, timestamp, user_id) VALUES (?, ?, ?) RETURNING message_id"#,
        )
        .bind(text)
        .bind(timestamp)
        .bind(author.0)
        .fetch_one(&mut *tx)
        .await
        .on_foreign_key_violation(|_| WbError::UserNotFound)?;

        let row = sqlx::query_as::<_, MessageRow>(&format!(
            "{MESSAGE_SELECT} WHERE m.message_id = ?"
        ))
        .bind(message_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(row.into())
    }

    pub async fn find_message(deps: &impl GetDb, message_id: i64) -> WbResult<Option<Message>> {
        let row = sqlx::query_as::<_, MessageRow>(&format!(
            "{MESSAGE_SELECT} WHERE m.message_id = ?"
        ))
        .bind(message_id)
        .fetch_optional(&deps.get_db().pool)
        .await?;

        Ok(row.map(Message::from))
    }

    pub async fn delete_message(
        deps: &impl GetDb,
        current_user: UserId,
        message_id: i64,
    ) -> WbResult<()> {
        let mut tx = deps.get_db().pool.begin().await?;

        let owner: Uuid = sqlx::query_scalar("SELECT user_id FROM messages WHERE message_id = ?")
            .bind(message_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(WbError::MessageNotFound)?;

        if owner != current_user.0 {
            return Err(WbError::Unauthorized);
        }

        sqlx::query("DELETE FROM messages WHERE message_id = ?")
            .bind(message_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(())
    }

    pub async fn list_messages_by_author(
        deps: &impl GetDb,
        author: UserId,
    ) -> WbResult<Vec<Message>> {
        let rows = sqlx::query_as::<_, MessageRow>(&format!(
            "{MESSAGE_SELECT} WHERE m.user_id = ? ORDER BY julianday(m.timestamp) DESC, m.message_id DESC"
        ))
        .bind(author.0)
        .fetch_all(&deps.get_db().pool)
        .await?;

        Ok(rows.into_iter().map(Message::from).collect())
    }

    pub async fn list_timeline(
        deps: &impl GetDb,
        user_id: UserId,
        limit: i64,
    ) -> WbResult<Vec<Message>> {
        let rows = sqlx::query_as::<_, MessageRow>(&format!(
            r#"
            {MESSAGE_SELECT}
            WHERE m.user_id = ?
               OR m.user_id IN (SELECT followee_id FROM follows WHERE follower_id = ?)
            ORDER BY julianday(m.timestamp) DESC, m.message_id DESC
            LIMIT ?
            "#
        ))
        .bind(user_id.0)
        .bind(user_id.0)
        .bind(limit)
        .fetch_all(&deps.get_db().pool)
        .await?;

        Ok(rows.into_iter().map(Message::from).collect())
    }
}

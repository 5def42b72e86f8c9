use crate::user::{UserRow, USER_COLUMNS};
use crate::DbResultExt;
use crate::GetDb;

use warbler_domain::error::{WbError, WbResult};
use warbler_domain::user::repo::User;
use warbler_domain::UserId;

use entrait::*;

pub struct SqliteFollowRepo;

#[entrait]
impl warbler_domain::follow::repo::FollowRepoImpl for SqliteFollowRepo {
    pub async fn insert_follow(
        deps: &impl GetDb,
        follower: UserId,
        followee: UserId,
    ) -> WbResult<()> {
        sqlx::query(
            r#"INSERT INTO follows (follower_id, followee_id) VALUES (?, ?) ON CONFLICT DO NOTHING"#,
        )
        .bind(follower.0)
        .bind(followee.0)
        .execute(&deps.get_db().pool)
        .await
        .on_foreign_key_violation(|_| WbError::UserNotFound)?;

        Ok(())
    }

    pub async fn delete_follow(
        deps: &impl GetDb,
        follower: UserId,
        followee: UserId,
    ) -> WbResult<()> {
        sqlx::query("DELETE FROM follows WHERE follower_id = ? AND followee_id = ?")
            .bind(follower.0)
            .bind(followee.0)
            .execute(&deps.get_db().pool)
            .await?;

        Ok(())
    }

    pub async fn follow_exists(
        deps: &impl GetDb,
        follower: UserId,
        followee: UserId,
    ) -> WbResult<bool> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM follows WHERE follower_id = ? AND followee_id = ?",
        )
        .bind(follower.0)
        .bind(followee.0)
        .fetch_one(&deps.get_db().pool)
        .await?;

        Ok(count > 0)
    }

    pub async fn list_following(deps: &impl GetDb, user_id: UserId) -> WbResult<Vec<User>> {
        let rows = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            SELECT {USER_COLUMNS} FROM users
            WHERE user_id IN (
                SELECT followee_id FROM follows
                WHERE follower_id = ? AND followee_id != follower_id
            )
            ORDER BY username
            "#
        ))
        .bind(user_id.0)
        .fetch_all(&deps.get_db().pool)
        .await?;

        Ok(rows.into_iter().map(UserRow::into_user).collect())
    }

    pub async fn list_followers(deps: &impl GetDb, user_id: UserId) -> WbResult<Vec<User>> {
        let rows = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            SELECT {USER_COLUMNS} FROM users
            WHERE user_id IN (
                SELECT follower_id FROM follows
                WHERE followee_id = ? AND followee_id != follower_id
            )
            ORDER BY username
            "#
        ))
        .bind(user_id.0)
        .fetch_all(&deps.get_db().pool)
        .await?;

        Ok(rows.into_iter().map(UserRow::into_user).collect())
    }
}

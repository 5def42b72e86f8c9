pub mod repo;

use crate::error::WbResult;
use crate::user::repo::User;
use crate::UserId;
use repo::FollowRepo;

use entrait::entrait;

#[entrait(pub FollowGraph)]
pub mod follow_graph {
    use super::*;

    /// Whether `follower` follows `followee`. Always false for a user and themselves.
    pub async fn is_following(
        deps: &impl FollowRepo,
        follower: UserId,
        followee: UserId,
    ) -> WbResult<bool> {
        edge_exists(deps, follower, followee).await
    }

    /// Whether `other` follows `user`.
    pub async fn is_followed_by(
        deps: &impl FollowRepo,
        user: UserId,
        other: UserId,
    ) -> WbResult<bool> {
        edge_exists(deps, other, user).await
    }

    pub async fn follow(deps: &impl FollowRepo, follower: UserId, followee: UserId) -> WbResult<()> {
        deps.insert_follow(follower, followee).await?;
        tracing::debug!(%follower, %followee, "follow");
        Ok(())
    }

    pub async fn unfollow(
        deps: &impl FollowRepo,
        follower: UserId,
        followee: UserId,
    ) -> WbResult<()> {
        deps.delete_follow(follower, followee).await?;
        tracing::debug!(%follower, %followee, "unfollow");
        Ok(())
    }

    pub async fn following_of(deps: &impl FollowRepo, user_id: UserId) -> WbResult<Vec<User>> {
        deps.list_following(user_id).await
    }

    pub async fn followers_of(deps: &impl FollowRepo, user_id: UserId) -> WbResult<Vec<User>> {
        deps.list_followers(user_id).await
    }

    async fn edge_exists(
        deps: &impl FollowRepo,
        follower: UserId,
        followee: UserId,
    ) -> WbResult<bool> {
        // A stored self edge is not a follow.
        if follower == followee {
            return Ok(false);
        }
        deps.follow_exists(follower, followee).await
    }
}

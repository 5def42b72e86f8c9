use entrait::entrait;

use crate::error::WbResult;
use crate::user::repo::User;
use crate::UserId;

#[entrait(FollowRepoImpl, delegate_by = DelegateFollowRepo)]
pub trait FollowRepo {
    /// Idempotent. `UserNotFound` when either side does not exist.
    async fn insert_follow(&self, follower: UserId, followee: UserId) -> WbResult<()>;

    /// Removing a missing edge is not an error.
    async fn delete_follow(&self, follower: UserId, followee: UserId) -> WbResult<()>;

    async fn follow_exists(&self, follower: UserId, followee: UserId) -> WbResult<bool>;

    /// Users followed by `user_id`, ordered by username.
    async fn list_following(&self, user_id: UserId) -> WbResult<Vec<User>>;

    /// Users following `user_id`, ordered by username.
    async fn list_followers(&self, user_id: UserId) -> WbResult<Vec<User>>;
}

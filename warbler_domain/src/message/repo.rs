use entrait::entrait;

use crate::error::WbResult;
use crate::timestamp::Timestamp;
use crate::UserId;

#[entrait(MessageRepoImpl, delegate_by = DelegateMessageRepo)]
pub trait MessageRepo {
    async fn insert_message(
        &self,
        author: UserId,
        text: &str,
        timestamp: Timestamp,
    ) -> WbResult<super::Message>;

    async fn find_message(&self, message_id: i64) -> WbResult<Option<super::Message>>;

    /// `MessageNotFound` when absent, `Unauthorized` when `current_user` is not the author.
    async fn delete_message(&self, current_user: UserId, message_id: i64) -> WbResult<()>;

    /// Newest first.
    async fn list_messages_by_author(&self, author: UserId) -> WbResult<Vec<super::Message>>;

    /// Messages by `user_id` and by everyone `user_id` follows, newest first.
    async fn list_timeline(&self, user_id: UserId, limit: i64) -> WbResult<Vec<super::Message>>;
}

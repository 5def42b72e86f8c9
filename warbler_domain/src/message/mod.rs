pub mod repo;

use crate::error::{WbError, WbResult};
use crate::timestamp::Timestamp;
use crate::{System, UserId};
use repo::MessageRepo;

use entrait::entrait;

pub const MAX_MESSAGE_LENGTH: usize = 140;

/// Messages shown on the home page.
pub const TIMELINE_LENGTH: i64 = 100;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Message {
    pub message_id: i64,
    pub text: String,
    pub timestamp: Timestamp,
    pub author: UserId,
    pub author_username: String,
    pub author_image_url: Option<String>,
}

#[derive(serde::Deserialize)]
pub struct NewMessage {
    #[serde(default)]
    pub text: String,
}

fn validate_text(text: &str) -> WbResult<&str> {
    let text = text.trim();
    if text.is_empty() {
        return Err(WbError::Invalid("Message text is required."));
    }
    if text.chars().count() > MAX_MESSAGE_LENGTH {
        return Err(WbError::Invalid(
            "Messages are limited to 140 characters.",
        ));
    }
    Ok(text)
}

#[entrait(pub CreateMessage)]
async fn create_message(
    deps: &(impl System + MessageRepo),
    author: UserId,
    text: &str,
) -> WbResult<Message> {
    let text = validate_text(text)?;
    deps.insert_message(author, text, Timestamp(deps.get_current_time()))
        .await
}

#[entrait(pub DeleteMessage)]
async fn delete_message(
    deps: &impl MessageRepo,
    current_user: UserId,
    message_id: i64,
) -> WbResult<()> {
    deps.delete_message(current_user, message_id).await
}

#[entrait(pub FetchMessage)]
async fn fetch_message(deps: &impl MessageRepo, message_id: i64) -> WbResult<Message> {
    deps.find_message(message_id)
        .await?
        .ok_or(WbError::MessageNotFound)
}

#[entrait(pub MessagesByOwner)]
async fn messages_by_owner(deps: &impl MessageRepo, owner: UserId) -> WbResult<Vec<Message>> {
    deps.list_messages_by_author(owner).await
}

#[entrait(pub Timeline)]
async fn timeline(deps: &impl MessageRepo, user_id: UserId) -> WbResult<Vec<Message>> {
    deps.list_timeline(user_id, TIMELINE_LENGTH).await
}

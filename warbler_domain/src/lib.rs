pub mod error;
pub mod flash;
pub mod follow;
pub mod message;
pub mod session;
pub mod timestamp;
pub mod user;

pub use user::password::PasswordHash;
pub use user::UserId;

use entrait::entrait;

///
/// Mockable system abstraction
///
#[entrait]
pub trait System {
    fn get_current_time(&self) -> time::OffsetDateTime;
}

///
/// Mockable config accessor
///
#[entrait]
pub trait GetConfig {
    fn get_session_signing_key(&self) -> &hmac::Hmac<sha2::Sha384>;
}

use crate::flash::{Flash, FlashCategory};

use axum::http::header::LOCATION;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum_extra::extract::CookieJar;

pub type WbResult<T, E = WbError> = std::result::Result<T, E>;

#[derive(thiserror::Error, Debug)]
pub enum WbError {
    #[error("access unauthorized")]
    Unauthorized,

    #[error("user not found")]
    UserNotFound,

    #[error("message not found")]
    MessageNotFound,

    #[error("username is taken")]
    UsernameTaken,

    #[error("email is taken")]
    EmailTaken,

    #[error("{0}")]
    Invalid(&'static str),

    #[error("an error occurred with the database")]
    Sqlx(#[from] sqlx::Error),

    #[error("an internal server error occurred")]
    Anyhow(#[from] anyhow::Error),
}

impl WbError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthorized => StatusCode::FOUND,
            Self::UserNotFound => StatusCode::NOT_FOUND,
            Self::MessageNotFound => StatusCode::NOT_FOUND,
            Self::UsernameTaken => StatusCode::UNPROCESSABLE_ENTITY,
            Self::EmailTaken => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Invalid(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Sqlx(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Anyhow(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for WbError {
    fn into_response(self) -> Response {
        match self {
            // Not an error page: anonymous visitors are sent home with a flash.
            Self::Unauthorized => (
                self.status_code(),
                Flash::new(FlashCategory::Danger, "Access unauthorized.").add_to(CookieJar::new()),
                [(LOCATION, "/")],
            )
                .into_response(),
            Self::UserNotFound | Self::MessageNotFound => {
                (self.status_code(), self.to_string()).into_response()
            }
            Self::UsernameTaken | Self::EmailTaken | Self::Invalid(_) => {
                (self.status_code(), self.to_string()).into_response()
            }
            Self::Sqlx(ref e) => {
                tracing::error!("SQLx error: {:?}", e);
                (self.status_code(), self.to_string()).into_response()
            }
            Self::Anyhow(ref e) => {
                tracing::error!("Generic error: {:?}", e);
                (self.status_code(), self.to_string()).into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header::SET_COOKIE;

    #[test]
    fn unauthorized_should_redirect_home_with_flash() {
        let response = WbError::Unauthorized.into_response();

        assert_eq!(StatusCode::FOUND, response.status());
        assert_eq!("/", response.headers()[LOCATION]);

        let set_cookie = response.headers()[SET_COOKIE].to_str().unwrap();
        assert!(set_cookie.starts_with("flash="));
    }

    #[test]
    fn not_found_should_be_404() {
        assert_eq!(
            StatusCode::NOT_FOUND,
            WbError::MessageNotFound.into_response().status()
        );
    }
}

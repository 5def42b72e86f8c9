use crate::error::WbError;
use crate::{GetConfig, System, UserId};

use axum_extra::extract::cookie::{Cookie, CookieJar};
use entrait::entrait;
use jwt::SignWithKey;
use jwt::VerifyWithKey;
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "session";

const DEFAULT_SESSION_LENGTH: time::Duration = time::Duration::weeks(2);

#[derive(serde::Serialize, serde::Deserialize)]
struct SessionClaims {
    /// The logged in user. The only key the session carries.
    curr_user: Uuid,
    /// Standard JWT `exp` claim.
    exp: i64,
}

///
/// Raw, unverified value of the session cookie.
///
#[derive(Clone, Debug)]
pub struct SessionCookie(String);

impl SessionCookie {
    pub fn from_token(token: &str) -> Self {
        Self(token.to_string())
    }

    pub fn token(&self) -> &str {
        &self.0
    }

    /// Log in: store this session in the jar.
    pub fn add_to(self, jar: CookieJar) -> CookieJar {
        jar.add(
            Cookie::build((SESSION_COOKIE, self.0))
                .path("/")
                .http_only(true),
        )
    }

    /// Log out: drop the session key from the jar.
    pub fn remove_from(jar: CookieJar) -> CookieJar {
        jar.remove(Cookie::build(SESSION_COOKIE).path("/"))
    }
}

#[async_trait::async_trait]
impl<S> axum::extract::FromRequestParts<S> for SessionCookie
where
    S: Send + Sync,
{
    type Rejection = WbError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        CookieJar::from_headers(&parts.headers)
            .get(SESSION_COOKIE)
            .map(|cookie| SessionCookie(cookie.value().to_string()))
            .ok_or(WbError::Unauthorized)
    }
}

#[entrait(pub SignSession)]
fn sign_session(deps: &(impl System + GetConfig), user_id: UserId) -> SessionCookie {
    let token = SessionClaims {
        curr_user: user_id.0,
        exp: (deps.get_current_time() + DEFAULT_SESSION_LENGTH).unix_timestamp(),
    }
    .sign_with_key(deps.get_session_signing_key())
    .expect("HMAC signing should be infallible");

    SessionCookie(token)
}

/// Resolve the current user. Missing, forged and expired sessions are all anonymous.
#[entrait(pub Identify)]
fn identify(
    deps: &(impl System + GetConfig),
    session: Option<SessionCookie>,
) -> UserId<Option<Uuid>> {
    let Some(session) = session else {
        return UserId(None);
    };

    match verify(deps, session.token()) {
        Some(claims) if claims.exp >= deps.get_current_time().unix_timestamp() => {
            UserId(Some(claims.curr_user))
        }
        Some(_) => {
            tracing::debug!("session expired");
            UserId(None)
        }
        None => {
            tracing::debug!("session rejected");
            UserId(None)
        }
    }
}

fn verify(deps: &impl GetConfig, token: &str) -> Option<SessionClaims> {
    let jwt = jwt::Token::<jwt::Header, SessionClaims, _>::parse_unverified(token).ok()?;
    let jwt = jwt.verify_with_key(deps.get_session_signing_key()).ok()?;
    let (_header, claims): (jwt::Header, SessionClaims) = jwt.into();

    Some(claims)
}

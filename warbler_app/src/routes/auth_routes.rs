use super::Found;
use crate::views;

use warbler_domain::error::{WbError, WbResult};
use warbler_domain::flash::{Flash, FlashCategory};
use warbler_domain::message::Timeline;
use warbler_domain::session::{Identify, SessionCookie, SignSession};
use warbler_domain::user::password::CleartextPassword;
use warbler_domain::user::{Authenticate, FetchUser, NewUser, Signup, SignupOutcome};
use warbler_domain::UserId;

use axum::extract::Extension;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Form;
use axum_extra::extract::CookieJar;

#[derive(serde::Deserialize)]
struct LoginForm {
    username: String,
    password: CleartextPassword,
}

pub struct AuthRoutes<A>(std::marker::PhantomData<A>);

impl<A> AuthRoutes<A>
where
    A: Identify
        + SignSession
        + Signup
        + Authenticate
        + FetchUser
        + Timeline
        + Sized
        + Clone
        + Send
        + Sync
        + 'static,
{
    pub fn router() -> axum::Router {
        axum::Router::new()
            .route("/", get(Self::home))
            .route("/signup", get(Self::signup_form).post(Self::signup))
            .route("/login", get(Self::login_form).post(Self::login))
            .route("/logout", get(Self::logout))
    }

    async fn home(
        Extension(app): Extension<A>,
        session: Option<SessionCookie>,
        jar: CookieJar,
    ) -> WbResult<Response> {
        let viewer = app.identify(session);

        let Some(user_id) = viewer.0.map(UserId) else {
            return Ok(views::page(jar, viewer, "Warbler", &views::landing()).into_response());
        };

        let user = match app.fetch_user(user_id).await {
            Ok(user) => user,
            // The account is gone but the browser still holds its session.
            Err(WbError::UserNotFound) => {
                let jar = SessionCookie::remove_from(jar);
                return Ok(
                    views::page(jar, UserId(None), "Warbler", &views::landing()).into_response()
                );
            }
            Err(e) => return Err(e),
        };
        let timeline = app.timeline(user_id).await?;

        Ok(views::page(jar, viewer, "Home", &views::home(&user, &timeline)).into_response())
    }

    async fn signup_form(
        Extension(app): Extension<A>,
        session: Option<SessionCookie>,
        jar: CookieJar,
    ) -> views::Page {
        views::page(jar, app.identify(session), "Sign up", &views::signup_form(None))
    }

    async fn signup(
        Extension(app): Extension<A>,
        session: Option<SessionCookie>,
        jar: CookieJar,
        Form(new_user): Form<NewUser>,
    ) -> WbResult<Response> {
        let error = match app.signup(new_user).await {
            Ok(SignupOutcome::Created(user)) => {
                let jar = app.sign_session(user.user_id).add_to(jar);
                return Ok((jar, Found("/".to_string())).into_response());
            }
            Ok(SignupOutcome::DuplicateUsername) => "Username already taken",
            Ok(SignupOutcome::DuplicateEmail) => "Email already taken",
            Err(WbError::Invalid(reason)) => reason,
            Err(e) => return Err(e),
        };

        let viewer = app.identify(session);
        Ok(views::page(jar, viewer, "Sign up", &views::signup_form(Some(error))).into_response())
    }

    async fn login_form(
        Extension(app): Extension<A>,
        session: Option<SessionCookie>,
        jar: CookieJar,
    ) -> views::Page {
        views::page(jar, app.identify(session), "Log in", &views::login_form(None))
    }

    async fn login(
        Extension(app): Extension<A>,
        session: Option<SessionCookie>,
        jar: CookieJar,
        Form(form): Form<LoginForm>,
    ) -> WbResult<Response> {
        match app.authenticate(&form.username, form.password).await? {
            Some(user) => {
                tracing::info!(username = %user.username, "login");
                let jar = Flash::new(
                    FlashCategory::Success,
                    format!("Hello, {}!", user.username),
                )
                .add_to(app.sign_session(user.user_id).add_to(jar));

                Ok((jar, Found("/".to_string())).into_response())
            }
            None => {
                let viewer = app.identify(session);
                Ok(views::page(
                    jar,
                    viewer,
                    "Log in",
                    &views::login_form(Some("Invalid credentials.")),
                )
                .into_response())
            }
        }
    }

    async fn logout(jar: CookieJar) -> impl IntoResponse {
        let jar = SessionCookie::remove_from(jar);
        let jar = Flash::new(FlashCategory::Success, "You have logged out.").add_to(jar);

        (jar, Found("/login".to_string()))
    }
}

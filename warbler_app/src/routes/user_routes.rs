use super::Found;
use crate::views;

use warbler_domain::error::{WbError, WbResult};
use warbler_domain::flash::{Flash, FlashCategory};
use warbler_domain::follow::FollowGraph;
use warbler_domain::message::MessagesByOwner;
use warbler_domain::session::{Identify, SessionCookie};
use warbler_domain::user::{
    DeleteUser, FetchAccount, FetchUser, ProfileUpdate, SearchUsers, UpdateProfile,
};
use warbler_domain::UserId;

use axum::extract::{Extension, Path, Query};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Form;
use axum_extra::extract::CookieJar;
use uuid::Uuid;

#[derive(serde::Deserialize)]
struct SearchQuery {
    q: Option<String>,
}

pub struct UserRoutes<A>(std::marker::PhantomData<A>);

impl<A> UserRoutes<A>
where
    A: Identify
        + FetchUser
        + FetchAccount
        + SearchUsers
        + UpdateProfile
        + DeleteUser
        + FollowGraph
        + MessagesByOwner
        + Sized
        + Clone
        + Send
        + Sync
        + 'static,
{
    pub fn router() -> axum::Router {
        axum::Router::new()
            .route("/users", get(Self::list_users))
            .route(
                "/users/profile",
                get(Self::profile_form).post(Self::update_profile),
            )
            .route("/users/delete", post(Self::delete_user))
            .route("/users/follow/:user_id", post(Self::follow))
            .route("/users/stop-following/:user_id", post(Self::stop_following))
            .route("/users/:user_id", get(Self::show_user))
            .route("/users/:user_id/following", get(Self::show_following))
            .route("/users/:user_id/followers", get(Self::show_followers))
    }

    async fn list_users(
        Extension(app): Extension<A>,
        session: Option<SessionCookie>,
        jar: CookieJar,
        Query(search): Query<SearchQuery>,
    ) -> WbResult<views::Page> {
        let users = app.search_users(search.q.as_deref()).await?;
        let body = format!(
            "{}\n{}",
            views::search_form(search.q.as_deref()),
            views::user_list("Users", &users)
        );

        Ok(views::page(jar, app.identify(session), "Users", &body))
    }

    async fn show_user(
        Extension(app): Extension<A>,
        session: Option<SessionCookie>,
        jar: CookieJar,
        Path(user_id): Path<Uuid>,
    ) -> WbResult<views::Page> {
        let viewer = app.identify(session);
        let user_id = UserId(user_id);

        let user = app.fetch_user(user_id).await?;
        let messages = app.messages_by_owner(user_id).await?;
        let following = app.following_of(user_id).await?;
        let followers = app.followers_of(user_id).await?;

        let button = match viewer.0.map(UserId) {
            None => views::FollowButton::Hidden,
            Some(me) if me == user_id => views::FollowButton::EditOwn,
            Some(me) => {
                if app.is_following(me, user_id).await? {
                    views::FollowButton::StopFollowing
                } else {
                    views::FollowButton::Follow
                }
            }
        };

        let body = views::user_detail(views::UserDetail {
            user: &user,
            messages: &messages,
            following_count: following.len(),
            followers_count: followers.len(),
            button,
        });

        Ok(views::page(jar, viewer, &user.username, &body))
    }

    async fn show_following(
        Extension(app): Extension<A>,
        session: Option<SessionCookie>,
        jar: CookieJar,
        Path(user_id): Path<Uuid>,
    ) -> WbResult<views::Page> {
        let viewer = app.identify(session);
        viewer.require()?;

        let user = app.fetch_user(UserId(user_id)).await?;
        let following = app.following_of(user.user_id).await?;
        let heading = format!("@{} is following", user.username);

        Ok(views::page(
            jar,
            viewer,
            &heading,
            &views::user_list(&heading, &following),
        ))
    }

    async fn show_followers(
        Extension(app): Extension<A>,
        session: Option<SessionCookie>,
        jar: CookieJar,
        Path(user_id): Path<Uuid>,
    ) -> WbResult<views::Page> {
        let viewer = app.identify(session);
        viewer.require()?;

        let user = app.fetch_user(UserId(user_id)).await?;
        let followers = app.followers_of(user.user_id).await?;
        let heading = format!("Followers of @{}", user.username);

        Ok(views::page(
            jar,
            viewer,
            &heading,
            &views::user_list(&heading, &followers),
        ))
    }

    async fn follow(
        Extension(app): Extension<A>,
        session: Option<SessionCookie>,
        Path(followee): Path<Uuid>,
    ) -> WbResult<Found> {
        let me = app.identify(session).require()?;
        app.follow(me, UserId(followee)).await?;

        Ok(Found(format!("/users/{me}/following")))
    }

    async fn stop_following(
        Extension(app): Extension<A>,
        session: Option<SessionCookie>,
        Path(followee): Path<Uuid>,
    ) -> WbResult<Found> {
        let me = app.identify(session).require()?;
        app.unfollow(me, UserId(followee)).await?;

        Ok(Found(format!("/users/{me}/following")))
    }

    async fn profile_form(
        Extension(app): Extension<A>,
        session: Option<SessionCookie>,
        jar: CookieJar,
    ) -> WbResult<views::Page> {
        let viewer = app.identify(session);
        let account = app.fetch_account(viewer.require()?).await?;

        Ok(views::page(
            jar,
            viewer,
            "Edit profile",
            &views::profile_form(&account, None),
        ))
    }

    async fn update_profile(
        Extension(app): Extension<A>,
        session: Option<SessionCookie>,
        jar: CookieJar,
        Form(update): Form<ProfileUpdate>,
    ) -> WbResult<Response> {
        let viewer = app.identify(session);
        let me = viewer.require()?;

        let error = match app.update_profile(me, update).await {
            Ok(Some(_)) => return Ok(Found(format!("/users/{me}")).into_response()),
            Ok(None) => {
                let jar = Flash::new(FlashCategory::Danger, "Wrong password, please try again.")
                    .add_to(jar);
                return Ok((jar, Found("/".to_string())).into_response());
            }
            Err(WbError::UsernameTaken) => "Username already taken",
            Err(WbError::EmailTaken) => "Email already taken",
            Err(e) => return Err(e),
        };

        let account = app.fetch_account(me).await?;
        Ok(views::page(
            jar,
            viewer,
            "Edit profile",
            &views::profile_form(&account, Some(error)),
        )
        .into_response())
    }

    async fn delete_user(
        Extension(app): Extension<A>,
        session: Option<SessionCookie>,
        jar: CookieJar,
    ) -> WbResult<Response> {
        let me = app.identify(session).require()?;
        app.delete_user(me).await?;

        let jar = SessionCookie::remove_from(jar);
        Ok((jar, Found("/signup".to_string())).into_response())
    }
}

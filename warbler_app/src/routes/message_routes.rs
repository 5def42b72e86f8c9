use super::Found;
use crate::views;

use warbler_domain::error::{WbError, WbResult};
use warbler_domain::message::{CreateMessage, DeleteMessage, FetchMessage, NewMessage};
use warbler_domain::session::{Identify, SessionCookie};

use axum::extract::{Extension, Path};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Form;
use axum_extra::extract::CookieJar;

pub struct MessageRoutes<A>(std::marker::PhantomData<A>);

impl<A> MessageRoutes<A>
where
    A: Identify
        + CreateMessage
        + DeleteMessage
        + FetchMessage
        + Sized
        + Clone
        + Send
        + Sync
        + 'static,
{
    pub fn router() -> axum::Router {
        axum::Router::new()
            .route("/messages/new", get(Self::new_form).post(Self::create))
            .route("/messages/:message_id", get(Self::show))
            .route("/messages/:message_id/delete", post(Self::delete))
    }

    async fn new_form(
        Extension(app): Extension<A>,
        session: Option<SessionCookie>,
        jar: CookieJar,
    ) -> WbResult<views::Page> {
        let viewer = app.identify(session);
        viewer.require()?;

        Ok(views::page(
            jar,
            viewer,
            "New message",
            &views::message_form(None),
        ))
    }

    async fn create(
        Extension(app): Extension<A>,
        session: Option<SessionCookie>,
        jar: CookieJar,
        Form(message): Form<NewMessage>,
    ) -> WbResult<Response> {
        let viewer = app.identify(session);
        let me = viewer.require()?;

        match app.create_message(me, &message.text).await {
            Ok(_) => Ok(Found(format!("/users/{me}")).into_response()),
            Err(WbError::Invalid(reason)) => Ok(views::page(
                jar,
                viewer,
                "New message",
                &views::message_form(Some(reason)),
            )
            .into_response()),
            Err(e) => Err(e),
        }
    }

    async fn show(
        Extension(app): Extension<A>,
        session: Option<SessionCookie>,
        jar: CookieJar,
        Path(message_id): Path<i64>,
    ) -> WbResult<views::Page> {
        let viewer = app.identify(session);
        let message = app.fetch_message(message_id).await?;

        Ok(views::page(
            jar,
            viewer,
            "Message",
            &views::message_detail(&message, viewer.is(message.author)),
        ))
    }

    async fn delete(
        Extension(app): Extension<A>,
        session: Option<SessionCookie>,
        Path(message_id): Path<i64>,
    ) -> WbResult<Found> {
        let me = app.identify(session).require()?;
        app.delete_message(me, message_id).await?;

        Ok(Found(format!("/users/{me}")))
    }
}

#[cfg(test)]
mod tests {
    use crate::test_util::*;

    use axum::http::StatusCode;
    use warbler_domain::follow::FollowGraph;
    use warbler_domain::message::{CreateMessage, FetchMessage, MessagesByOwner, Timeline};
    use warbler_domain::UserId;

    async fn message_count(client: &TestClient, user_id: UserId) -> usize {
        client.app.messages_by_owner(user_id).await.unwrap().len()
    }

    #[tokio::test]
    async fn should_add_message() {
        let mut client = TestClient::new().await;
        let user = client.create_user("testuser").await;
        client.login_as("testuser").await;

        let response = client.post("/messages/new", &[("text", "Hello")]).await;

        assert_eq!(StatusCode::FOUND, response.status);
        assert_eq!(
            Some(format!("/users/{}", user.user_id)),
            response.location
        );

        let messages = client.app.messages_by_owner(user.user_id).await.unwrap();
        assert_eq!(1, messages.len());
        assert_eq!("Hello", messages[0].text);
    }

    #[tokio::test]
    async fn added_message_should_show_on_profile() {
        let mut client = TestClient::new().await;
        client.create_user("testuser").await;
        client.login_as("testuser").await;

        let response = client.post("/messages/new", &[("text", "test text")]).await;
        let page = client.follow_redirects(response).await;

        assert_eq!(StatusCode::OK, page.status);
        assert!(page.body.contains("testuser"));
        assert!(page.body.contains("test text"));
        assert!(page.body.contains("1 messages"));
    }

    #[tokio::test]
    async fn anonymous_user_should_not_add_message() {
        let mut client = TestClient::new().await;
        let user = client.create_user("testuser").await;

        let response = client.post("/messages/new", &[("text", "Hello")]).await;
        assert_eq!(StatusCode::FOUND, response.status);
        assert_eq!(Some("/"), response.location.as_deref());

        let home = client.follow_redirects(response).await;
        assert!(home.body.contains("Access unauthorized."));
        assert_eq!(0, message_count(&client, user.user_id).await);
    }

    #[tokio::test]
    async fn invalid_message_should_rerender_form() {
        let mut client = TestClient::new().await;
        let user = client.create_user("testuser").await;
        client.login_as("testuser").await;

        let too_long = "x".repeat(141);
        for text in ["   ", too_long.as_str()] {
            let response = client.post("/messages/new", &[("text", text)]).await;
            assert_eq!(StatusCode::OK, response.status);
            assert!(response.body.contains(r#"class="error""#));
        }

        assert_eq!(0, message_count(&client, user.user_id).await);
    }

    #[tokio::test]
    async fn should_show_message() {
        let mut client = TestClient::new().await;
        let user = client.create_user("testuser").await;
        let message = client
            .app
            .create_message(user.user_id, "<i>hi</i>")
            .await
            .unwrap();

        let response = client
            .get(&format!("/messages/{}", message.message_id))
            .await;
        assert_eq!(StatusCode::OK, response.status);
        assert!(response.body.contains("&lt;i&gt;hi&lt;/i&gt;"));
        assert!(!response.body.contains("/delete"));

        let missing = client
            .get(&format!("/messages/{}", message.message_id + 1))
            .await;
        assert_eq!(StatusCode::NOT_FOUND, missing.status);
    }

    #[tokio::test]
    async fn owner_should_delete_message() {
        let mut client = TestClient::new().await;
        let user = client.create_user("testuser").await;
        let message = client
            .app
            .create_message(user.user_id, "TEST TEXT FOR TESTING")
            .await
            .unwrap();
        client.login_as("testuser").await;

        let response = client
            .post(&format!("/messages/{}/delete", message.message_id), &[])
            .await;

        assert_eq!(StatusCode::FOUND, response.status);
        assert_eq!(0, message_count(&client, user.user_id).await);
        assert!(client.app.fetch_message(message.message_id).await.is_err());
    }

    #[tokio::test]
    async fn other_user_should_not_delete_message() {
        let mut client = TestClient::new().await;
        let owner = client.create_user("owner").await;
        client.create_user("intruder").await;
        let message = client
            .app
            .create_message(owner.user_id, "mine")
            .await
            .unwrap();

        let mut intruder = client.fork();
        intruder.login_as("intruder").await;

        let response = intruder
            .post(&format!("/messages/{}/delete", message.message_id), &[])
            .await;
        assert_eq!(StatusCode::FOUND, response.status);
        assert_eq!(Some("/"), response.location.as_deref());

        let home = intruder.follow_redirects(response).await;
        assert!(home.body.contains("Access unauthorized."));
        assert_eq!(1, message_count(&client, owner.user_id).await);
    }

    #[tokio::test]
    async fn home_should_show_timeline() {
        let mut client = TestClient::new().await;
        let me = client.create_user("me").await;
        let followed = client.create_user("followed").await;
        let stranger = client.create_user("stranger").await;

        client.app.follow(me.user_id, followed.user_id).await.unwrap();
        client.app.create_message(me.user_id, "my own words").await.unwrap();
        client
            .app
            .create_message(followed.user_id, "followed words")
            .await
            .unwrap();
        client
            .app
            .create_message(stranger.user_id, "stranger words")
            .await
            .unwrap();

        let timeline = client.app.timeline(me.user_id).await.unwrap();
        assert_eq!(2, timeline.len());

        client.login_as("me").await;
        let home = client.get("/").await;

        assert!(home.body.contains("my own words"));
        assert!(home.body.contains("followed words"));
        assert!(!home.body.contains("stranger words"));
    }
}

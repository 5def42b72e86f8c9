use crate::app::{test::test_app, App};

use warbler_domain::user::repo::User;
use warbler_domain::user::{NewUser, Signup, SignupOutcome};

use axum::body::Body;
use axum::http::header::*;
use axum::http::{request, Request, StatusCode};
use axum_extra::extract::cookie::Cookie;
use entrait::Impl;
use std::collections::BTreeMap;
use tower::ServiceExt;

pub const TEST_PASSWORD: &str = "password";

pub struct TestResponse {
    pub status: StatusCode,
    pub location: Option<String>,
    pub body: String,
}

///
/// Drives the real router against an in-memory database, carrying cookies between requests
/// like a browser would.
///
pub struct TestClient {
    pub app: Impl<App>,
    router: axum::Router,
    cookies: BTreeMap<String, Cookie<'static>>,
}

impl TestClient {
    pub async fn new() -> Self {
        let app = test_app().await;

        Self {
            router: crate::router(app.clone()),
            app: Impl::new(app),
            cookies: BTreeMap::new(),
        }
    }

    /// A second browser talking to the same app and database.
    pub fn fork(&self) -> Self {
        Self {
            app: self.app.clone(),
            router: self.router.clone(),
            cookies: BTreeMap::new(),
        }
    }

    pub async fn create_user(&self, username: &str) -> User {
        let outcome = self
            .app
            .signup(NewUser {
                username: username.to_string(),
                email: format!("{username}@email.com"),
                password: TEST_PASSWORD.into(),
                image_url: None,
            })
            .await
            .unwrap();

        match outcome {
            SignupOutcome::Created(user) => user,
            other => panic!("failed to create test user: {other:?}"),
        }
    }

    pub async fn login_as(&mut self, username: &str) {
        let response = self
            .post(
                "/login",
                &[("username", username), ("password", TEST_PASSWORD)],
            )
            .await;

        assert_eq!(StatusCode::FOUND, response.status);
        assert!(self.has_cookie("session"));
    }

    pub fn has_cookie(&self, name: &str) -> bool {
        self.cookies.contains_key(name)
    }

    pub fn set_cookie(&mut self, name: &str, value: &str) {
        self.cookies.insert(
            name.to_string(),
            Cookie::new(name.to_string(), value.to_string()),
        );
    }

    pub async fn get(&mut self, uri: &str) -> TestResponse {
        self.send(Request::get(uri), Body::empty()).await
    }

    pub async fn post(&mut self, uri: &str, form: &[(&str, &str)]) -> TestResponse {
        let body = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(form)
            .finish();

        self.send(
            Request::post(uri).header(CONTENT_TYPE, "application/x-www-form-urlencoded"),
            Body::from(body),
        )
        .await
    }

    /// Keep issuing `GET`s while the response is a redirect.
    pub async fn follow_redirects(&mut self, mut response: TestResponse) -> TestResponse {
        while response.status == StatusCode::FOUND {
            let location = response.location.expect("redirect without location");
            response = self.get(&location).await;
        }
        response
    }

    async fn send(&mut self, mut builder: request::Builder, body: Body) -> TestResponse {
        if !self.cookies.is_empty() {
            let cookie_header = self
                .cookies
                .values()
                .map(|cookie| cookie.encoded().stripped().to_string())
                .collect::<Vec<_>>()
                .join("; ");
            builder = builder.header(COOKIE, cookie_header);
        }

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();

        for set_cookie in response.headers().get_all(SET_COOKIE) {
            self.store_cookie(set_cookie.to_str().unwrap());
        }

        let status = response.status();
        let location = response
            .headers()
            .get(LOCATION)
            .map(|location| location.to_str().unwrap().to_string());
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        TestResponse {
            status,
            location,
            body: String::from_utf8(bytes.to_vec()).unwrap(),
        }
    }

    fn store_cookie(&mut self, set_cookie: &str) {
        let Ok(cookie) = Cookie::parse_encoded(set_cookie.to_string()) else {
            return;
        };
        let removed = cookie.value().is_empty()
            || cookie.max_age().is_some_and(|age| age.is_zero())
            || cookie
                .expires_datetime()
                .is_some_and(|expires| expires <= time::OffsetDateTime::now_utc());

        if removed {
            self.cookies.remove(cookie.name());
        } else {
            self.cookies.insert(cookie.name().to_string(), cookie);
        }
    }
}

mod auth_routes;
mod message_routes;
mod user_routes;

use crate::app::App;

use axum::http::header::LOCATION;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::Router;
use entrait::Impl;

/// Axum router for the real app.
pub fn app_router() -> axum::Router {
    Router::new()
        .merge(auth_routes::AuthRoutes::<Impl<App>>::router())
        .merge(user_routes::UserRoutes::<Impl<App>>::router())
        .merge(message_routes::MessageRoutes::<Impl<App>>::router())
}

/// `302 Found` to `uri`.
pub(crate) struct Found(pub String);

impl IntoResponse for Found {
    fn into_response(self) -> Response {
        (StatusCode::FOUND, [(LOCATION, self.0)]).into_response()
    }
}

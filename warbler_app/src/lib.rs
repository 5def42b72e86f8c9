pub mod app;
pub mod config;

mod routes;
mod views;

#[cfg(test)]
mod test_util;

use anyhow::Context;
use axum::extract::Extension;
use entrait::Impl;
use tower::ServiceBuilder;

/// The full application router with the app injected.
pub fn router(app: app::App) -> axum::Router {
    routes::app_router().layer(
        ServiceBuilder::new()
            .layer(Extension(Impl::new(app)))
            // Enables logging. Use `RUST_LOG=tower_http=debug`
            .layer(tower_http::trace::TraceLayer::new_for_http()),
    )
}

pub async fn serve(app: app::App) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(app.config.listen_addr)
        .await
        .with_context(|| format!("could not bind to {}", app.config.listen_addr))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, router(app))
        .await
        .context("error running HTTP server")
}

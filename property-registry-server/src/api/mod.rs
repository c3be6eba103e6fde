use anyhow::Context;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::context::ApiContext;

pub mod error;
mod health;
mod properties;

pub use error::{ErrorResponse, HttpError};

pub async fn setup_and_serve(state: ApiContext) -> anyhow::Result<()> {
    let app = router(state.clone());

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", state.config.port))
        .await
        .with_context(|| format!("could not bind port {}", state.config.port))?;
    tracing::info!(
        "property registry is up and running with environment {:?} on port {}",
        &state.config.environment,
        &state.config.port
    );
    axum::serve(listener, app.into_make_service())
        .await
        .context("error starting service")
}

pub fn router(state: ApiContext) -> Router {
    Router::new()
        .merge(properties::router())
        .layer(TraceLayer::new_for_http())
        // Attached after the trace layer so health probes are not logged
        .merge(health::router())
        .with_state(state)
}

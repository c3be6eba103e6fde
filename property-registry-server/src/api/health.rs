use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use property_registry_api::{rollback_quietly, ApiError, ApiResult, BackendState};
use serde::{Deserialize, Serialize};

use crate::context::ApiContext;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub backend: BackendState,
}

/// Probes the store by opening and discarding a session
async fn health_handler(State(ctx): State<ApiContext>) -> Json<HealthResponse> {
    let probe: ApiResult<()> = async {
        let session = ctx.store.begin().await?;
        rollback_quietly(session).await;
        Ok::<(), ApiError>(())
    }
    .await;
    ctx.monitor.observe(&probe);

    Json(HealthResponse {
        status: "ok".to_string(),
        backend: ctx.monitor.state(),
    })
}

pub fn router() -> Router<ApiContext> {
    Router::new().route("/health", get(health_handler))
}

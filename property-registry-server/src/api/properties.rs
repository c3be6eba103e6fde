use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use property_registry_api::ingest::PropertyPayload;
use property_registry_api::{
    rollback_quietly, ApiError, ApiResult, Availability, CascadeDeletionGuard, CascadeReport,
    DeleteOutcome, DeleteRequest, HierarchyResolver, PropertyRegistrar, PropertyView,
};
use property_registry_db::repository::{LoadPage, Page, PageRequest, DEFAULT_PAGE_SIZE};
use property_registry_db::PropertyModel;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::error::HttpError;
use crate::context::ApiContext;

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub page: Option<usize>,
    pub page_size: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DeleteParams {
    #[serde(default)]
    pub cascade: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SecondariesResponse {
    pub items: Vec<PropertyModel>,
    /// False when the listing is empty because the backend could not be reached
    pub backend_available: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CascadeResponse {
    #[serde(flatten)]
    pub report: CascadeReport,
    pub succeeded: usize,
    pub total: usize,
    pub summary: String,
}

impl From<CascadeReport> for CascadeResponse {
    fn from(report: CascadeReport) -> Self {
        Self {
            succeeded: report.succeeded(),
            total: report.total(),
            summary: report.summary(),
            report,
        }
    }
}

pub fn router() -> Router<ApiContext> {
    Router::new()
        .route("/properties", get(list_properties).post(create_property))
        .route(
            "/properties/:id",
            get(get_property).put(update_property).delete(delete_property),
        )
        .route("/properties/:id/secondaries", get(list_secondaries))
}

#[tracing::instrument(skip(ctx))]
async fn list_properties(
    State(ctx): State<ApiContext>,
    Query(params): Query<ListParams>,
) -> Result<Json<Page<PropertyModel>>, HttpError> {
    let request = PageRequest::for_page(
        params.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
        params.page.unwrap_or(1),
    );

    let result: ApiResult<Page<PropertyModel>> = async {
        let session = ctx.store.begin().await?;
        let page = session.properties().load_page(request).await;
        rollback_quietly(session).await;
        Ok::<_, ApiError>(page?)
    }
    .await;

    Ok(Json(ctx.observe(result)?))
}

#[tracing::instrument(skip(ctx))]
async fn get_property(
    State(ctx): State<ApiContext>,
    Path(id): Path<Uuid>,
) -> Result<Json<PropertyView>, HttpError> {
    let result: ApiResult<PropertyView> = async {
        let session = ctx.store.begin().await?;
        let view = HierarchyResolver::new(session.properties()).view(id).await;
        rollback_quietly(session).await;
        view
    }
    .await;

    Ok(Json(ctx.observe(result)?))
}

/// Degrades to an empty listing when the backend is unreachable
#[tracing::instrument(skip(ctx))]
async fn list_secondaries(
    State(ctx): State<ApiContext>,
    Path(id): Path<Uuid>,
) -> Result<Json<SecondariesResponse>, HttpError> {
    let result: ApiResult<Vec<PropertyModel>> = async {
        let session = ctx.store.begin().await?;
        let secondaries = HierarchyResolver::new(session.properties())
            .list_secondaries(id)
            .await;
        rollback_quietly(session).await;
        secondaries
    }
    .await;

    let availability = Availability::from_result(ctx.observe(result))?;
    if !availability.is_available() {
        tracing::warn!(property_id = %id, "backend unavailable, returning empty secondaries");
    }

    Ok(Json(SecondariesResponse {
        backend_available: availability.is_available(),
        items: availability.or_default(),
    }))
}

#[tracing::instrument(skip(ctx, payload))]
async fn create_property(
    State(ctx): State<ApiContext>,
    payload: Result<Json<PropertyPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<PropertyModel>), HttpError> {
    ctx.monitor.ensure_writable()?;
    let Json(payload) = payload.map_err(|e| ApiError::Validation(e.body_text()))?;
    let draft = payload.normalize()?;

    let created = ctx.observe(PropertyRegistrar::new(ctx.store.as_ref()).create(draft).await)?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[tracing::instrument(skip(ctx, payload))]
async fn update_property(
    State(ctx): State<ApiContext>,
    Path(id): Path<Uuid>,
    payload: Result<Json<PropertyPayload>, JsonRejection>,
) -> Result<Json<PropertyModel>, HttpError> {
    ctx.monitor.ensure_writable()?;
    let Json(payload) = payload.map_err(|e| ApiError::Validation(e.body_text()))?;
    let draft = payload.normalize()?;

    let updated = ctx.observe(
        PropertyRegistrar::new(ctx.store.as_ref())
            .update(id, draft)
            .await,
    )?;
    Ok(Json(updated))
}

/// 204 for a single delete, 200 for a complete cascade, 207 for a partial one
#[tracing::instrument(skip(ctx))]
async fn delete_property(
    State(ctx): State<ApiContext>,
    Path(id): Path<Uuid>,
    Query(params): Query<DeleteParams>,
) -> Result<Response, HttpError> {
    ctx.monitor.ensure_writable()?;
    let request = DeleteRequest {
        property_id: id,
        cascade: params.cascade,
    };

    let outcome = ctx.observe(
        CascadeDeletionGuard::new(ctx.store.as_ref())
            .delete(request)
            .await,
    )?;

    Ok(match outcome {
        DeleteOutcome::Deleted(_) => StatusCode::NO_CONTENT.into_response(),
        DeleteOutcome::CascadeDeleted(report) => {
            let status = if report.is_complete() {
                StatusCode::OK
            } else {
                StatusCode::MULTI_STATUS
            };
            (status, Json(CascadeResponse::from(report))).into_response()
        }
    })
}

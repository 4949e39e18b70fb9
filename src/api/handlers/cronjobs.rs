//! Cron job request handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;
use uuid::Uuid;

use crate::api::doc::CRONJOB_TAG;
use crate::api::dto::{
    CreateCronJobRequest, CronJobResponse, HistoryEntryResponse, MessageResponse,
    UpdateCronJobRequest, WebhookIngestRequest,
};
use crate::error::AppResult;
use crate::state::AppState;
use crate::utils::ValidatedJson;

/// Creates cron-job related routes.
pub fn cronjob_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(list_cronjobs))
        .routes(routes!(create_cronjob))
        .routes(routes!(ingest_webhook))
        .routes(routes!(get_history))
        .routes(routes!(update_cronjob))
        .routes(routes!(delete_cronjob))
}

/// GET /api/v1/cronjob - List all cron jobs, newest first
#[utoipa::path(
    get,
    path = "/",
    tag = CRONJOB_TAG,
    responses(
        (status = 200, description = "List all cron jobs", body = Vec<CronJobResponse>)
    )
)]
async fn list_cronjobs(State(state): State<AppState>) -> AppResult<Json<Vec<CronJobResponse>>> {
    let jobs = state.services.cronjobs.list().await?;
    let responses: Vec<CronJobResponse> = jobs.into_iter().map(CronJobResponse::from).collect();
    Ok(Json(responses))
}

/// POST /api/v1/cronjob - Register and arm a new cron job
#[utoipa::path(
    post,
    path = "/",
    tag = CRONJOB_TAG,
    request_body = CreateCronJobRequest,
    responses(
        (status = 201, description = "Cron job created and armed", body = CronJobResponse),
        (status = 400, description = "Invalid request or start date")
    )
)]
async fn create_cronjob(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateCronJobRequest>,
) -> AppResult<(StatusCode, Json<CronJobResponse>)> {
    let job = state.services.cronjobs.create(req.into_submission()).await?;
    Ok((StatusCode::CREATED, Json(CronJobResponse::from(job))))
}

/// POST /api/v1/cronjob/webhook - Record an externally produced outcome
#[utoipa::path(
    post,
    path = "/webhook",
    tag = CRONJOB_TAG,
    request_body = WebhookIngestRequest,
    responses(
        (status = 201, description = "Outcome recorded as history", body = MessageResponse),
        (status = 404, description = "Cron job not found")
    )
)]
async fn ingest_webhook(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<WebhookIngestRequest>,
) -> AppResult<(StatusCode, Json<MessageResponse>)> {
    state
        .services
        .cronjobs
        .ingest_webhook(req.into_ingest())
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "Webhook response recorded successfully".to_string(),
        }),
    ))
}

/// GET /api/v1/cronjob/history/{id} - Firing history, most recent first
#[utoipa::path(
    get,
    path = "/history/{id}",
    tag = CRONJOB_TAG,
    params(
        ("id" = Uuid, Path, description = "Cron job ID")
    ),
    responses(
        (status = 200, description = "Firing history for the job", body = Vec<HistoryEntryResponse>)
    )
)]
async fn get_history(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Vec<HistoryEntryResponse>>> {
    let entries = state.services.cronjobs.history(id).await?;
    let responses: Vec<HistoryEntryResponse> =
        entries.into_iter().map(HistoryEntryResponse::from).collect();
    Ok(Json(responses))
}

/// PUT /api/v1/cronjob/{id} - Update a cron job and re-arm its timer
#[utoipa::path(
    put,
    path = "/{id}",
    tag = CRONJOB_TAG,
    params(
        ("id" = Uuid, Path, description = "Cron job ID")
    ),
    request_body = UpdateCronJobRequest,
    responses(
        (status = 200, description = "Cron job updated and re-armed", body = CronJobResponse),
        (status = 400, description = "Invalid request or start date"),
        (status = 404, description = "Cron job not found")
    )
)]
async fn update_cronjob(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<UpdateCronJobRequest>,
) -> AppResult<Json<CronJobResponse>> {
    let job = state
        .services
        .cronjobs
        .update(id, req.into_submission())
        .await?;
    Ok(Json(CronJobResponse::from(job)))
}

/// DELETE /api/v1/cronjob/{id} - Cancel the timer and delete the job
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = CRONJOB_TAG,
    params(
        ("id" = Uuid, Path, description = "Cron job ID")
    ),
    responses(
        (status = 200, description = "Deletion result; an unknown id is reported, not an error", body = MessageResponse)
    )
)]
async fn delete_cronjob(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<MessageResponse>> {
    let outcome = state.services.cronjobs.delete(id).await?;
    Ok(Json(MessageResponse {
        message: outcome.message().to_string(),
    }))
}

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::{
        block::{BlockResponse, CreateBlockRequest},
        workout::WorkoutResponse,
    },
};
use uuid::Uuid;
use validator::Validate;

use crate::error::WebError;
use crate::extract::AppJson;

use super::services;

#[utoipa::path(
    post,
    path = "/api/blocks",
    request_body = CreateBlockRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Training block created with its whole hierarchy", body = BlockResponse),
        (status = 400, description = "Malformed body or validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Creator or assignee user not found")
    ),
    tag = "blocks"
)]
pub async fn create_block(
    State(db): State<Database>,
    AppJson(req): AppJson<CreateBlockRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let block = services::create_block(&db, &req).await?;

    Ok((StatusCode::CREATED, Json(block)).into_response())
}

#[utoipa::path(
    get,
    path = "/api/blocks/{block_id}",
    params(
        ("block_id" = Uuid, Path, description = "Training block id")
    ),
    responses(
        (status = 200, description = "Training block found", body = BlockResponse),
        (status = 404, description = "Training block not found")
    ),
    tag = "blocks"
)]
pub async fn get_block(
    State(db): State<Database>,
    Path(block_id): Path<Uuid>,
) -> Result<Response, WebError> {
    let block = services::get_block(&db, block_id).await?;

    Ok(Json(block).into_response())
}

#[utoipa::path(
    get,
    path = "/api/blocks/{block_id}/progress",
    params(
        ("block_id" = Uuid, Path, description = "Training block id")
    ),
    responses(
        (status = 200, description = "One entry per logged workout, ordered by week then day", body = Vec<WorkoutResponse>),
        (status = 404, description = "Training block not found")
    ),
    tag = "blocks"
)]
pub async fn get_block_progress(
    State(db): State<Database>,
    Path(block_id): Path<Uuid>,
) -> Result<Response, WebError> {
    let progress = services::get_block_progress(&db, block_id).await?;

    Ok(Json(progress).into_response())
}

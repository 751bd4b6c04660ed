use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::workout::{LogWorkoutRequest, WorkoutResponse},
    models::WorkoutKey,
};
use validator::Validate;

use crate::error::WebError;
use crate::extract::AppJson;

use super::services;

#[utoipa::path(
    get,
    path = "/api/workouts",
    params(WorkoutKey),
    responses(
        (status = 200, description = "Logged sets grouped by exercise; empty when the day has nothing logged", body = WorkoutResponse),
        (status = 404, description = "No such day in the block")
    ),
    tag = "workouts"
)]
pub async fn get_workout(
    State(db): State<Database>,
    Query(key): Query<WorkoutKey>,
) -> Result<Response, WebError> {
    let workout = services::get_workout(&db, key).await?;

    Ok(Json(workout).into_response())
}

#[utoipa::path(
    post,
    path = "/api/workouts",
    request_body = LogWorkoutRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Sets logged; returns the whole workout for the day", body = WorkoutResponse),
        (status = 400, description = "Malformed body, validation error or exercise from another day"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Day, exercise or prescribed set not found")
    ),
    tag = "workouts"
)]
pub async fn log_workout(
    State(db): State<Database>,
    AppJson(req): AppJson<LogWorkoutRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let workout = services::log_workout(&db, &req).await?;

    Ok((StatusCode::CREATED, Json(workout)).into_response())
}

#[utoipa::path(
    delete,
    path = "/api/workouts",
    params(WorkoutKey),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 204, description = "Logged sets deleted, or nothing was logged"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "No such day in the block")
    ),
    tag = "workouts"
)]
pub async fn delete_workout(
    State(db): State<Database>,
    Query(key): Query<WorkoutKey>,
) -> Result<Response, WebError> {
    services::delete_workout(&db, key).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}

use axum::{
    Json,
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use storage::{Database, dto::workout::ActualSetResponse};
use uuid::Uuid;

use crate::error::WebError;

use super::services;

#[utoipa::path(
    get,
    path = "/api/exercises/{exercise_id}/actual-sets",
    params(
        ("exercise_id" = Uuid, Path, description = "Exercise id")
    ),
    responses(
        (status = 200, description = "Sets logged for the exercise, oldest first", body = Vec<ActualSetResponse>),
        (status = 404, description = "Exercise not found")
    ),
    tag = "exercises"
)]
pub async fn get_exercise_sets(
    State(db): State<Database>,
    Path(exercise_id): Path<Uuid>,
) -> Result<Response, WebError> {
    let sets = services::get_exercise_sets(&db, exercise_id).await?;

    Ok(Json(sets).into_response())
}

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Movement pattern an exercise trains
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "exercise_category", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExerciseCategory {
    Squat,
    Bench,
    Deadlift,
    Accessory,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Exercise {
    pub exercise_id: Uuid,
    pub day_id: Uuid,
    pub position: i32,
    pub name: String,
    pub category: ExerciseCategory,
    pub order_in_workout: i32,
}

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Cadence prescription for a lift
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "tempo", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Tempo {
    Explosive,
    Controlled,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct PrescribedSet {
    pub prescribed_set_id: Uuid,
    pub exercise_id: Uuid,
    pub position: i32,
    pub set_number: i32,
    pub target_sets: i32,
    pub target_reps: i32,
    pub target_load_min: Option<Decimal>,
    pub target_load_max: Option<Decimal>,
    pub target_rpe: Option<i32>,
    pub tempo: Tempo,
    pub video_required: bool,
}

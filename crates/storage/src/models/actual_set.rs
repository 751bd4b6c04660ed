use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::{Tempo, WorkoutKey};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ActualSet {
    pub actual_set_id: Uuid,
    pub exercise_id: Uuid,
    /// Weak link to the prescription this set fulfils, if any
    pub prescribed_set_id: Option<Uuid>,
    pub set_number: i32,
    pub actual_weight: Option<Decimal>,
    pub actual_reps: Option<i32>,
    pub actual_rpe: Option<i32>,
    pub tempo_used: Option<Tempo>,
    pub video_recorded: bool,
    pub feedback: Option<String>,
    pub completed_at: NaiveDateTime,
}

/// An actual set joined with the exercise it belongs to and the
/// block/week/day coordinate that exercise sits under.
#[derive(Debug, Clone, FromRow)]
pub struct ActualSetRecord {
    #[sqlx(flatten)]
    pub set: ActualSet,
    pub exercise_name: String,
    pub order_in_workout: i32,
    pub block_id: Uuid,
    pub week_number: i32,
    pub day_number: i32,
}

impl ActualSetRecord {
    pub fn key(&self) -> WorkoutKey {
        WorkoutKey::new(self.block_id, self.week_number, self.day_number)
    }
}

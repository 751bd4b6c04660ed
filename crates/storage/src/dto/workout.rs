use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::{ActualSet, Tempo, WorkoutKey};

/// Request payload for logging a performed workout against a planned day
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct LogWorkoutRequest {
    pub block_id: Uuid,

    #[validate(range(min = 1, message = "Week number must be positive"))]
    pub week_number: i32,

    #[validate(range(min = 1, message = "Day number must be positive"))]
    pub day_number: i32,

    #[validate(nested)]
    pub exercises: Vec<LogExerciseRequest>,
}

impl LogWorkoutRequest {
    pub fn key(&self) -> WorkoutKey {
        WorkoutKey::new(self.block_id, self.week_number, self.day_number)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct LogExerciseRequest {
    pub exercise_id: Uuid,

    #[validate(nested)]
    pub actual_sets: Vec<LogActualSetRequest>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct LogActualSetRequest {
    pub prescribed_set_id: Option<Uuid>,

    #[validate(range(min = 1, message = "Set number must be positive"))]
    pub set_number: i32,

    pub actual_weight: Option<Decimal>,

    #[validate(range(min = 0))]
    pub actual_reps: Option<i32>,

    #[validate(range(min = 1, max = 10, message = "RPE must be between 1 and 10"))]
    pub actual_rpe: Option<i32>,

    pub tempo_used: Option<Tempo>,

    #[serde(default)]
    pub video_recorded: bool,

    #[validate(length(max = 2000))]
    pub feedback: Option<String>,
}

/// Every set logged for one block/week/day coordinate, grouped by exercise
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct WorkoutResponse {
    pub block_id: Uuid,
    pub week_number: i32,
    pub day_number: i32,
    /// Latest completion time across all sets; null when nothing is logged
    pub completed_at: Option<NaiveDateTime>,
    pub exercises: Vec<WorkoutExerciseResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct WorkoutExerciseResponse {
    pub exercise_id: Uuid,
    pub exercise_name: String,
    pub actual_sets: Vec<ActualSetResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ActualSetResponse {
    pub actual_set_id: Uuid,
    pub exercise_id: Uuid,
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

impl From<ActualSet> for ActualSetResponse {
    fn from(set: ActualSet) -> Self {
        Self {
            actual_set_id: set.actual_set_id,
            exercise_id: set.exercise_id,
            prescribed_set_id: set.prescribed_set_id,
            set_number: set.set_number,
            actual_weight: set.actual_weight,
            actual_reps: set.actual_reps,
            actual_rpe: set.actual_rpe,
            tempo_used: set.tempo_used,
            video_recorded: set.video_recorded,
            feedback: set.feedback,
            completed_at: set.completed_at,
        }
    }
}

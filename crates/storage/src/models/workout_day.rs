use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct WorkoutDay {
    pub day_id: Uuid,
    pub week_id: Uuid,
    pub position: i32,
    pub day_number: i32,
    pub day_name: String,
    pub rest_day: bool,
}

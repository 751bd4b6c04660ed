use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Training intent of a week
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "week_type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WeekType {
    Base,
    Progression,
    Deload,
    Test,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Week {
    pub week_id: Uuid,
    pub block_id: Uuid,
    /// Ordinal within the block, in submission order
    pub position: i32,
    pub week_number: i32,
    pub week_type: WeekType,
    pub start_date: NaiveDate,
    /// Always `start_date + 6 days`
    pub end_date: NaiveDate,
}

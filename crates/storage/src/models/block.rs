use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Block {
    pub block_id: Uuid,
    pub created_by_user_id: Option<Uuid>,
    pub assigned_to_user_id: Option<Uuid>,
    /// Number of weeks in the program
    pub block_length: i32,
    pub progression_rate: Decimal,
    pub deload_rate: Decimal,
    pub macrocycle: String,
    pub mesocycle: String,
    pub created_at: NaiveDateTime,
}

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

/// Identifies one workout: a day addressed by its block, its week number and
/// its day number.
///
/// Used as the grouping key when regrouping flat actual-set rows into
/// workouts, so it compares by value on all three parts. Two coordinates are
/// the same workout only when every component matches, whatever the digits
/// of the numbers happen to be.
///
/// # Examples
///
/// ```
/// use storage::models::WorkoutKey;
/// use uuid::Uuid;
///
/// let block = Uuid::new_v4();
///
/// // "23" + "1" and "2" + "31" would collide as concatenated strings
/// assert_ne!(WorkoutKey::new(block, 23, 1), WorkoutKey::new(block, 2, 31));
/// assert_eq!(WorkoutKey::new(block, 1, 1), WorkoutKey::new(block, 1, 1));
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, IntoParams,
    ToSchema,
)]
#[into_params(parameter_in = Query)]
pub struct WorkoutKey {
    pub block_id: Uuid,
    pub week_number: i32,
    pub day_number: i32,
}

impl WorkoutKey {
    pub fn new(block_id: Uuid, week_number: i32, day_number: i32) -> Self {
        Self {
            block_id,
            week_number,
            day_number,
        }
    }

    /// Human readable form used in error messages
    pub fn describe(&self) -> String {
        format!(
            "block {}, week {}, day {}",
            self.block_id, self.week_number, self.day_number
        )
    }
}

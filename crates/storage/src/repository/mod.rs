use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{
    ActualSet, ActualSetRecord, Exercise, PrescribedSet, ProgramGraph, WorkoutDay, WorkoutKey,
};

#[cfg(test)]
pub mod memory;
pub mod postgres;

pub use postgres::PgTrainingStore;

/// Storage operations the training services run against.
///
/// Every call made through one store value shares a single transaction, so
/// a service composes several calls into one atomic unit of work.
#[async_trait]
pub trait TrainingStore: Send {
    async fn user_exists(&mut self, user_id: Uuid) -> Result<bool>;

    /// Persists a fully wired graph. Ids are already assigned.
    async fn insert_program(&mut self, program: &ProgramGraph) -> Result<()>;

    async fn load_program(&mut self, block_id: Uuid) -> Result<Option<ProgramGraph>>;

    async fn block_exists(&mut self, block_id: Uuid) -> Result<bool>;

    async fn find_day(&mut self, key: WorkoutKey) -> Result<Option<WorkoutDay>>;

    async fn find_exercise(&mut self, exercise_id: Uuid) -> Result<Option<Exercise>>;

    async fn find_prescribed_set(&mut self, prescribed_set_id: Uuid)
    -> Result<Option<PrescribedSet>>;

    /// Sets logged for one day, ordered by exercise order, set number, then completion time
    async fn find_sets_for_day(&mut self, day_id: Uuid) -> Result<Vec<ActualSetRecord>>;

    /// Sets logged anywhere in a block, ordered by week and day number first
    async fn find_sets_for_block(&mut self, block_id: Uuid) -> Result<Vec<ActualSetRecord>>;

    async fn find_sets_for_exercise(&mut self, exercise_id: Uuid) -> Result<Vec<ActualSetRecord>>;

    async fn insert_actual_sets(&mut self, sets: &[ActualSet]) -> Result<()>;

    /// Returns the number of rows removed
    async fn delete_actual_sets(&mut self, actual_set_ids: &[Uuid]) -> Result<u64>;
}

use storage::{
    Database,
    dto::{
        block::{BlockResponse, CreateBlockRequest},
        workout::WorkoutResponse,
    },
    error::Result,
    repository::PgTrainingStore,
    services::{program_builder, workout_aggregator},
};
use uuid::Uuid;

/// Create a block and its whole hierarchy in one transaction
pub async fn create_block(db: &Database, request: &CreateBlockRequest) -> Result<BlockResponse> {
    let mut tx = db.begin().await?;
    let block =
        program_builder::create_block(&mut PgTrainingStore::new(&mut *tx), request).await?;
    tx.commit().await?;

    tracing::info!(
        "Created training block {} with {} weeks",
        block.block_id,
        block.weeks.len()
    );

    Ok(block)
}

/// Get a block with its whole hierarchy, read from one snapshot
pub async fn get_block(db: &Database, block_id: Uuid) -> Result<BlockResponse> {
    let mut tx = db.begin().await?;
    let block = program_builder::get_block(&mut PgTrainingStore::new(&mut *tx), block_id).await?;
    tx.commit().await?;

    Ok(block)
}

/// Get every logged workout of a block
pub async fn get_block_progress(db: &Database, block_id: Uuid) -> Result<Vec<WorkoutResponse>> {
    let mut tx = db.begin().await?;
    let progress =
        workout_aggregator::get_block_progress(&mut PgTrainingStore::new(&mut *tx), block_id)
            .await?;
    tx.commit().await?;

    Ok(progress)
}

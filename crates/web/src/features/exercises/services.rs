use storage::{
    Database, dto::workout::ActualSetResponse, error::Result, repository::PgTrainingStore,
    services::workout_aggregator,
};
use uuid::Uuid;

/// Every set ever logged for one exercise
pub async fn get_exercise_sets(db: &Database, exercise_id: Uuid) -> Result<Vec<ActualSetResponse>> {
    let mut tx = db.begin().await?;
    let sets =
        workout_aggregator::get_exercise_sets(&mut PgTrainingStore::new(&mut *tx), exercise_id)
            .await?;
    tx.commit().await?;

    Ok(sets)
}

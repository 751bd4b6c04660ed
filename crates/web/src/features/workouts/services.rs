use storage::{
    Database,
    dto::workout::{LogWorkoutRequest, WorkoutResponse},
    error::Result,
    models::WorkoutKey,
    repository::PgTrainingStore,
    services::workout_aggregator,
};

/// Get the workout logged at a block/week/day coordinate
pub async fn get_workout(db: &Database, key: WorkoutKey) -> Result<WorkoutResponse> {
    let mut tx = db.begin().await?;
    let workout = workout_aggregator::get_workout(&mut PgTrainingStore::new(&mut *tx), key).await?;
    tx.commit().await?;

    Ok(workout)
}

/// Log sets against a planned day and read the workout back in the same transaction
pub async fn log_workout(db: &Database, request: &LogWorkoutRequest) -> Result<WorkoutResponse> {
    let mut tx = db.begin().await?;
    let workout =
        workout_aggregator::log_workout(&mut PgTrainingStore::new(&mut *tx), request).await?;
    tx.commit().await?;

    let logged: usize = request.exercises.iter().map(|e| e.actual_sets.len()).sum();
    tracing::info!("Logged {} sets for {}", logged, request.key().describe());

    Ok(workout)
}

/// Delete every set logged at a coordinate
pub async fn delete_workout(db: &Database, key: WorkoutKey) -> Result<()> {
    let mut tx = db.begin().await?;
    let removed =
        workout_aggregator::delete_workout(&mut PgTrainingStore::new(&mut *tx), key).await?;
    tx.commit().await?;

    tracing::info!("Deleted {} sets for {}", removed, key.describe());

    Ok(())
}

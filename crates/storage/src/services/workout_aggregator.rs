//! Regroups flat actual-set rows into workouts and records new ones.

use std::collections::{BTreeMap, HashMap};

use chrono::{NaiveDateTime, SubsecRound, Utc};
use uuid::Uuid;

use crate::dto::workout::{
    ActualSetResponse, LogWorkoutRequest, WorkoutExerciseResponse, WorkoutResponse,
};
use crate::error::{Result, StorageError};
use crate::models::{ActualSet, ActualSetRecord, WorkoutDay, WorkoutKey};
use crate::repository::TrainingStore;
use crate::services::numeric::LOAD;

/// Groups the records of one workout by exercise.
///
/// Exercises come out in the order their first set appears in `records`,
/// and each exercise keeps its sets in that same order. `completed_at` is
/// the latest completion time of any set, or `None` when nothing is logged.
pub fn assemble_workout(key: WorkoutKey, records: Vec<ActualSetRecord>) -> WorkoutResponse {
    let completed_at = records.iter().map(|r| r.set.completed_at).max();

    let mut exercises: Vec<WorkoutExerciseResponse> = Vec::new();
    let mut slots: HashMap<Uuid, usize> = HashMap::new();

    for record in records {
        let slot = *slots.entry(record.set.exercise_id).or_insert_with(|| {
            exercises.push(WorkoutExerciseResponse {
                exercise_id: record.set.exercise_id,
                exercise_name: record.exercise_name.clone(),
                actual_sets: Vec::new(),
            });
            exercises.len() - 1
        });
        exercises[slot]
            .actual_sets
            .push(ActualSetResponse::from(record.set));
    }

    WorkoutResponse {
        block_id: key.block_id,
        week_number: key.week_number,
        day_number: key.day_number,
        completed_at,
        exercises,
    }
}

/// One workout per distinct logged coordinate, ordered by week then day.
/// Coordinates with no logged sets never appear.
pub fn group_block_progress(records: Vec<ActualSetRecord>) -> Vec<WorkoutResponse> {
    let mut workouts: BTreeMap<WorkoutKey, Vec<ActualSetRecord>> = BTreeMap::new();
    for record in records {
        workouts.entry(record.key()).or_default().push(record);
    }

    workouts
        .into_iter()
        .map(|(key, records)| assemble_workout(key, records))
        .collect()
}

async fn resolve_day<S>(store: &mut S, key: WorkoutKey) -> Result<WorkoutDay>
where
    S: TrainingStore + ?Sized,
{
    store
        .find_day(key)
        .await?
        .ok_or_else(|| StorageError::not_found(format!("Workout day not found: {}", key.describe())))
}

/// The workout logged at a coordinate. A day that exists but has nothing
/// logged yields an empty workout, not an error.
pub async fn get_workout<S>(store: &mut S, key: WorkoutKey) -> Result<WorkoutResponse>
where
    S: TrainingStore + ?Sized,
{
    let day = resolve_day(store, key).await?;
    let records = store.find_sets_for_day(day.day_id).await?;

    Ok(assemble_workout(key, records))
}

pub async fn get_block_progress<S>(store: &mut S, block_id: Uuid) -> Result<Vec<WorkoutResponse>>
where
    S: TrainingStore + ?Sized,
{
    if !store.block_exists(block_id).await? {
        return Err(StorageError::not_found(format!(
            "Training block not found with id: {block_id}"
        )));
    }

    let records = store.find_sets_for_block(block_id).await?;
    Ok(group_block_progress(records))
}

pub async fn log_workout<S>(store: &mut S, request: &LogWorkoutRequest) -> Result<WorkoutResponse>
where
    S: TrainingStore + ?Sized,
{
    log_workout_at(store, request, Utc::now().naive_utc()).await
}

/// Records every set in `request` with the same completion time.
///
/// Every exercise and prescribed set reference is checked before anything
/// is written, so a rejected call stores no sets at all.
pub async fn log_workout_at<S>(
    store: &mut S,
    request: &LogWorkoutRequest,
    completed_at: NaiveDateTime,
) -> Result<WorkoutResponse>
where
    S: TrainingStore + ?Sized,
{
    let key = request.key();
    let completed_at = completed_at.trunc_subsecs(6);
    let day = resolve_day(store, key).await?;

    let mut sets = Vec::new();
    for (exercise_index, entry) in request.exercises.iter().enumerate() {
        let exercise = store.find_exercise(entry.exercise_id).await?.ok_or_else(|| {
            StorageError::not_found(format!("Exercise not found with id: {}", entry.exercise_id))
        })?;

        if exercise.day_id != day.day_id {
            return Err(StorageError::validation(format!(
                "Exercise {} does not belong to {}",
                exercise.exercise_id,
                key.describe()
            )));
        }

        for (set_index, set) in entry.actual_sets.iter().enumerate() {
            let actual_weight = LOAD.fit_opt(
                set.actual_weight,
                &format!("exercises[{exercise_index}].actual_sets[{set_index}].actual_weight"),
            )?;

            if let Some(prescribed_set_id) = set.prescribed_set_id {
                let prescribed = store
                    .find_prescribed_set(prescribed_set_id)
                    .await?
                    .ok_or_else(|| {
                        StorageError::not_found(format!(
                            "Prescribed set not found with id: {prescribed_set_id}"
                        ))
                    })?;

                if prescribed.exercise_id != exercise.exercise_id {
                    return Err(StorageError::validation(format!(
                        "Prescribed set {prescribed_set_id} does not belong to exercise {}",
                        exercise.exercise_id
                    )));
                }
            }

            sets.push(ActualSet {
                actual_set_id: Uuid::new_v4(),
                exercise_id: exercise.exercise_id,
                prescribed_set_id: set.prescribed_set_id,
                set_number: set.set_number,
                actual_weight,
                actual_reps: set.actual_reps,
                actual_rpe: set.actual_rpe,
                tempo_used: set.tempo_used,
                video_recorded: set.video_recorded,
                feedback: set.feedback.clone(),
                completed_at,
            });
        }
    }

    if !sets.is_empty() {
        store.insert_actual_sets(&sets).await?;
    }

    get_workout(store, key).await
}

/// Removes every set logged at a coordinate and returns how many went.
pub async fn delete_workout<S>(store: &mut S, key: WorkoutKey) -> Result<u64>
where
    S: TrainingStore + ?Sized,
{
    let day = resolve_day(store, key).await?;
    let ids: Vec<Uuid> = store
        .find_sets_for_day(day.day_id)
        .await?
        .into_iter()
        .map(|r| r.set.actual_set_id)
        .collect();

    if ids.is_empty() {
        return Ok(0);
    }

    store.delete_actual_sets(&ids).await
}

/// Every set ever logged for one exercise, oldest first
pub async fn get_exercise_sets<S>(store: &mut S, exercise_id: Uuid) -> Result<Vec<ActualSetResponse>>
where
    S: TrainingStore + ?Sized,
{
    if store.find_exercise(exercise_id).await?.is_none() {
        return Err(StorageError::not_found(format!(
            "Exercise not found with id: {exercise_id}"
        )));
    }

    Ok(store
        .find_sets_for_exercise(exercise_id)
        .await?
        .into_iter()
        .map(|r| ActualSetResponse::from(r.set))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::block::{
        BlockResponse, CreateBlockRequest, CreateExerciseRequest, CreatePrescribedSetRequest,
        CreateWeekRequest, CreateWorkoutDayRequest,
    };
    use crate::dto::workout::{LogActualSetRequest, LogExerciseRequest};
    use crate::models::{ExerciseCategory, Tempo, WeekType};
    use crate::repository::memory::MemoryTrainingStore;
    use crate::services::program_builder::create_block;
    use chrono::{Duration, NaiveDate};
    use rust_decimal::Decimal;

    fn at(hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 3)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn exercise(name: &str, order: i32) -> CreateExerciseRequest {
        CreateExerciseRequest {
            name: Some(name.to_string()),
            category: Some(ExerciseCategory::Accessory),
            order_in_workout: Some(order),
            prescribed_sets: Some(vec![CreatePrescribedSetRequest {
                set_number: Some(1),
                target_sets: Some(3),
                target_reps: Some(8),
                tempo: Some(Tempo::Explosive),
                ..Default::default()
            }]),
        }
    }

    /// Two weeks of five days each, two exercises per day
    async fn seeded() -> (MemoryTrainingStore, BlockResponse) {
        let weeks = (1..=2)
            .map(|week_number| CreateWeekRequest {
                week_number: Some(week_number),
                week_type: Some(WeekType::Progression),
                start_date: NaiveDate::from_ymd_opt(2025, 3, 3)
                    .map(|d| d + Duration::weeks(i64::from(week_number - 1))),
                days: Some(
                    (1..=5)
                        .map(|day_number| CreateWorkoutDayRequest {
                            day_number: Some(day_number),
                            day_name: Some(format!("Session {day_number}")),
                            rest_day: None,
                            exercises: Some(vec![exercise("Squat", 1), exercise("Row", 2)]),
                        })
                        .collect(),
                ),
            })
            .collect();

        let request = CreateBlockRequest {
            block_length: Some(2),
            progression_rate: Some(Decimal::new(5, 2)),
            deload_rate: Some(Decimal::new(1, 1)),
            weeks: Some(weeks),
            ..Default::default()
        };

        let mut store = MemoryTrainingStore::new();
        let block = create_block(&mut store, &request).await.unwrap();
        (store, block)
    }

    fn set(set_number: i32) -> LogActualSetRequest {
        LogActualSetRequest {
            prescribed_set_id: None,
            set_number,
            actual_weight: Some(Decimal::new(100, 0)),
            actual_reps: Some(8),
            actual_rpe: Some(8),
            tempo_used: None,
            video_recorded: false,
            feedback: None,
        }
    }

    fn log_request(
        block: &BlockResponse,
        week: usize,
        day: usize,
        exercises: &[(usize, usize)],
    ) -> LogWorkoutRequest {
        let planned = &block.weeks[week].days[day];
        LogWorkoutRequest {
            block_id: block.block_id,
            week_number: block.weeks[week].week_number,
            day_number: planned.day_number,
            exercises: exercises
                .iter()
                .map(|&(index, count)| LogExerciseRequest {
                    exercise_id: planned.exercises[index].exercise_id,
                    actual_sets: (1..=count as i32).map(set).collect(),
                })
                .collect(),
        }
    }

    fn key_of(block: &BlockResponse, week: usize, day: usize) -> WorkoutKey {
        WorkoutKey::new(
            block.block_id,
            block.weeks[week].week_number,
            block.weeks[week].days[day].day_number,
        )
    }

    #[tokio::test]
    async fn test_sets_logged_together_share_completed_at() {
        let (mut store, block) = seeded().await;

        let workout = log_workout_at(&mut store, &log_request(&block, 0, 0, &[(0, 3)]), at(9))
            .await
            .unwrap();

        let times: Vec<NaiveDateTime> = workout.exercises[0]
            .actual_sets
            .iter()
            .map(|s| s.completed_at)
            .collect();
        assert_eq!(times, vec![at(9); 3]);
        assert_eq!(workout.completed_at, Some(at(9)));
    }

    #[tokio::test]
    async fn test_completed_at_is_latest_across_calls() {
        let (mut store, block) = seeded().await;

        log_workout_at(&mut store, &log_request(&block, 0, 1, &[(0, 2)]), at(10))
            .await
            .unwrap();
        log_workout_at(&mut store, &log_request(&block, 0, 1, &[(1, 1)]), at(8))
            .await
            .unwrap();

        let workout = get_workout(&mut store, key_of(&block, 0, 1)).await.unwrap();
        assert_eq!(workout.completed_at, Some(at(10)));
        assert_eq!(workout.exercises.len(), 2);
        assert_eq!(workout.exercises[0].actual_sets.len(), 2);
        assert_eq!(workout.exercises[1].actual_sets[0].completed_at, at(8));
    }

    #[tokio::test]
    async fn test_exercises_follow_order_in_workout() {
        let (mut store, block) = seeded().await;

        let workout = log_workout_at(
            &mut store,
            &log_request(&block, 1, 2, &[(1, 1), (0, 2)]),
            at(7),
        )
        .await
        .unwrap();

        let names: Vec<&str> = workout
            .exercises
            .iter()
            .map(|e| e.exercise_name.as_str())
            .collect();
        assert_eq!(names, vec!["Squat", "Row"]);
    }

    #[tokio::test]
    async fn test_empty_day_is_not_an_error() {
        let (mut store, block) = seeded().await;

        let workout = get_workout(&mut store, key_of(&block, 1, 4)).await.unwrap();
        assert!(workout.exercises.is_empty());
        assert_eq!(workout.completed_at, None);
        assert_eq!(workout.week_number, 2);
        assert_eq!(workout.day_number, 5);
    }

    #[tokio::test]
    async fn test_unknown_coordinate_is_not_found() {
        let (mut store, block) = seeded().await;

        for key in [
            WorkoutKey::new(block.block_id, 3, 1),
            WorkoutKey::new(block.block_id, 1, 6),
            WorkoutKey::new(Uuid::new_v4(), 1, 1),
        ] {
            assert!(matches!(
                get_workout(&mut store, key).await,
                Err(StorageError::NotFound(_))
            ));
            assert!(matches!(
                delete_workout(&mut store, key).await,
                Err(StorageError::NotFound(_))
            ));
        }
    }

    #[tokio::test]
    async fn test_progress_lists_only_logged_days() {
        let (mut store, block) = seeded().await;

        log_workout_at(&mut store, &log_request(&block, 1, 0, &[(0, 1)]), at(9))
            .await
            .unwrap();
        log_workout_at(&mut store, &log_request(&block, 0, 3, &[(1, 2)]), at(11))
            .await
            .unwrap();

        let progress = get_block_progress(&mut store, block.block_id).await.unwrap();

        let coordinates: Vec<(i32, i32)> = progress
            .iter()
            .map(|w| (w.week_number, w.day_number))
            .collect();
        assert_eq!(coordinates, vec![(1, 4), (2, 1)]);
        assert_eq!(progress[0].completed_at, Some(at(11)));
        assert_eq!(progress[0].exercises[0].actual_sets.len(), 2);
    }

    #[tokio::test]
    async fn test_progress_of_unlogged_block_is_empty() {
        let (mut store, block) = seeded().await;
        let progress = get_block_progress(&mut store, block.block_id).await.unwrap();
        assert!(progress.is_empty());

        // An unknown block is reported as missing, not as a block with no
        // progress, so a mistyped id never looks like an untouched program.
        assert!(matches!(
            get_block_progress(&mut store, Uuid::new_v4()).await,
            Err(StorageError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_exercise_from_another_day_persists_nothing() {
        let (mut store, block) = seeded().await;

        let mut request = log_request(&block, 0, 0, &[(0, 2)]);
        request.exercises.push(LogExerciseRequest {
            exercise_id: block.weeks[0].days[1].exercises[0].exercise_id,
            actual_sets: vec![set(1)],
        });

        let result = log_workout_at(&mut store, &request, at(9)).await;
        assert!(matches!(result, Err(StorageError::Validation(_))));
        assert!(store.actual_sets.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_exercise_is_not_found() {
        let (mut store, block) = seeded().await;

        let mut request = log_request(&block, 0, 0, &[]);
        request.exercises.push(LogExerciseRequest {
            exercise_id: Uuid::new_v4(),
            actual_sets: vec![set(1)],
        });

        assert!(matches!(
            log_workout_at(&mut store, &request, at(9)).await,
            Err(StorageError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_prescribed_set_must_belong_to_exercise() {
        let (mut store, block) = seeded().await;
        let day = &block.weeks[0].days[0];

        let mut request = log_request(&block, 0, 0, &[(0, 1)]);
        request.exercises[0].actual_sets[0].prescribed_set_id =
            Some(day.exercises[1].prescribed_sets[0].prescribed_set_id);
        assert!(matches!(
            log_workout_at(&mut store, &request, at(9)).await,
            Err(StorageError::Validation(_))
        ));

        request.exercises[0].actual_sets[0].prescribed_set_id = Some(Uuid::new_v4());
        assert!(matches!(
            log_workout_at(&mut store, &request, at(9)).await,
            Err(StorageError::NotFound(_))
        ));
        assert!(store.actual_sets.is_empty());

        let prescribed_set_id = day.exercises[0].prescribed_sets[0].prescribed_set_id;
        request.exercises[0].actual_sets[0].prescribed_set_id = Some(prescribed_set_id);
        let workout = log_workout_at(&mut store, &request, at(9)).await.unwrap();
        assert_eq!(
            workout.exercises[0].actual_sets[0].prescribed_set_id,
            Some(prescribed_set_id)
        );
    }

    #[tokio::test]
    async fn test_weight_too_large_for_column_persists_nothing() {
        let (mut store, block) = seeded().await;

        let mut request = log_request(&block, 0, 0, &[(0, 2)]);
        request.exercises[0].actual_sets[1].actual_weight = Some(Decimal::new(10000, 0));

        match log_workout_at(&mut store, &request, at(9)).await {
            Err(StorageError::Validation(msg)) => {
                assert!(msg.starts_with("exercises[0].actual_sets[1].actual_weight"))
            }
            other => panic!("expected validation error, got {other:?}"),
        }
        assert!(store.actual_sets.is_empty());
    }

    #[tokio::test]
    async fn test_weight_rounded_to_stored_scale() {
        let (mut store, block) = seeded().await;

        let mut request = log_request(&block, 0, 0, &[(0, 1)]);
        request.exercises[0].actual_sets[0].actual_weight = Some(Decimal::new(102555, 3));

        let workout = log_workout_at(&mut store, &request, at(9)).await.unwrap();
        assert_eq!(
            workout.exercises[0].actual_sets[0].actual_weight,
            Some(Decimal::new(10256, 2))
        );
        assert_eq!(store.actual_sets[0].actual_weight, Some(Decimal::new(10256, 2)));
    }

    #[tokio::test]
    async fn test_equal_order_in_workout_falls_back_to_submission_order() {
        let request = CreateBlockRequest {
            block_length: Some(1),
            progression_rate: Some(Decimal::ZERO),
            deload_rate: Some(Decimal::ZERO),
            weeks: Some(vec![CreateWeekRequest {
                week_number: Some(1),
                week_type: Some(WeekType::Base),
                start_date: NaiveDate::from_ymd_opt(2025, 3, 3),
                days: Some(vec![CreateWorkoutDayRequest {
                    day_number: Some(1),
                    day_name: Some("Squat day".to_string()),
                    rest_day: None,
                    exercises: Some(vec![exercise("Pause Squat", 1), exercise("Tempo Squat", 1)]),
                }]),
            }]),
            ..Default::default()
        };
        let mut store = MemoryTrainingStore::new();
        let block = create_block(&mut store, &request).await.unwrap();

        log_workout_at(&mut store, &log_request(&block, 0, 0, &[(1, 1), (0, 1)]), at(9))
            .await
            .unwrap();

        let workout = get_workout(&mut store, key_of(&block, 0, 0)).await.unwrap();
        let names: Vec<&str> = workout
            .exercises
            .iter()
            .map(|e| e.exercise_name.as_str())
            .collect();
        assert_eq!(names, vec!["Pause Squat", "Tempo Squat"]);

        let progress = get_block_progress(&mut store, block.block_id).await.unwrap();
        assert_eq!(progress[0].exercises[0].exercise_name, "Pause Squat");
    }

    #[tokio::test]
    async fn test_delete_workout_clears_only_that_day() {
        let (mut store, block) = seeded().await;

        log_workout_at(&mut store, &log_request(&block, 0, 0, &[(0, 2), (1, 1)]), at(9))
            .await
            .unwrap();
        log_workout_at(&mut store, &log_request(&block, 0, 1, &[(0, 1)]), at(9))
            .await
            .unwrap();

        let removed = delete_workout(&mut store, key_of(&block, 0, 0)).await.unwrap();
        assert_eq!(removed, 3);
        assert_eq!(store.actual_sets.len(), 1);

        let again = delete_workout(&mut store, key_of(&block, 0, 0)).await.unwrap();
        assert_eq!(again, 0);
    }

    #[tokio::test]
    async fn test_exercise_sets_span_calls() {
        let (mut store, block) = seeded().await;
        let exercise_id = block.weeks[0].days[0].exercises[0].exercise_id;

        log_workout_at(&mut store, &log_request(&block, 0, 0, &[(0, 1)]), at(12))
            .await
            .unwrap();
        log_workout_at(&mut store, &log_request(&block, 0, 0, &[(0, 2)]), at(6))
            .await
            .unwrap();

        let sets = get_exercise_sets(&mut store, exercise_id).await.unwrap();
        let order: Vec<(NaiveDateTime, i32)> =
            sets.iter().map(|s| (s.completed_at, s.set_number)).collect();
        assert_eq!(order, vec![(at(6), 1), (at(6), 2), (at(12), 1)]);

        assert!(matches!(
            get_exercise_sets(&mut store, Uuid::new_v4()).await,
            Err(StorageError::NotFound(_))
        ));
    }

    #[test]
    fn test_completed_at_truncated_to_micros() {
        let precise = at(9) + Duration::nanoseconds(1_234_567);
        assert_eq!(
            precise.trunc_subsecs(6),
            at(9) + Duration::microseconds(1_234)
        );
    }
}

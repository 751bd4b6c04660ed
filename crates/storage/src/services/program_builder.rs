//! Builds a training block's whole hierarchy from one nested request and
//! persists it as a single unit.

use chrono::{Days, NaiveDateTime, SubsecRound, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::dto::block::{
    BlockResponse, CreateBlockRequest, CreateExerciseRequest, CreatePrescribedSetRequest,
    CreateWeekRequest, CreateWorkoutDayRequest,
};
use crate::error::{Result, StorageError};
use crate::models::{Block, Exercise, PrescribedSet, ProgramGraph, Week, WorkoutDay};
use crate::repository::TrainingStore;
use crate::services::numeric::{LOAD, RATE};

/// Weeks always span seven days, start day included
const WEEK_SPAN_DAYS: u64 = 6;

const DEFAULT_CYCLE_LABEL: &str = "Default";

fn required<T: Clone>(value: &Option<T>, path: impl FnOnce() -> String) -> Result<T> {
    value
        .clone()
        .ok_or_else(|| StorageError::validation(format!("{} is required", path())))
}

fn position(index: usize) -> i32 {
    i32::try_from(index).unwrap_or(i32::MAX)
}

/// Turns a creation request into a fully wired graph without touching storage.
///
/// Ids are assigned here and every child carries its parent's id before the
/// graph is returned. Children are appended in request order, so each
/// parent's children keep the submitted order. Fails on the first missing
/// required field, naming its path.
pub fn build_program(request: &CreateBlockRequest, created_at: NaiveDateTime) -> Result<ProgramGraph> {
    let block_length = required(&request.block_length, || "block_length".to_string())?;
    let progression_rate = required(&request.progression_rate, || "progression_rate".to_string())?;
    let deload_rate = required(&request.deload_rate, || "deload_rate".to_string())?;
    let weeks = request
        .weeks
        .as_deref()
        .ok_or_else(|| StorageError::validation("weeks is required"))?;

    if block_length < 1 {
        return Err(StorageError::validation("block_length must be positive"));
    }
    if progression_rate < Decimal::ZERO || deload_rate < Decimal::ZERO {
        return Err(StorageError::validation(
            "progression_rate and deload_rate must not be negative",
        ));
    }

    let progression_rate = RATE.fit(progression_rate, "progression_rate")?;
    let deload_rate = RATE.fit(deload_rate, "deload_rate")?;

    let mut graph = ProgramGraph::new(Block {
        block_id: Uuid::new_v4(),
        created_by_user_id: request.created_by_user_id,
        assigned_to_user_id: request.assigned_to_user_id,
        block_length,
        progression_rate,
        deload_rate,
        macrocycle: request
            .macrocycle
            .clone()
            .unwrap_or_else(|| DEFAULT_CYCLE_LABEL.to_string()),
        mesocycle: request
            .mesocycle
            .clone()
            .unwrap_or_else(|| DEFAULT_CYCLE_LABEL.to_string()),
        created_at,
    });

    for (index, week) in weeks.iter().enumerate() {
        add_week(&mut graph, week, index, &format!("weeks[{index}]"))?;
    }

    Ok(graph)
}

fn add_week(
    graph: &mut ProgramGraph,
    request: &CreateWeekRequest,
    index: usize,
    path: &str,
) -> Result<()> {
    let week_number = required(&request.week_number, || format!("{path}.week_number"))?;
    let week_type = required(&request.week_type, || format!("{path}.week_type"))?;
    let start_date = required(&request.start_date, || format!("{path}.start_date"))?;
    let end_date = start_date
        .checked_add_days(Days::new(WEEK_SPAN_DAYS))
        .ok_or_else(|| StorageError::validation(format!("{path}.start_date is out of range")))?;

    let week_id = Uuid::new_v4();
    graph.weeks.push(Week {
        week_id,
        block_id: graph.block_id(),
        position: position(index),
        week_number,
        week_type,
        start_date,
        end_date,
    });

    for (index, day) in request.days.iter().flatten().enumerate() {
        add_day(graph, week_id, day, index, &format!("{path}.days[{index}]"))?;
    }

    Ok(())
}

fn add_day(
    graph: &mut ProgramGraph,
    week_id: Uuid,
    request: &CreateWorkoutDayRequest,
    index: usize,
    path: &str,
) -> Result<()> {
    let day_number = required(&request.day_number, || format!("{path}.day_number"))?;
    let day_name = required(&request.day_name, || format!("{path}.day_name"))?;

    let day_id = Uuid::new_v4();
    graph.days.push(WorkoutDay {
        day_id,
        week_id,
        position: position(index),
        day_number,
        day_name,
        rest_day: request.rest_day.unwrap_or(false),
    });

    for (index, exercise) in request.exercises.iter().flatten().enumerate() {
        add_exercise(graph, day_id, exercise, index, &format!("{path}.exercises[{index}]"))?;
    }

    Ok(())
}

fn add_exercise(
    graph: &mut ProgramGraph,
    day_id: Uuid,
    request: &CreateExerciseRequest,
    index: usize,
    path: &str,
) -> Result<()> {
    let name = required(&request.name, || format!("{path}.name"))?;
    let category = required(&request.category, || format!("{path}.category"))?;
    let order_in_workout =
        required(&request.order_in_workout, || format!("{path}.order_in_workout"))?;

    let exercise_id = Uuid::new_v4();
    graph.exercises.push(Exercise {
        exercise_id,
        day_id,
        position: position(index),
        name,
        category,
        order_in_workout,
    });

    for (index, set) in request.prescribed_sets.iter().flatten().enumerate() {
        add_prescribed_set(
            graph,
            exercise_id,
            set,
            index,
            &format!("{path}.prescribed_sets[{index}]"),
        )?;
    }

    Ok(())
}

fn add_prescribed_set(
    graph: &mut ProgramGraph,
    exercise_id: Uuid,
    request: &CreatePrescribedSetRequest,
    index: usize,
    path: &str,
) -> Result<()> {
    let set_number = required(&request.set_number, || format!("{path}.set_number"))?;
    let target_sets = required(&request.target_sets, || format!("{path}.target_sets"))?;
    let target_reps = required(&request.target_reps, || format!("{path}.target_reps"))?;
    let tempo = required(&request.tempo, || format!("{path}.tempo"))?;

    request
        .validate_load_range()
        .map_err(|e| StorageError::validation(format!("{path}: {e}")))?;
    let target_load_min = LOAD.fit_opt(request.target_load_min, &format!("{path}.target_load_min"))?;
    let target_load_max = LOAD.fit_opt(request.target_load_max, &format!("{path}.target_load_max"))?;

    graph.prescribed_sets.push(PrescribedSet {
        prescribed_set_id: Uuid::new_v4(),
        exercise_id,
        position: position(index),
        set_number,
        target_sets,
        target_reps,
        target_load_min,
        target_load_max,
        target_rpe: request.target_rpe,
        tempo,
        video_required: request.video_required.unwrap_or(false),
    });

    Ok(())
}

/// Creates a block with its whole hierarchy.
///
/// The request is fully checked and the graph built before the store sees
/// anything; creator and assignee, when given, must be existing users.
pub async fn create_block<S>(store: &mut S, request: &CreateBlockRequest) -> Result<BlockResponse>
where
    S: TrainingStore + ?Sized,
{
    let created_at = Utc::now().naive_utc().trunc_subsecs(6);
    let graph = build_program(request, created_at)?;

    for (role, user_id) in [
        ("Creator", request.created_by_user_id),
        ("Assignee", request.assigned_to_user_id),
    ] {
        if let Some(user_id) = user_id
            && !store.user_exists(user_id).await?
        {
            return Err(StorageError::DependencyNotFound(format!(
                "{role} user not found with id: {user_id}"
            )));
        }
    }

    store.insert_program(&graph).await?;

    Ok(BlockResponse::from(graph))
}

/// Reads a block back with its whole hierarchy
pub async fn get_block<S>(store: &mut S, block_id: Uuid) -> Result<BlockResponse>
where
    S: TrainingStore + ?Sized,
{
    let graph = store.load_program(block_id).await?.ok_or_else(|| {
        StorageError::not_found(format!("Training block not found with id: {block_id}"))
    })?;

    Ok(BlockResponse::from(graph))
}

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::{
    Exercise, ExerciseCategory, PrescribedSet, ProgramGraph, Tempo, Week, WeekType, WorkoutDay,
};

/// Request payload for creating a training block with its whole hierarchy.
///
/// Required fields are optional here so that a missing one is reported as a
/// validation failure with its path instead of a deserialization error.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateBlockRequest {
    pub created_by_user_id: Option<Uuid>,

    pub assigned_to_user_id: Option<Uuid>,

    #[validate(range(min = 1, message = "Block length must be positive"))]
    pub block_length: Option<i32>,

    pub progression_rate: Option<Decimal>,

    pub deload_rate: Option<Decimal>,

    #[validate(length(min = 1, max = 255))]
    pub macrocycle: Option<String>,

    #[validate(length(min = 1, max = 255))]
    pub mesocycle: Option<String>,

    #[validate(nested)]
    pub weeks: Option<Vec<CreateWeekRequest>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateWeekRequest {
    #[validate(range(min = 1, message = "Week number must be positive"))]
    pub week_number: Option<i32>,

    pub week_type: Option<WeekType>,

    pub start_date: Option<NaiveDate>,

    #[validate(nested)]
    pub days: Option<Vec<CreateWorkoutDayRequest>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateWorkoutDayRequest {
    #[validate(range(min = 1, message = "Day number must be positive"))]
    pub day_number: Option<i32>,

    #[validate(length(
        min = 1,
        max = 255,
        message = "Day name must be between 1 and 255 characters"
    ))]
    pub day_name: Option<String>,

    pub rest_day: Option<bool>,

    #[validate(nested)]
    pub exercises: Option<Vec<CreateExerciseRequest>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateExerciseRequest {
    #[validate(length(
        min = 1,
        max = 255,
        message = "Exercise name must be between 1 and 255 characters"
    ))]
    pub name: Option<String>,

    pub category: Option<ExerciseCategory>,

    pub order_in_workout: Option<i32>,

    #[validate(nested)]
    pub prescribed_sets: Option<Vec<CreatePrescribedSetRequest>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreatePrescribedSetRequest {
    #[validate(range(min = 1, message = "Set number must be positive"))]
    pub set_number: Option<i32>,

    #[validate(range(min = 1, message = "Target sets must be positive"))]
    pub target_sets: Option<i32>,

    #[validate(range(min = 1, message = "Target reps must be positive"))]
    pub target_reps: Option<i32>,

    pub target_load_min: Option<Decimal>,

    pub target_load_max: Option<Decimal>,

    #[validate(range(min = 1, max = 10, message = "RPE must be between 1 and 10"))]
    pub target_rpe: Option<i32>,

    pub tempo: Option<Tempo>,

    pub video_required: Option<bool>,
}

impl CreatePrescribedSetRequest {
    /// Checks the load range when both ends are given
    pub fn validate_load_range(&self) -> Result<(), &'static str> {
        if let (Some(min), Some(max)) = (self.target_load_min, self.target_load_max)
            && min > max
        {
            return Err("target_load_min must not exceed target_load_max");
        }

        Ok(())
    }
}

/// A training block with every week, day, exercise and prescribed set
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BlockResponse {
    pub block_id: Uuid,
    pub created_by_user_id: Option<Uuid>,
    pub assigned_to_user_id: Option<Uuid>,
    pub block_length: i32,
    pub progression_rate: Decimal,
    pub deload_rate: Decimal,
    pub macrocycle: String,
    pub mesocycle: String,
    pub created_at: NaiveDateTime,
    pub weeks: Vec<WeekResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct WeekResponse {
    pub week_id: Uuid,
    pub block_id: Uuid,
    pub week_number: i32,
    pub week_type: WeekType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub days: Vec<WorkoutDayResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct WorkoutDayResponse {
    pub day_id: Uuid,
    pub week_id: Uuid,
    pub day_number: i32,
    pub day_name: String,
    pub rest_day: bool,
    pub exercises: Vec<ExerciseResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ExerciseResponse {
    pub exercise_id: Uuid,
    pub day_id: Uuid,
    pub name: String,
    pub category: ExerciseCategory,
    pub order_in_workout: i32,
    pub prescribed_sets: Vec<PrescribedSetResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PrescribedSetResponse {
    pub prescribed_set_id: Uuid,
    pub exercise_id: Uuid,
    pub set_number: i32,
    pub target_sets: i32,
    pub target_reps: i32,
    pub target_load_min: Option<Decimal>,
    pub target_load_max: Option<Decimal>,
    pub target_rpe: Option<i32>,
    pub tempo: Tempo,
    pub video_required: bool,
}

impl From<&PrescribedSet> for PrescribedSetResponse {
    fn from(set: &PrescribedSet) -> Self {
        Self {
            prescribed_set_id: set.prescribed_set_id,
            exercise_id: set.exercise_id,
            set_number: set.set_number,
            target_sets: set.target_sets,
            target_reps: set.target_reps,
            target_load_min: set.target_load_min,
            target_load_max: set.target_load_max,
            target_rpe: set.target_rpe,
            tempo: set.tempo,
            video_required: set.video_required,
        }
    }
}

impl From<ProgramGraph> for BlockResponse {
    fn from(graph: ProgramGraph) -> Self {
        let weeks = graph
            .weeks
            .iter()
            .map(|week| week_response(&graph, week))
            .collect();

        let block = graph.block;
        Self {
            block_id: block.block_id,
            created_by_user_id: block.created_by_user_id,
            assigned_to_user_id: block.assigned_to_user_id,
            block_length: block.block_length,
            progression_rate: block.progression_rate,
            deload_rate: block.deload_rate,
            macrocycle: block.macrocycle,
            mesocycle: block.mesocycle,
            created_at: block.created_at,
            weeks,
        }
    }
}

fn week_response(graph: &ProgramGraph, week: &Week) -> WeekResponse {
    WeekResponse {
        week_id: week.week_id,
        block_id: week.block_id,
        week_number: week.week_number,
        week_type: week.week_type,
        start_date: week.start_date,
        end_date: week.end_date,
        days: graph
            .days_of(week.week_id)
            .map(|day| day_response(graph, day))
            .collect(),
    }
}

fn day_response(graph: &ProgramGraph, day: &WorkoutDay) -> WorkoutDayResponse {
    WorkoutDayResponse {
        day_id: day.day_id,
        week_id: day.week_id,
        day_number: day.day_number,
        day_name: day.day_name.clone(),
        rest_day: day.rest_day,
        exercises: graph
            .exercises_of(day.day_id)
            .map(|exercise| exercise_response(graph, exercise))
            .collect(),
    }
}

fn exercise_response(graph: &ProgramGraph, exercise: &Exercise) -> ExerciseResponse {
    ExerciseResponse {
        exercise_id: exercise.exercise_id,
        day_id: exercise.day_id,
        name: exercise.name.clone(),
        category: exercise.category,
        order_in_workout: exercise.order_in_workout,
        prescribed_sets: graph
            .prescribed_sets_of(exercise.exercise_id)
            .map(PrescribedSetResponse::from)
            .collect(),
    }
}

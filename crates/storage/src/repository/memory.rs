//! In-memory `TrainingStore` for service tests.

use std::collections::HashSet;

use async_trait::async_trait;
use uuid::Uuid;

use super::TrainingStore;
use crate::error::Result;
use crate::models::{
    ActualSet, ActualSetRecord, Block, Exercise, PrescribedSet, ProgramGraph, Week, WorkoutDay,
    WorkoutKey,
};

#[derive(Debug, Default)]
pub struct MemoryTrainingStore {
    pub users: HashSet<Uuid>,
    pub blocks: Vec<Block>,
    pub weeks: Vec<Week>,
    pub days: Vec<WorkoutDay>,
    pub exercises: Vec<Exercise>,
    pub prescribed_sets: Vec<PrescribedSet>,
    pub actual_sets: Vec<ActualSet>,
}

impl MemoryTrainingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(mut self, user_id: Uuid) -> Self {
        self.users.insert(user_id);
        self
    }

    /// Rows across every table except users
    pub fn row_count(&self) -> usize {
        self.blocks.len()
            + self.weeks.len()
            + self.days.len()
            + self.exercises.len()
            + self.prescribed_sets.len()
            + self.actual_sets.len()
    }

    fn record(&self, set: &ActualSet) -> Option<ActualSetRecord> {
        let exercise = self
            .exercises
            .iter()
            .find(|e| e.exercise_id == set.exercise_id)?;
        let day = self.days.iter().find(|d| d.day_id == exercise.day_id)?;
        let week = self.weeks.iter().find(|w| w.week_id == day.week_id)?;

        Some(ActualSetRecord {
            set: set.clone(),
            exercise_name: exercise.name.clone(),
            order_in_workout: exercise.order_in_workout,
            block_id: week.block_id,
            week_number: week.week_number,
            day_number: day.day_number,
        })
    }

    fn records_where(&self, keep: impl Fn(&ActualSetRecord) -> bool) -> Vec<ActualSetRecord> {
        self.actual_sets
            .iter()
            .filter_map(|set| self.record(set))
            .filter(|record| keep(record))
            .collect()
    }

    fn day_of_exercise(&self, exercise_id: Uuid) -> Option<Uuid> {
        self.exercises
            .iter()
            .find(|e| e.exercise_id == exercise_id)
            .map(|e| e.day_id)
    }

    fn exercise_position(&self, exercise_id: Uuid) -> i32 {
        self.exercises
            .iter()
            .find(|e| e.exercise_id == exercise_id)
            .map_or(0, |e| e.position)
    }
}

#[async_trait]
impl TrainingStore for MemoryTrainingStore {
    async fn user_exists(&mut self, user_id: Uuid) -> Result<bool> {
        Ok(self.users.contains(&user_id))
    }

    async fn insert_program(&mut self, program: &ProgramGraph) -> Result<()> {
        self.blocks.push(program.block.clone());
        self.weeks.extend(program.weeks.iter().cloned());
        self.days.extend(program.days.iter().cloned());
        self.exercises.extend(program.exercises.iter().cloned());
        self.prescribed_sets
            .extend(program.prescribed_sets.iter().cloned());
        Ok(())
    }

    async fn load_program(&mut self, block_id: Uuid) -> Result<Option<ProgramGraph>> {
        let Some(block) = self.blocks.iter().find(|b| b.block_id == block_id) else {
            return Ok(None);
        };

        let mut graph = ProgramGraph::new(block.clone());
        graph.weeks = self
            .weeks
            .iter()
            .filter(|w| w.block_id == block_id)
            .cloned()
            .collect();

        let week_ids: HashSet<Uuid> = graph.weeks.iter().map(|w| w.week_id).collect();
        graph.days = self
            .days
            .iter()
            .filter(|d| week_ids.contains(&d.week_id))
            .cloned()
            .collect();

        let day_ids: HashSet<Uuid> = graph.days.iter().map(|d| d.day_id).collect();
        graph.exercises = self
            .exercises
            .iter()
            .filter(|e| day_ids.contains(&e.day_id))
            .cloned()
            .collect();

        let exercise_ids: HashSet<Uuid> = graph.exercises.iter().map(|e| e.exercise_id).collect();
        graph.prescribed_sets = self
            .prescribed_sets
            .iter()
            .filter(|s| exercise_ids.contains(&s.exercise_id))
            .cloned()
            .collect();

        Ok(Some(graph))
    }

    async fn block_exists(&mut self, block_id: Uuid) -> Result<bool> {
        Ok(self.blocks.iter().any(|b| b.block_id == block_id))
    }

    async fn find_day(&mut self, key: WorkoutKey) -> Result<Option<WorkoutDay>> {
        let day = self
            .weeks
            .iter()
            .filter(|w| w.block_id == key.block_id && w.week_number == key.week_number)
            .find_map(|week| {
                self.days
                    .iter()
                    .find(|d| d.week_id == week.week_id && d.day_number == key.day_number)
            })
            .cloned();

        Ok(day)
    }

    async fn find_exercise(&mut self, exercise_id: Uuid) -> Result<Option<Exercise>> {
        Ok(self
            .exercises
            .iter()
            .find(|e| e.exercise_id == exercise_id)
            .cloned())
    }

    async fn find_prescribed_set(
        &mut self,
        prescribed_set_id: Uuid,
    ) -> Result<Option<PrescribedSet>> {
        Ok(self
            .prescribed_sets
            .iter()
            .find(|s| s.prescribed_set_id == prescribed_set_id)
            .cloned())
    }

    async fn find_sets_for_day(&mut self, day_id: Uuid) -> Result<Vec<ActualSetRecord>> {
        let mut records =
            self.records_where(|r| self.day_of_exercise(r.set.exercise_id) == Some(day_id));
        records.sort_by_key(|r| {
            (
                r.order_in_workout,
                self.exercise_position(r.set.exercise_id),
                r.set.set_number,
                r.set.completed_at,
            )
        });
        Ok(records)
    }

    async fn find_sets_for_block(&mut self, block_id: Uuid) -> Result<Vec<ActualSetRecord>> {
        let mut records = self.records_where(|r| r.block_id == block_id);
        records.sort_by_key(|r| {
            (
                r.week_number,
                r.day_number,
                r.order_in_workout,
                self.exercise_position(r.set.exercise_id),
                r.set.set_number,
                r.set.completed_at,
            )
        });
        Ok(records)
    }

    async fn find_sets_for_exercise(&mut self, exercise_id: Uuid) -> Result<Vec<ActualSetRecord>> {
        let mut records = self.records_where(|r| r.set.exercise_id == exercise_id);
        records.sort_by_key(|r| (r.set.completed_at, r.set.set_number));
        Ok(records)
    }

    async fn insert_actual_sets(&mut self, sets: &[ActualSet]) -> Result<()> {
        self.actual_sets.extend(sets.iter().cloned());
        Ok(())
    }

    async fn delete_actual_sets(&mut self, actual_set_ids: &[Uuid]) -> Result<u64> {
        let before = self.actual_sets.len();
        self.actual_sets
            .retain(|set| !actual_set_ids.contains(&set.actual_set_id));
        Ok((before - self.actual_sets.len()) as u64)
    }
}

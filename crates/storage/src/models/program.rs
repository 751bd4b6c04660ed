use uuid::Uuid;

use super::{Block, Exercise, PrescribedSet, Week, WorkoutDay};

/// A whole training block held as flat per-level arenas.
///
/// Children point at their parent by id; a parent's children are the arena
/// entries carrying its id, kept in `position` order. Both the builder and
/// the store produce the arenas already sorted that way.
#[derive(Debug, Clone)]
pub struct ProgramGraph {
    pub block: Block,
    pub weeks: Vec<Week>,
    pub days: Vec<WorkoutDay>,
    pub exercises: Vec<Exercise>,
    pub prescribed_sets: Vec<PrescribedSet>,
}

impl ProgramGraph {
    pub fn new(block: Block) -> Self {
        Self {
            block,
            weeks: Vec::new(),
            days: Vec::new(),
            exercises: Vec::new(),
            prescribed_sets: Vec::new(),
        }
    }

    pub fn block_id(&self) -> Uuid {
        self.block.block_id
    }

    pub fn days_of(&self, week_id: Uuid) -> impl Iterator<Item = &WorkoutDay> {
        self.days.iter().filter(move |day| day.week_id == week_id)
    }

    pub fn exercises_of(&self, day_id: Uuid) -> impl Iterator<Item = &Exercise> {
        self.exercises
            .iter()
            .filter(move |exercise| exercise.day_id == day_id)
    }

    pub fn prescribed_sets_of(&self, exercise_id: Uuid) -> impl Iterator<Item = &PrescribedSet> {
        self.prescribed_sets
            .iter()
            .filter(move |set| set.exercise_id == exercise_id)
    }

    /// Number of rows the graph occupies in storage, block included
    pub fn row_count(&self) -> usize {
        1 + self.weeks.len() + self.days.len() + self.exercises.len() + self.prescribed_sets.len()
    }
}

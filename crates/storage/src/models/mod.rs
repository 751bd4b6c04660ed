mod actual_set;
mod block;
mod exercise;
mod prescribed_set;
mod program;
mod week;
mod workout_day;
mod workout_key;

pub use actual_set::{ActualSet, ActualSetRecord};
pub use block::Block;
pub use exercise::{Exercise, ExerciseCategory};
pub use prescribed_set::{PrescribedSet, Tempo};
pub use program::ProgramGraph;
pub use week::{Week, WeekType};
pub use workout_day::WorkoutDay;
pub use workout_key::WorkoutKey;

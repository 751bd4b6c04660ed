pub mod blocks;
pub mod exercises;
pub mod workouts;

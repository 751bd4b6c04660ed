mod numeric;
pub mod program_builder;
pub mod workout_aggregator;

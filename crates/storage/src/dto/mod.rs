pub mod block;
pub mod workout;

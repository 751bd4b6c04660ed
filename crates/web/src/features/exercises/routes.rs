use axum::{Router, routing::get};
use storage::Database;

use super::handlers::get_exercise_sets;

pub fn routes() -> Router<Database> {
    Router::new().route("/:exercise_id/actual-sets", get(get_exercise_sets))
}

use async_trait::async_trait;
use sqlx::{PgConnection, Postgres, QueryBuilder};
use uuid::Uuid;

use super::TrainingStore;
use crate::error::Result;
use crate::models::{
    ActualSet, ActualSetRecord, Block, Exercise, PrescribedSet, ProgramGraph, Week, WorkoutDay,
    WorkoutKey,
};

/// Rows per multi-row INSERT, keeps the widest table well under the
/// 65535 bind parameter limit
const INSERT_CHUNK: usize = 1000;

const RECORD_SELECT: &str = r#"
    SELECT a.actual_set_id, a.exercise_id, a.prescribed_set_id, a.set_number,
           a.actual_weight, a.actual_reps, a.actual_rpe, a.tempo_used,
           a.video_recorded, a.feedback, a.completed_at,
           e.name AS exercise_name, e.order_in_workout,
           w.block_id, w.week_number, d.day_number
    FROM actual_sets a
    JOIN exercises e ON e.exercise_id = a.exercise_id
    JOIN workout_days d ON d.day_id = e.day_id
    JOIN weeks w ON w.week_id = d.week_id
"#;

fn record_query(filter_and_order: &str) -> String {
    format!("{RECORD_SELECT} {filter_and_order}")
}

/// PostgreSQL store bound to one connection, normally the one behind an
/// open `sqlx::Transaction`.
pub struct PgTrainingStore<'c> {
    conn: &'c mut PgConnection,
}

impl<'c> PgTrainingStore<'c> {
    pub fn new(conn: &'c mut PgConnection) -> Self {
        Self { conn }
    }

    async fn insert_block(&mut self, block: &Block) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO training_blocks (
                block_id, created_by_user_id, assigned_to_user_id, block_length,
                progression_rate, deload_rate, macrocycle, mesocycle, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(block.block_id)
        .bind(block.created_by_user_id)
        .bind(block.assigned_to_user_id)
        .bind(block.block_length)
        .bind(block.progression_rate)
        .bind(block.deload_rate)
        .bind(&block.macrocycle)
        .bind(&block.mesocycle)
        .bind(block.created_at)
        .execute(&mut *self.conn)
        .await?;

        Ok(())
    }

    async fn insert_weeks(&mut self, weeks: &[Week]) -> Result<()> {
        for chunk in weeks.chunks(INSERT_CHUNK) {
            let mut query = QueryBuilder::<Postgres>::new(
                "INSERT INTO weeks (week_id, block_id, position, week_number, week_type, start_date, end_date) ",
            );
            query.push_values(chunk, |mut row, week| {
                row.push_bind(week.week_id)
                    .push_bind(week.block_id)
                    .push_bind(week.position)
                    .push_bind(week.week_number)
                    .push_bind(week.week_type)
                    .push_bind(week.start_date)
                    .push_bind(week.end_date);
            });
            query.build().execute(&mut *self.conn).await?;
        }

        Ok(())
    }

    async fn insert_days(&mut self, days: &[WorkoutDay]) -> Result<()> {
        for chunk in days.chunks(INSERT_CHUNK) {
            let mut query = QueryBuilder::<Postgres>::new(
                "INSERT INTO workout_days (day_id, week_id, position, day_number, day_name, rest_day) ",
            );
            query.push_values(chunk, |mut row, day| {
                row.push_bind(day.day_id)
                    .push_bind(day.week_id)
                    .push_bind(day.position)
                    .push_bind(day.day_number)
                    .push_bind(day.day_name.clone())
                    .push_bind(day.rest_day);
            });
            query.build().execute(&mut *self.conn).await?;
        }

        Ok(())
    }

    async fn insert_exercises(&mut self, exercises: &[Exercise]) -> Result<()> {
        for chunk in exercises.chunks(INSERT_CHUNK) {
            let mut query = QueryBuilder::<Postgres>::new(
                "INSERT INTO exercises (exercise_id, day_id, position, name, category, order_in_workout) ",
            );
            query.push_values(chunk, |mut row, exercise| {
                row.push_bind(exercise.exercise_id)
                    .push_bind(exercise.day_id)
                    .push_bind(exercise.position)
                    .push_bind(exercise.name.clone())
                    .push_bind(exercise.category)
                    .push_bind(exercise.order_in_workout);
            });
            query.build().execute(&mut *self.conn).await?;
        }

        Ok(())
    }

    async fn insert_prescribed_sets(&mut self, sets: &[PrescribedSet]) -> Result<()> {
        for chunk in sets.chunks(INSERT_CHUNK) {
            let mut query = QueryBuilder::<Postgres>::new(
                r#"
                INSERT INTO prescribed_sets (
                    prescribed_set_id, exercise_id, position, set_number, target_sets,
                    target_reps, target_load_min, target_load_max, target_rpe, tempo,
                    video_required
                )
                "#,
            );
            query.push_values(chunk, |mut row, set| {
                row.push_bind(set.prescribed_set_id)
                    .push_bind(set.exercise_id)
                    .push_bind(set.position)
                    .push_bind(set.set_number)
                    .push_bind(set.target_sets)
                    .push_bind(set.target_reps)
                    .push_bind(set.target_load_min)
                    .push_bind(set.target_load_max)
                    .push_bind(set.target_rpe)
                    .push_bind(set.tempo)
                    .push_bind(set.video_required);
            });
            query.build().execute(&mut *self.conn).await?;
        }

        Ok(())
    }
}

#[async_trait]
impl TrainingStore for PgTrainingStore<'_> {
    async fn user_exists(&mut self, user_id: Uuid) -> Result<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE user_id = $1)")
                .bind(user_id)
                .fetch_one(&mut *self.conn)
                .await?;

        Ok(exists)
    }

    async fn insert_program(&mut self, program: &ProgramGraph) -> Result<()> {
        // Parents first so every foreign key already resolves
        self.insert_block(&program.block).await?;
        self.insert_weeks(&program.weeks).await?;
        self.insert_days(&program.days).await?;
        self.insert_exercises(&program.exercises).await?;
        self.insert_prescribed_sets(&program.prescribed_sets).await?;

        Ok(())
    }

    async fn load_program(&mut self, block_id: Uuid) -> Result<Option<ProgramGraph>> {
        let block = sqlx::query_as::<_, Block>(
            r#"
            SELECT block_id, created_by_user_id, assigned_to_user_id, block_length,
                   progression_rate, deload_rate, macrocycle, mesocycle, created_at
            FROM training_blocks
            WHERE block_id = $1
            "#,
        )
        .bind(block_id)
        .fetch_optional(&mut *self.conn)
        .await?;

        let Some(block) = block else {
            return Ok(None);
        };

        let weeks = sqlx::query_as::<_, Week>(
            r#"
            SELECT week_id, block_id, position, week_number, week_type, start_date, end_date
            FROM weeks
            WHERE block_id = $1
            ORDER BY position
            "#,
        )
        .bind(block_id)
        .fetch_all(&mut *self.conn)
        .await?;

        let days = sqlx::query_as::<_, WorkoutDay>(
            r#"
            SELECT d.day_id, d.week_id, d.position, d.day_number, d.day_name, d.rest_day
            FROM workout_days d
            JOIN weeks w ON w.week_id = d.week_id
            WHERE w.block_id = $1
            ORDER BY w.position, d.position
            "#,
        )
        .bind(block_id)
        .fetch_all(&mut *self.conn)
        .await?;

        let exercises = sqlx::query_as::<_, Exercise>(
            r#"
            SELECT e.exercise_id, e.day_id, e.position, e.name, e.category, e.order_in_workout
            FROM exercises e
            JOIN workout_days d ON d.day_id = e.day_id
            JOIN weeks w ON w.week_id = d.week_id
            WHERE w.block_id = $1
            ORDER BY w.position, d.position, e.position
            "#,
        )
        .bind(block_id)
        .fetch_all(&mut *self.conn)
        .await?;

        let prescribed_sets = sqlx::query_as::<_, PrescribedSet>(
            r#"
            SELECT ps.prescribed_set_id, ps.exercise_id, ps.position, ps.set_number,
                   ps.target_sets, ps.target_reps, ps.target_load_min, ps.target_load_max,
                   ps.target_rpe, ps.tempo, ps.video_required
            FROM prescribed_sets ps
            JOIN exercises e ON e.exercise_id = ps.exercise_id
            JOIN workout_days d ON d.day_id = e.day_id
            JOIN weeks w ON w.week_id = d.week_id
            WHERE w.block_id = $1
            ORDER BY w.position, d.position, e.position, ps.position
            "#,
        )
        .bind(block_id)
        .fetch_all(&mut *self.conn)
        .await?;

        Ok(Some(ProgramGraph {
            block,
            weeks,
            days,
            exercises,
            prescribed_sets,
        }))
    }

    async fn block_exists(&mut self, block_id: Uuid) -> Result<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM training_blocks WHERE block_id = $1)",
        )
        .bind(block_id)
        .fetch_one(&mut *self.conn)
        .await?;

        Ok(exists)
    }

    async fn find_day(&mut self, key: WorkoutKey) -> Result<Option<WorkoutDay>> {
        let day = sqlx::query_as::<_, WorkoutDay>(
            r#"
            SELECT d.day_id, d.week_id, d.position, d.day_number, d.day_name, d.rest_day
            FROM workout_days d
            JOIN weeks w ON w.week_id = d.week_id
            WHERE w.block_id = $1 AND w.week_number = $2 AND d.day_number = $3
            ORDER BY w.position, d.position
            LIMIT 1
            "#,
        )
        .bind(key.block_id)
        .bind(key.week_number)
        .bind(key.day_number)
        .fetch_optional(&mut *self.conn)
        .await?;

        Ok(day)
    }

    async fn find_exercise(&mut self, exercise_id: Uuid) -> Result<Option<Exercise>> {
        let exercise = sqlx::query_as::<_, Exercise>(
            r#"
            SELECT exercise_id, day_id, position, name, category, order_in_workout
            FROM exercises
            WHERE exercise_id = $1
            "#,
        )
        .bind(exercise_id)
        .fetch_optional(&mut *self.conn)
        .await?;

        Ok(exercise)
    }

    async fn find_prescribed_set(
        &mut self,
        prescribed_set_id: Uuid,
    ) -> Result<Option<PrescribedSet>> {
        let set = sqlx::query_as::<_, PrescribedSet>(
            r#"
            SELECT prescribed_set_id, exercise_id, position, set_number, target_sets,
                   target_reps, target_load_min, target_load_max, target_rpe, tempo,
                   video_required
            FROM prescribed_sets
            WHERE prescribed_set_id = $1
            "#,
        )
        .bind(prescribed_set_id)
        .fetch_optional(&mut *self.conn)
        .await?;

        Ok(set)
    }

    async fn find_sets_for_day(&mut self, day_id: Uuid) -> Result<Vec<ActualSetRecord>> {
        let sql = record_query(
            "WHERE e.day_id = $1 ORDER BY e.order_in_workout, e.position, a.set_number, a.completed_at",
        );
        let records = sqlx::query_as::<_, ActualSetRecord>(&sql)
            .bind(day_id)
            .fetch_all(&mut *self.conn)
            .await?;

        Ok(records)
    }

    async fn find_sets_for_block(&mut self, block_id: Uuid) -> Result<Vec<ActualSetRecord>> {
        let sql = record_query(
            r#"
            WHERE w.block_id = $1
            ORDER BY w.week_number, d.day_number, e.order_in_workout, e.position,
                     a.set_number, a.completed_at
            "#,
        );
        let records = sqlx::query_as::<_, ActualSetRecord>(&sql)
            .bind(block_id)
            .fetch_all(&mut *self.conn)
            .await?;

        Ok(records)
    }

    async fn find_sets_for_exercise(&mut self, exercise_id: Uuid) -> Result<Vec<ActualSetRecord>> {
        let sql = record_query("WHERE a.exercise_id = $1 ORDER BY a.completed_at, a.set_number");
        let records = sqlx::query_as::<_, ActualSetRecord>(&sql)
            .bind(exercise_id)
            .fetch_all(&mut *self.conn)
            .await?;

        Ok(records)
    }

    async fn insert_actual_sets(&mut self, sets: &[ActualSet]) -> Result<()> {
        for chunk in sets.chunks(INSERT_CHUNK) {
            let mut query = QueryBuilder::<Postgres>::new(
                r#"
                INSERT INTO actual_sets (
                    actual_set_id, exercise_id, prescribed_set_id, set_number, actual_weight,
                    actual_reps, actual_rpe, tempo_used, video_recorded, feedback, completed_at
                )
                "#,
            );
            query.push_values(chunk, |mut row, set| {
                row.push_bind(set.actual_set_id)
                    .push_bind(set.exercise_id)
                    .push_bind(set.prescribed_set_id)
                    .push_bind(set.set_number)
                    .push_bind(set.actual_weight)
                    .push_bind(set.actual_reps)
                    .push_bind(set.actual_rpe)
                    .push_bind(set.tempo_used)
                    .push_bind(set.video_recorded)
                    .push_bind(set.feedback.clone())
                    .push_bind(set.completed_at);
            });
            query.build().execute(&mut *self.conn).await?;
        }

        Ok(())
    }

    async fn delete_actual_sets(&mut self, actual_set_ids: &[Uuid]) -> Result<u64> {
        if actual_set_ids.is_empty() {
            return Ok(0);
        }

        let result = sqlx::query("DELETE FROM actual_sets WHERE actual_set_id = ANY($1)")
            .bind(actual_set_ids)
            .execute(&mut *self.conn)
            .await?;

        Ok(result.rows_affected())
    }
}

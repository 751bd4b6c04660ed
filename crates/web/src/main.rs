use anyhow::Context;
use axum::Router;
use storage::Database;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod config;
mod error;
mod extract;
mod features;
mod middleware;

use config::Config;
use middleware::auth::ApiKeys;

#[derive(OpenApi)]
#[openapi(
    paths(
        features::blocks::handlers::create_block,
        features::blocks::handlers::get_block,
        features::blocks::handlers::get_block_progress,
        features::workouts::handlers::get_workout,
        features::workouts::handlers::log_workout,
        features::workouts::handlers::delete_workout,
        features::exercises::handlers::get_exercise_sets,
    ),
    components(
        schemas(
            storage::dto::block::CreateBlockRequest,
            storage::dto::block::CreateWeekRequest,
            storage::dto::block::CreateWorkoutDayRequest,
            storage::dto::block::CreateExerciseRequest,
            storage::dto::block::CreatePrescribedSetRequest,
            storage::dto::block::BlockResponse,
            storage::dto::block::WeekResponse,
            storage::dto::block::WorkoutDayResponse,
            storage::dto::block::ExerciseResponse,
            storage::dto::block::PrescribedSetResponse,
            storage::dto::workout::LogWorkoutRequest,
            storage::dto::workout::LogExerciseRequest,
            storage::dto::workout::LogActualSetRequest,
            storage::dto::workout::WorkoutResponse,
            storage::dto::workout::WorkoutExerciseResponse,
            storage::dto::workout::ActualSetResponse,
            storage::models::WeekType,
            storage::models::ExerciseCategory,
            storage::models::Tempo,
        )
    ),
    tags(
        (name = "blocks", description = "Training block creation and progress"),
        (name = "workouts", description = "Logging and reading performed workouts"),
        (name = "exercises", description = "Per-exercise history"),
    ),
    modifiers(&SecurityAddon)
)]
struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::HttpBuilder::new()
                        .scheme(utoipa::openapi::security::HttpAuthScheme::Bearer)
                        .bearer_format("API Key")
                        .build(),
                ),
            )
        }
    }
}

fn api_routes(api_keys: ApiKeys) -> Router<Database> {
    Router::new()
        .nest("/blocks", features::blocks::routes::routes(api_keys.clone()))
        .nest("/workouts", features::workouts::routes::routes(api_keys))
        .nest("/exercises", features::exercises::routes::routes())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("Starting training tracker API");

    let config = Config::from_env().context("Failed to load API configuration")?;
    tracing::info!("Configuration loaded successfully");

    tracing::info!(
        "Connecting to database at: {}",
        config
            .database_url
            .split('@')
            .next_back()
            .unwrap_or("unknown")
    );
    let db = Database::with_max_connections(&config.database_url, config.database_max_connections)
        .await
        .context("Failed to initialize database")?;
    tracing::info!("Database connection established");

    tracing::info!("Running database migrations");
    db.run_migrations()
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Database migrations completed successfully");

    let api_keys = ApiKeys::from_comma_separated(&config.api_keys);
    if api_keys.is_empty() {
        tracing::warn!("API_KEYS is empty, every write endpoint will answer 401");
    }

    let app = Router::new()
        .nest("/api", api_routes(api_keys))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(db);

    let bind_address = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {bind_address}"))?;

    tracing::info!("Starting server at http://{}", bind_address);
    tracing::info!("Swagger UI available at http://{}/swagger-ui/", bind_address);

    axum::serve(listener, app).await?;

    Ok(())
}

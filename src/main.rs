use axum::Router;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use tripwise::config::Config;
use tripwise::db::{KnowledgeStore, PgKnowledgeStore};
use tripwise::services::day_balancer::DayBalancer;
use tripwise::services::day_planner::DayPlanner;
use tripwise::services::llm::LlmClient;
use tripwise::services::rag::RagOrchestrator;
use tripwise::services::tokens::TokenCounter;
use tripwise::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tripwise=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env().map_err(|e| format!("Failed to load configuration: {}", e))?;

    tracing::info!("Starting Tripwise API server");
    tracing::info!(
        context_token_budget = config.rag.context_token_budget,
        retrieval_limit = config.rag.retrieval_limit,
        encoding = %config.rag.token_encoding,
        max_iterations = config.balancer.max_iterations,
        "Configuration loaded successfully"
    );

    // Create database connection pool
    tracing::info!("Connecting to database...");
    let db_pool = tripwise::db::create_pool(&config.database_url).await?;
    tracing::info!("Database connection established");

    // Run migrations
    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations").run(&db_pool).await?;
    tracing::info!("Database migrations completed");

    // Initialize services
    let store: Arc<dyn KnowledgeStore> = Arc::new(PgKnowledgeStore::new(db_pool.clone()));
    let llm = Arc::new(LlmClient::new(config.llm.clone())?);
    let tokens = Arc::new(TokenCounter::new(config.rag.token_encoding));
    let rag = RagOrchestrator::new(
        store,
        llm.clone(),
        llm,
        tokens.clone(),
        config.rag.clone(),
    );
    let planner = DayPlanner::new(DayBalancer::new(config.balancer.clone()));

    // Create application state
    let state = Arc::new(AppState {
        planner,
        rag,
        tokens,
    });

    // Build router with CORS and tracing
    let app = Router::new()
        .nest(
            "/api/v1",
            tripwise::routes::create_router(state)
                .merge(tripwise::routes::create_pg_router(db_pool)),
        )
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr = config.server_address();
    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

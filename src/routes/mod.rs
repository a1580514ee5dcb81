pub mod assistant;
pub mod debug;
pub mod itinerary;

use axum::{routing::{get, post}, Router};
use sqlx::PgPool;
use std::sync::Arc;

use crate::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/itineraries/balance", post(itinerary::balance_days))
        .route("/itineraries/plan", post(itinerary::plan_days))
        .route("/itineraries/{id}/ask", post(assistant::ask))
        .route("/itineraries/{id}/knowledge", get(assistant::knowledge_status))
        .route("/debug/health", get(debug::health_check))
        .with_state(state)
}

/// Routes that need a live database connection.
pub fn create_pg_router(db_pool: PgPool) -> Router {
    Router::new()
        .route("/debug/database", get(debug::database_check))
        .with_state(db_pool)
}

// Library exports for testing and reusability

pub mod config;
pub mod constants;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use error::{AppError, Result};

use services::day_planner::DayPlanner;
use services::rag::RagOrchestrator;
use services::tokens::TokenCounter;
use std::sync::Arc;

// App state for sharing across the application
pub struct AppState {
    pub planner: DayPlanner,
    pub rag: RagOrchestrator,
    pub tokens: Arc<TokenCounter>,
}

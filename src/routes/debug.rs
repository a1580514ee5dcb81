use crate::AppState;
use axum::{extract::State, Json};
use serde_json::{json, Value};
use sqlx::PgPool;
use std::sync::Arc;

/// GET /debug/health - Check if services are working
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<Value> {
    let mut status = json!({
        "status": "ok",
        "checks": {}
    });

    // Loads the tokenizer on first call
    match state.tokens.count("health") {
        Ok(_) => {
            status["checks"]["tokenizer"] = json!(state.tokens.encoding().to_string());
        }
        Err(e) => {
            status["checks"]["tokenizer"] = json!({"error": e.to_string()});
            status["status"] = json!("error");
        }
    }

    Json(status)
}

/// GET /debug/database - Check database and pgvector availability
pub async fn database_check(State(pool): State<PgPool>) -> Json<Value> {
    let mut status = json!({
        "status": "ok",
        "checks": {}
    });

    match sqlx::query("SELECT 1").fetch_one(&pool).await {
        Ok(_) => {
            status["checks"]["database"] = json!("ok");
        }
        Err(e) => {
            status["checks"]["database"] = json!({"error": e.to_string()});
            status["status"] = json!("error");
        }
    }

    match sqlx::query_scalar::<_, String>(
        "SELECT extversion FROM pg_extension WHERE extname = 'vector'",
    )
    .fetch_optional(&pool)
    .await
    {
        Ok(Some(version)) => {
            status["checks"]["pgvector"] = json!(version);
        }
        Ok(None) => {
            status["checks"]["pgvector"] = json!({"error": "extension not installed"});
            status["status"] = json!("error");
        }
        Err(e) => {
            status["checks"]["pgvector"] = json!({"error": e.to_string()});
            status["status"] = json!("error");
        }
    }

    match sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM knowledge_chunks")
        .fetch_one(&pool)
        .await
    {
        Ok(count) => {
            status["checks"]["chunk_count"] = json!(count);
        }
        Err(e) => {
            status["checks"]["chunk_count"] = json!({"error": e.to_string()});
        }
    }

    Json(status)
}

use crate::error::{AppError, Result};
use crate::models::{AnswerPayload, AskRequest, KnowledgeStatus};
use crate::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

/// POST /itineraries/{id}/ask
/// Answer a question grounded in the itinerary's knowledge base
pub async fn ask(
    State(state): State<Arc<AppState>>,
    Path(itinerary_id): Path<Uuid>,
    Json(request): Json<AskRequest>,
) -> Result<Json<AnswerPayload>> {
    request.validate().map_err(AppError::InvalidRequest)?;

    let payload = state.rag.ask(&request.question, itinerary_id).await?;
    Ok(Json(payload))
}

/// GET /itineraries/{id}/knowledge
pub async fn knowledge_status(
    State(state): State<Arc<AppState>>,
    Path(itinerary_id): Path<Uuid>,
) -> Result<Json<KnowledgeStatus>> {
    Ok(Json(state.rag.status(itinerary_id).await?))
}

use crate::error::{AppError, Result};
use crate::models::{BalanceOutcome, BalanceRequest, DayCluster, PlanDaysRequest};
use crate::AppState;
use axum::{extract::State, Json};
use std::sync::Arc;

/// POST /itineraries/balance
/// Even out an already clustered day partition
pub async fn balance_days(
    State(state): State<Arc<AppState>>,
    Json(request): Json<BalanceRequest>,
) -> Result<Json<BalanceOutcome>> {
    request.validate().map_err(AppError::InvalidRequest)?;

    tracing::info!(
        clusters = request.clusters.len(),
        day_count = request.day_count,
        "Balance request: {} clusters over {} days",
        request.clusters.len(),
        request.day_count
    );

    let outcome = state.planner.balancer().balance(
        request.clusters,
        request.day_count,
        &request.start_point,
    );

    Ok(Json(outcome))
}

/// POST /itineraries/plan
/// Cluster raw activities into days, then balance them
pub async fn plan_days(
    State(state): State<Arc<AppState>>,
    Json(request): Json<PlanDaysRequest>,
) -> Result<Json<BalanceOutcome>> {
    request.validate().map_err(AppError::InvalidRequest)?;

    tracing::info!(
        activities = request.activities.len(),
        day_count = request.day_count,
        "Plan request: {} activities over {} days",
        request.activities.len(),
        request.day_count
    );

    let outcome = state
        .planner
        .plan(request.activities, request.day_count, &request.start_point);

    tracing::debug!(
        minutes_per_day = ?outcome
            .days
            .iter()
            .map(DayCluster::total_duration_minutes)
            .collect::<Vec<_>>(),
        "Planned visiting time per day"
    );

    Ok(Json(outcome))
}

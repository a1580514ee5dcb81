use crate::constants::MAX_TRIP_DAYS;
use crate::models::{Activity, Coordinates, DayCluster};
use serde::{Deserialize, Serialize};

/// Allowed activity count per day for one balancing run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DayBounds {
    pub target: usize,
    pub min_per_day: usize,
    pub max_per_day: usize,
}

impl DayBounds {
    pub fn contains(&self, len: usize) -> bool {
        len >= self.min_per_day && len <= self.max_per_day
    }
}

#[derive(Debug, Deserialize)]
pub struct BalanceRequest {
    pub clusters: Vec<DayCluster>,
    pub day_count: usize,
    pub start_point: Coordinates,
}

impl BalanceRequest {
    pub fn validate(&self) -> Result<(), String> {
        validate_day_count(self.day_count)?;
        self.start_point.validate()?;
        if self.clusters.iter().all(DayCluster::is_empty) {
            return Err("clusters must contain at least one activity".to_string());
        }
        for activity in self.clusters.iter().flat_map(|c| c.activities.iter()) {
            activity.coordinates.validate()?;
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct PlanDaysRequest {
    pub activities: Vec<Activity>,
    pub day_count: usize,
    pub start_point: Coordinates,
}

impl PlanDaysRequest {
    pub fn validate(&self) -> Result<(), String> {
        validate_day_count(self.day_count)?;
        self.start_point.validate()?;
        if self.activities.is_empty() {
            return Err("activities must not be empty".to_string());
        }
        for activity in &self.activities {
            activity.coordinates.validate()?;
        }
        Ok(())
    }
}

fn validate_day_count(day_count: usize) -> Result<(), String> {
    if !(1..=MAX_TRIP_DAYS).contains(&day_count) {
        return Err(format!("day_count must be between 1 and {}", MAX_TRIP_DAYS));
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize)]
pub struct BalanceOutcome {
    pub days: Vec<DayCluster>,
    pub bounds: DayBounds,
    pub iterations: usize,
    pub moves: usize,
    /// False when the run stopped with some day still outside `bounds`.
    /// This is a best-effort result, not an error.
    pub within_bounds: bool,
}

use crate::models::coordinates::{self, Coordinates};
use serde::{Deserialize, Serialize};

/// A geo-located candidate place for a trip day.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Activity {
    pub id: String,
    pub name: String,
    pub coordinates: Coordinates,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_duration_minutes: Option<u32>,
}

impl Activity {
    pub fn new(id: impl Into<String>, name: impl Into<String>, coordinates: Coordinates) -> Self {
        Activity {
            id: id.into(),
            name: name.into(),
            coordinates,
            category: None,
            suggested_duration_minutes: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_duration(mut self, minutes: u32) -> Self {
        self.suggested_duration_minutes = Some(minutes);
        self
    }
}

/// Activities assigned to one trip day. Order is insertion order and carries
/// no meaning; the day index is the cluster's position in the partition.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct DayCluster {
    pub activities: Vec<Activity>,
}

impl DayCluster {
    pub fn new(activities: Vec<Activity>) -> Self {
        DayCluster { activities }
    }

    pub fn len(&self) -> usize {
        self.activities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.activities.is_empty()
    }

    pub fn push(&mut self, activity: Activity) {
        self.activities.push(activity);
    }

    /// Mean coordinate of the day's activities, `None` when the day is empty.
    pub fn centroid(&self) -> Option<Coordinates> {
        coordinates::centroid(self.activities.iter().map(|a| &a.coordinates))
    }

    /// Index of the activity nearest to `target`; first one wins on ties.
    pub fn nearest_to(&self, target: &Coordinates) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (i, activity) in self.activities.iter().enumerate() {
            let d = activity.coordinates.distance_to(target);
            match best {
                Some((_, best_d)) if d >= best_d => {}
                _ => best = Some((i, d)),
            }
        }
        best.map(|(i, _)| i)
    }

    /// Total suggested visiting time, counting activities without a
    /// suggestion as zero.
    pub fn total_duration_minutes(&self) -> u32 {
        self.activities
            .iter()
            .filter_map(|a| a.suggested_duration_minutes)
            .sum()
    }
}

use crate::constants::DAY_PLANNER_REFINEMENT_ROUNDS;
use crate::models::coordinates::centroid;
use crate::models::{Activity, BalanceOutcome, Coordinates, DayCluster};
use crate::services::day_balancer::DayBalancer;

/// Splits a flat list of activities into geographically coherent days, then
/// hands the partition to the [`DayBalancer`].
pub struct DayPlanner {
    balancer: DayBalancer,
    refinement_rounds: usize,
}

impl DayPlanner {
    pub fn new(balancer: DayBalancer) -> Self {
        Self {
            balancer,
            refinement_rounds: DAY_PLANNER_REFINEMENT_ROUNDS,
        }
    }

    pub fn balancer(&self) -> &DayBalancer {
        &self.balancer
    }

    pub fn plan(
        &self,
        activities: Vec<Activity>,
        day_count: usize,
        start: &Coordinates,
    ) -> BalanceOutcome {
        let clusters = self.cluster(activities, day_count, start);
        self.balancer.balance(clusters, day_count, start)
    }

    /// Proximity clustering into `day_count` days.
    ///
    /// Seeds are picked by farthest-point selection, starting from the activity
    /// nearest `start`. Assignments are then refined k-means style until they
    /// stop changing or the round limit is reached. With fewer activities than
    /// days, each activity gets its own day and the remaining days stay empty.
    pub fn cluster(
        &self,
        activities: Vec<Activity>,
        day_count: usize,
        start: &Coordinates,
    ) -> Vec<DayCluster> {
        if day_count == 0 {
            return Vec::new();
        }

        if activities.len() <= day_count {
            let mut days: Vec<DayCluster> = activities
                .into_iter()
                .map(|a| DayCluster::new(vec![a]))
                .collect();
            days.resize_with(day_count, DayCluster::default);
            return days;
        }

        let points: Vec<Coordinates> = activities.iter().map(|a| a.coordinates).collect();
        let mut centers = seed_centers(&points, day_count, start);
        let mut assignment = assign(&points, &centers);

        for round in 0..self.refinement_rounds {
            for (day, center) in centers.iter_mut().enumerate() {
                let members = points
                    .iter()
                    .zip(&assignment)
                    .filter(|(_, d)| **d == day)
                    .map(|(p, _)| p);
                // An emptied day keeps its previous center.
                if let Some(c) = centroid(members) {
                    *center = c;
                }
            }

            let next = assign(&points, &centers);
            if next == assignment {
                tracing::debug!(rounds = round + 1, "Day clustering converged");
                break;
            }
            assignment = next;
        }

        let mut days = vec![DayCluster::default(); day_count];
        for (activity, day) in activities.into_iter().zip(assignment) {
            days[day].push(activity);
        }
        days
    }
}

fn seed_centers(points: &[Coordinates], k: usize, start: &Coordinates) -> Vec<Coordinates> {
    let mut centers = Vec::with_capacity(k);
    let first = nearest_index(start, points);
    centers.push(points[first]);

    while centers.len() < k {
        let mut best = (0, f64::NEG_INFINITY);
        for (i, p) in points.iter().enumerate() {
            let gap = centers
                .iter()
                .map(|c| c.distance_to(p))
                .fold(f64::INFINITY, f64::min);
            if gap > best.1 {
                best = (i, gap);
            }
        }
        centers.push(points[best.0]);
    }
    centers
}

fn assign(points: &[Coordinates], centers: &[Coordinates]) -> Vec<usize> {
    points.iter().map(|p| nearest_index(p, centers)).collect()
}

/// Index of the candidate nearest `target`; first one wins on ties.
/// `candidates` must be non-empty.
fn nearest_index(target: &Coordinates, candidates: &[Coordinates]) -> usize {
    let mut best = (0, f64::INFINITY);
    for (i, c) in candidates.iter().enumerate() {
        let d = target.distance_to(c);
        if d < best.1 {
            best = (i, d);
        }
    }
    best.0
}

use crate::config::BalancerConfig;
use crate::models::{BalanceOutcome, Coordinates, DayBounds, DayCluster};

/// Evens out activity counts across trip days by moving single activities
/// from the fullest day to the emptiest one.
///
/// This is a bounded greedy search, not an optimal assignment. Each move picks
/// the donor activity nearest to the receiving day's centroid so geography is
/// disturbed as little as possible. The run stops as soon as an iteration makes
/// no move, or after `max_iterations`. The result may still violate the
/// bounds (a day holding a single activity is never drained, and the iteration
/// ceiling may be hit); that is reported through `within_bounds`, never as an error.
pub struct DayBalancer {
    config: BalancerConfig,
}

impl Default for DayBalancer {
    fn default() -> Self {
        Self::new(BalancerConfig::default())
    }
}

impl DayBalancer {
    pub fn new(config: BalancerConfig) -> Self {
        Self { config }
    }

    /// Per-day bounds for `total` activities spread over `days` days.
    pub fn bounds(&self, total: usize, days: usize) -> DayBounds {
        let target = if days == 0 { 0 } else { total / days };
        DayBounds {
            target,
            min_per_day: self
                .config
                .min_activities_floor
                .max(target.saturating_sub(self.config.under_target_slack)),
            max_per_day: target + self.config.over_target_slack,
        }
    }

    /// Rebalance the partition. Takes ownership of the days and hands them back.
    ///
    /// When fewer clusters than `day_count` are supplied, empty days are appended
    /// first; an empty receiving day is biased toward `start` instead of a centroid.
    pub fn balance(
        &self,
        mut clusters: Vec<DayCluster>,
        day_count: usize,
        start: &Coordinates,
    ) -> BalanceOutcome {
        if clusters.len() < day_count {
            clusters.resize_with(day_count, DayCluster::default);
        }

        let total: usize = clusters.iter().map(DayCluster::len).sum();
        let bounds = self.bounds(total, clusters.len());

        tracing::debug!(
            total,
            days = clusters.len(),
            target = bounds.target,
            min_per_day = bounds.min_per_day,
            max_per_day = bounds.max_per_day,
            "Balancing {} activities over {} days",
            total,
            clusters.len()
        );

        let mut iterations = 0;
        let mut moves = 0;

        while !clusters.is_empty() && iterations < self.config.max_iterations {
            iterations += 1;

            if !self.transfer_one(&mut clusters, &bounds, start) {
                break;
            }
            moves += 1;
        }

        let within_bounds = clusters.iter().all(|c| bounds.contains(c.len()));
        if !within_bounds {
            tracing::warn!(
                iterations,
                moves,
                sizes = ?clusters.iter().map(DayCluster::len).collect::<Vec<_>>(),
                "Day balancing stopped with days outside [{}, {}]",
                bounds.min_per_day,
                bounds.max_per_day
            );
        }

        BalanceOutcome {
            days: clusters,
            bounds,
            iterations,
            moves,
            within_bounds,
        }
    }

    /// One iteration. Returns whether an activity was moved.
    fn transfer_one(
        &self,
        clusters: &mut [DayCluster],
        bounds: &DayBounds,
        start: &Coordinates,
    ) -> bool {
        let (min_idx, max_idx) = smallest_and_largest(clusters);
        let min_len = clusters[min_idx].len();
        let max_len = clusters[max_idx].len();

        if min_len >= bounds.min_per_day && max_len <= bounds.max_per_day {
            return false;
        }

        let receiver_centroid = clusters[min_idx].centroid().unwrap_or(*start);

        let Some(pick) = clusters[max_idx].nearest_to(&receiver_centroid) else {
            return false;
        };

        // Never empty a day.
        if clusters[max_idx].len() <= 1 {
            return false;
        }

        let activity = clusters[max_idx].activities.remove(pick);
        tracing::debug!(
            activity = %activity.id,
            from_day = max_idx,
            to_day = min_idx,
            "Moving '{}' from day {} ({} activities) to day {} ({} activities)",
            activity.name,
            max_idx,
            max_len,
            min_idx,
            min_len
        );
        clusters[min_idx].push(activity);

        true
    }
}

/// Indices of the smallest and largest day; the first one wins on ties.
fn smallest_and_largest(clusters: &[DayCluster]) -> (usize, usize) {
    let mut min_idx = 0;
    let mut max_idx = 0;
    for (i, cluster) in clusters.iter().enumerate().skip(1) {
        if cluster.len() < clusters[min_idx].len() {
            min_idx = i;
        }
        if cluster.len() > clusters[max_idx].len() {
            max_idx = i;
        }
    }
    (min_idx, max_idx)
}

/// Balance with the default bounds and iteration ceiling, returning only the days.
pub fn balance_clusters(
    clusters: Vec<DayCluster>,
    day_count: usize,
    start: &Coordinates,
) -> Vec<DayCluster> {
    DayBalancer::default().balance(clusters, day_count, start).days
}

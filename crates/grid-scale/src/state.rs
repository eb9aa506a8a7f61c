//! Current scaling state of a cluster, derived from API records.

use grid_core::{ClusterDetails, ClusterStatus};

/// Bounds and worker counts in effect before scaling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CurrentScaling {
    pub min: i64,
    pub max: i64,
    pub desired_capacity: i64,
    /// Running worker nodes.
    pub workers: i64,
}

impl CurrentScaling {
    /// With autoscaling, bounds come from the cluster details and counts from
    /// the status. Without it, the workers list of the details is the only
    /// reliable source and every field takes its length.
    pub fn derive(
        details: &ClusterDetails,
        status: Option<&ClusterStatus>,
        auto_scaling_enabled: bool,
    ) -> Self {
        if !auto_scaling_enabled {
            let workers = details.workers.len() as i64;
            return Self {
                min: workers,
                max: workers,
                desired_capacity: workers,
                workers,
            };
        }

        Self {
            min: details.scaling.min,
            max: details.scaling.max,
            desired_capacity: status.map_or(0, |s| s.cluster.scaling.desired_capacity),
            workers: status.map_or(0, ClusterStatus::worker_count),
        }
    }
}

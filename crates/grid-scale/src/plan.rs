//! From command-line worker flags to defaulted scale arguments.

use grid_core::ScalingRequest;
use grid_ruleengine::Context;
use tracing::debug;

use crate::defaulting::{Scaling, ScalingConfig};
use crate::error::ScaleResult;
use crate::state::CurrentScaling;

/// Worker flags as given on the command line. `None` means the flag was not
/// supplied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScaleIntent {
    pub workers_min: Option<i64>,
    pub workers_max: Option<i64>,
    pub num_workers: Option<i64>,
}

impl ScaleIntent {
    pub fn scaling_config(&self, auto_scaling_enabled: bool, current: &CurrentScaling) -> ScalingConfig {
        ScalingConfig {
            auto_scaling_enabled: Some(auto_scaling_enabled),
            current_scaling_max: Some(current.max),
            current_scaling_min: Some(current.min),
            desired_num_workers: Some(self.num_workers.unwrap_or_default()),
            desired_num_workers_changed: Some(self.num_workers.is_some()),
            desired_scaling_max: Some(self.workers_max.unwrap_or_default()),
            desired_scaling_max_changed: Some(self.workers_max.is_some()),
            desired_scaling_min: Some(self.workers_min.unwrap_or_default()),
            desired_scaling_min_changed: Some(self.workers_min.is_some()),
        }
    }
}

/// Defaulted arguments of one `scale cluster` invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaleArguments {
    pub cluster_id: String,
    pub num_workers_desired: i64,
    pub workers_min: i64,
    pub workers_max: i64,
}

impl ScaleArguments {
    pub fn scaling(&self) -> ScalingRequest {
        ScalingRequest {
            min: self.workers_min,
            max: self.workers_max,
        }
    }
}

/// Run the defaulter for `intent` against the cluster's current state.
pub fn plan_scaling(
    ctx: &Context,
    cluster_id: &str,
    intent: &ScaleIntent,
    auto_scaling_enabled: bool,
    current: &CurrentScaling,
) -> ScaleResult<ScaleArguments> {
    let scaling = Scaling::new(intent.scaling_config(auto_scaling_enabled, current))?;
    let request = scaling.default_request(ctx, ScalingRequest::default());

    debug!(
        cluster = %cluster_id,
        from_min = current.min,
        from_max = current.max,
        to_min = request.min,
        to_max = request.max,
        "scaling planned"
    );

    Ok(ScaleArguments {
        cluster_id: cluster_id.to_string(),
        num_workers_desired: intent.num_workers.unwrap_or_default(),
        workers_min: request.min,
        workers_max: request.max,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn current(min: i64, max: i64) -> CurrentScaling {
        CurrentScaling {
            min,
            max,
            desired_capacity: max,
            workers: max,
        }
    }

    #[test]
    fn intent_maps_presence_to_changed_flags() {
        let intent = ScaleIntent {
            workers_min: Some(0),
            workers_max: None,
            num_workers: Some(4),
        };

        let config = intent.scaling_config(true, &current(3, 5));

        assert_eq!(config.desired_scaling_min, Some(0));
        assert_eq!(config.desired_scaling_min_changed, Some(true));
        assert_eq!(config.desired_scaling_max, Some(0));
        assert_eq!(config.desired_scaling_max_changed, Some(false));
        assert_eq!(config.desired_num_workers, Some(4));
        assert_eq!(config.desired_num_workers_changed, Some(true));
        assert_eq!(config.current_scaling_min, Some(3));
        assert_eq!(config.current_scaling_max, Some(5));
    }

    #[test]
    fn plan_with_num_workers() {
        let intent = ScaleIntent {
            num_workers: Some(7),
            ..ScaleIntent::default()
        };

        let args = plan_scaling(&Context::background(), "f01r4", &intent, true, &current(3, 5)).unwrap();

        assert_eq!(
            args,
            ScaleArguments {
                cluster_id: "f01r4".to_string(),
                num_workers_desired: 7,
                workers_min: 7,
                workers_max: 7,
            }
        );
        assert_eq!(args.scaling(), ScalingRequest { min: 7, max: 7 });
    }

    #[test]
    fn plan_zero_min_is_still_a_change() {
        let intent = ScaleIntent {
            workers_min: Some(0),
            ..ScaleIntent::default()
        };

        let args = plan_scaling(&Context::background(), "f01r4", &intent, true, &current(3, 5)).unwrap();

        assert_eq!(args.scaling(), ScalingRequest { min: 0, max: 5 });
    }
}

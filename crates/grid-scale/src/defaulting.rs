//! Scaling defaulter: fills `min`/`max` of a scaling request from the user's
//! flags and the cluster's current bounds.

use grid_core::ScalingRequest;
use grid_ruleengine::{Context, DefaultingRule, execute_defaulting};
use tracing::debug;

use crate::error::{ScaleError, ScaleResult};

/// Inputs to [`Scaling::new`]. Every field must be set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScalingConfig {
    pub auto_scaling_enabled: Option<bool>,
    pub current_scaling_max: Option<i64>,
    pub current_scaling_min: Option<i64>,
    pub desired_num_workers: Option<i64>,
    pub desired_num_workers_changed: Option<bool>,
    pub desired_scaling_max: Option<i64>,
    pub desired_scaling_max_changed: Option<bool>,
    pub desired_scaling_min: Option<i64>,
    pub desired_scaling_min_changed: Option<bool>,
}

/// Immutable snapshot of one defaulting pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scaling {
    auto_scaling_enabled: bool,
    current_scaling_max: i64,
    current_scaling_min: i64,
    desired_num_workers: i64,
    desired_num_workers_changed: bool,
    desired_scaling_max: i64,
    desired_scaling_max_changed: bool,
    desired_scaling_min: i64,
    desired_scaling_min_changed: bool,
}

fn required<T>(value: Option<T>, field: &str) -> ScaleResult<T> {
    value.ok_or_else(|| {
        let type_name = std::any::type_name::<ScalingConfig>()
            .rsplit("::")
            .next()
            .unwrap_or("ScalingConfig");
        ScaleError::InvalidConfig(format!("{type_name}.{field} must not be empty"))
    })
}

impl Scaling {
    /// Build the snapshot, rejecting any missing field with
    /// [`ScaleError::InvalidConfig`]. `auto_scaling_enabled` is checked first.
    pub fn new(config: ScalingConfig) -> ScaleResult<Self> {
        Ok(Self {
            auto_scaling_enabled: required(config.auto_scaling_enabled, "auto_scaling_enabled")?,
            current_scaling_max: required(config.current_scaling_max, "current_scaling_max")?,
            current_scaling_min: required(config.current_scaling_min, "current_scaling_min")?,
            desired_num_workers: required(config.desired_num_workers, "desired_num_workers")?,
            desired_num_workers_changed: required(
                config.desired_num_workers_changed,
                "desired_num_workers_changed",
            )?,
            desired_scaling_max: required(config.desired_scaling_max, "desired_scaling_max")?,
            desired_scaling_max_changed: required(
                config.desired_scaling_max_changed,
                "desired_scaling_max_changed",
            )?,
            desired_scaling_min: required(config.desired_scaling_min, "desired_scaling_min")?,
            desired_scaling_min_changed: required(
                config.desired_scaling_min_changed,
                "desired_scaling_min_changed",
            )?,
        })
    }

    /// Return `scaling` with `min` and `max` populated.
    ///
    /// Pure: the snapshot is not modified and the context is only passed on.
    pub fn default_request(&self, ctx: &Context, mut scaling: ScalingRequest) -> ScalingRequest {
        execute_defaulting(ctx, &self.rules(), &mut scaling);

        debug!(
            auto_scaling = self.auto_scaling_enabled,
            min = scaling.min,
            max = scaling.max,
            "scaling request defaulted"
        );

        scaling
    }

    fn rules(&self) -> Vec<DefaultingRule<'_, ScalingRequest>> {
        vec![
            DefaultingRule::new(move |s: &mut ScalingRequest| s.min = self.desired_scaling_min)
                .when(move || self.auto_scaling_enabled)
                .when(move || self.desired_scaling_min_changed),
            DefaultingRule::new(move |s: &mut ScalingRequest| s.max = self.desired_scaling_max)
                .when(move || self.auto_scaling_enabled)
                .when(move || self.desired_scaling_max_changed),
            DefaultingRule::new(move |s: &mut ScalingRequest| s.min = self.current_scaling_min)
                .when(move || self.auto_scaling_enabled)
                .when(move || !self.desired_scaling_min_changed),
            DefaultingRule::new(move |s: &mut ScalingRequest| s.max = self.current_scaling_max)
                .when(move || self.auto_scaling_enabled)
                .when(move || !self.desired_scaling_max_changed),
            DefaultingRule::new(move |s: &mut ScalingRequest| {
                s.min = self.desired_num_workers;
                s.max = self.desired_num_workers;
            })
            .when(move || self.auto_scaling_enabled)
            .when(move || !self.desired_scaling_min_changed)
            .when(move || !self.desired_scaling_max_changed)
            .when(move || self.desired_num_workers_changed),
            DefaultingRule::new(move |s: &mut ScalingRequest| {
                s.min = self.desired_scaling_min;
                s.max = self.desired_scaling_min;
            })
            .when(move || !self.auto_scaling_enabled)
            .when(move || self.desired_scaling_min_changed),
            // Also fires after the rule above when both bounds are given.
            DefaultingRule::new(move |s: &mut ScalingRequest| {
                s.min = self.desired_scaling_max;
                s.max = self.desired_scaling_max;
            })
            .when(move || !self.auto_scaling_enabled)
            .when(move || self.desired_scaling_max_changed),
            DefaultingRule::new(move |s: &mut ScalingRequest| {
                s.min = self.desired_num_workers;
                s.max = self.desired_num_workers;
            })
            .when(move || !self.auto_scaling_enabled)
            .when(move || !self.desired_scaling_min_changed)
            .when(move || !self.desired_scaling_max_changed)
            .when(move || self.desired_num_workers_changed),
            DefaultingRule::new(move |s: &mut ScalingRequest| {
                s.min = self.current_scaling_max;
                s.max = self.current_scaling_max;
            })
            .when(move || !self.auto_scaling_enabled)
            .when(move || !self.desired_scaling_min_changed)
            .when(move || !self.desired_scaling_max_changed)
            .when(move || !self.desired_num_workers_changed),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Case {
        auto_scaling_enabled: bool,
        current: (i64, i64),
        desired_min: Option<i64>,
        desired_max: Option<i64>,
        num_workers: Option<i64>,
    }

    impl Case {
        fn config(&self) -> ScalingConfig {
            ScalingConfig {
                auto_scaling_enabled: Some(self.auto_scaling_enabled),
                current_scaling_min: Some(self.current.0),
                current_scaling_max: Some(self.current.1),
                desired_num_workers: Some(self.num_workers.unwrap_or(0)),
                desired_num_workers_changed: Some(self.num_workers.is_some()),
                desired_scaling_max: Some(self.desired_max.unwrap_or(0)),
                desired_scaling_max_changed: Some(self.desired_max.is_some()),
                desired_scaling_min: Some(self.desired_min.unwrap_or(0)),
                desired_scaling_min_changed: Some(self.desired_min.is_some()),
            }
        }

        fn run_from(&self, start: ScalingRequest) -> (i64, i64) {
            let scaling = Scaling::new(self.config()).unwrap();
            let out = scaling.default_request(&Context::background(), start);
            (out.min, out.max)
        }

        fn run(&self) -> (i64, i64) {
            self.run_from(ScalingRequest::default())
        }
    }

    fn autoscaling(current: (i64, i64)) -> Case {
        Case {
            auto_scaling_enabled: true,
            current,
            desired_min: None,
            desired_max: None,
            num_workers: None,
        }
    }

    fn fixed(current: (i64, i64)) -> Case {
        Case {
            auto_scaling_enabled: false,
            ..autoscaling(current)
        }
    }

    #[test]
    fn autoscaling_min_only_keeps_current_max() {
        let case = Case {
            desired_min: Some(2),
            ..autoscaling((3, 5))
        };
        assert_eq!(case.run(), (2, 5));
    }

    #[test]
    fn autoscaling_max_only_keeps_current_min() {
        let case = Case {
            desired_max: Some(5),
            ..autoscaling((3, 3))
        };
        assert_eq!(case.run(), (3, 5));
    }

    #[test]
    fn autoscaling_nothing_given_keeps_current() {
        assert_eq!(autoscaling((3, 5)).run(), (3, 5));
    }

    #[test]
    fn autoscaling_num_workers_pins_both() {
        let case = Case {
            num_workers: Some(7),
            ..autoscaling((3, 5))
        };
        assert_eq!(case.run(), (7, 7));
    }

    #[test]
    fn autoscaling_both_bounds() {
        let case = Case {
            desired_min: Some(2),
            desired_max: Some(9),
            ..autoscaling((3, 5))
        };
        assert_eq!(case.run(), (2, 9));
    }

    #[test]
    fn autoscaling_bound_beats_num_workers() {
        let case = Case {
            desired_min: Some(4),
            num_workers: Some(7),
            ..autoscaling((3, 5))
        };
        assert_eq!(case.run(), (4, 5));
    }

    #[test]
    fn fixed_min_only() {
        let case = Case {
            desired_min: Some(6),
            ..fixed((4, 4))
        };
        assert_eq!(case.run(), (6, 6));
    }

    #[test]
    fn fixed_max_only() {
        let case = Case {
            desired_max: Some(5),
            ..fixed((3, 3))
        };
        assert_eq!(case.run(), (5, 5));
    }

    #[test]
    fn fixed_both_bounds_takes_max() {
        let case = Case {
            desired_min: Some(2),
            desired_max: Some(8),
            ..fixed((4, 4))
        };
        assert_eq!(case.run(), (8, 8));
    }

    #[test]
    fn fixed_num_workers_pins_both() {
        let case = Case {
            num_workers: Some(5),
            ..fixed((3, 3))
        };
        assert_eq!(case.run(), (5, 5));
    }

    #[test]
    fn fixed_nothing_given_keeps_current() {
        assert_eq!(fixed((4, 4)).run(), (4, 4));
    }

    #[test]
    fn fixed_always_yields_equal_bounds() {
        let starts = [(0, 0), (1, 9), (7, 2)];
        let options = [None, Some(1), Some(6)];

        for start in starts {
            for desired_min in options {
                for desired_max in options {
                    for num_workers in options {
                        let case = Case {
                            desired_min,
                            desired_max,
                            num_workers,
                            ..fixed((3, 5))
                        };
                        let (min, max) = case.run_from(ScalingRequest {
                            min: start.0,
                            max: start.1,
                        });
                        assert_eq!(
                            min, max,
                            "start={start:?} min={desired_min:?} max={desired_max:?} workers={num_workers:?}"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn autoscaling_untouched_flags_restore_current_from_any_start() {
        for start in [(0, 0), (1, 9), (7, 2)] {
            let out = autoscaling((3, 5)).run_from(ScalingRequest {
                min: start.0,
                max: start.1,
            });
            assert_eq!(out, (3, 5));
        }
    }

    #[test]
    fn default_request_does_not_change_snapshot() {
        let case = Case {
            desired_min: Some(2),
            ..autoscaling((3, 5))
        };
        let scaling = Scaling::new(case.config()).unwrap();
        let before = scaling.clone();

        scaling.default_request(&Context::background(), ScalingRequest::default());
        let again = scaling.default_request(&Context::background(), ScalingRequest::default());

        assert_eq!(scaling, before);
        assert_eq!(again, ScalingRequest { min: 2, max: 5 });
    }

    #[test]
    fn missing_auto_scaling_enabled_is_invalid_config() {
        let config = ScalingConfig {
            auto_scaling_enabled: None,
            ..autoscaling((3, 5)).config()
        };

        let err = Scaling::new(config).unwrap_err();

        assert!(err.is_invalid_config());
        assert_eq!(
            err.to_string(),
            "invalid config: ScalingConfig.auto_scaling_enabled must not be empty"
        );
    }

    #[test]
    fn auto_scaling_enabled_is_checked_first() {
        let err = Scaling::new(ScalingConfig::default()).unwrap_err();
        assert!(err.to_string().contains("auto_scaling_enabled"));
    }

    #[test]
    fn any_missing_field_is_invalid_config() {
        let full = autoscaling((3, 5)).config();
        let variants = [
            ScalingConfig { current_scaling_max: None, ..full.clone() },
            ScalingConfig { current_scaling_min: None, ..full.clone() },
            ScalingConfig { desired_num_workers: None, ..full.clone() },
            ScalingConfig { desired_num_workers_changed: None, ..full.clone() },
            ScalingConfig { desired_scaling_max: None, ..full.clone() },
            ScalingConfig { desired_scaling_max_changed: None, ..full.clone() },
            ScalingConfig { desired_scaling_min: None, ..full.clone() },
            ScalingConfig { desired_scaling_min_changed: None, ..full.clone() },
        ];

        for config in variants {
            assert!(Scaling::new(config).unwrap_err().is_invalid_config());
        }
    }
}

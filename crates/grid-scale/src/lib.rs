//! grid-scale — turns `scale cluster` flags into a complete scaling request.
//!
//! The user may give any combination of `--workers-min`, `--workers-max` and
//! `--num-workers`. [`Scaling`] reconciles those against the cluster's current
//! bounds with an ordered rule list run by `grid-ruleengine`:
//!
//! ```text
//! #  autoscaling  precondition                         effect
//! 1  on           min given                            min = desired_min
//! 2  on           max given                            max = desired_max
//! 3  on           min not given                        min = current_min
//! 4  on           max not given                        max = current_max
//! 5  on           no min, no max, num_workers given    min = max = num_workers
//! 6  off          min given                            min = max = desired_min
//! 7  off          max given                            min = max = desired_max
//! 8  off          no min, no max, num_workers given    min = max = num_workers
//! 9  off          nothing given                        min = max = current_max
//! ```
//!
//! Rules never short-circuit each other, so when several write the same field
//! the last one wins. With autoscaling off and both bounds given, rule 7 wins
//! and both fields take the max.
//!
//! The defaulted request is then checked by [`validation::validate`] and, when
//! it would remove running workers, [`confirm::confirmation_prompt`] produces
//! the question to ask.

pub mod confirm;
pub mod defaulting;
pub mod error;
pub mod plan;
pub mod state;
pub mod validation;

pub use defaulting::{Scaling, ScalingConfig};
pub use error::{ScaleError, ScaleResult};
pub use plan::{ScaleArguments, ScaleIntent, plan_scaling};
pub use state::CurrentScaling;

//! Checks on defaulted scale arguments before anything is sent to the API.

use grid_core::Limits;
use grid_ruleengine::{Context, ValidationRule, execute_validation};

use crate::error::{ScaleError, ScaleResult};
use crate::plan::ScaleArguments;
use crate::state::CurrentScaling;

/// Validate `args` against the current state. The first failing check wins:
///
/// 1. not logged in
/// 2. nothing would change
/// 3. `--num-workers` combined with bounds that differ from it
/// 4. `--num-workers` below the minimum
/// 5. max below the minimum
/// 6. min below the minimum
/// 7. min above max
pub fn validate(
    ctx: &Context,
    args: &ScaleArguments,
    current: &CurrentScaling,
    limits: &Limits,
    logged_in: bool,
) -> ScaleResult<()> {
    let minimum = limits.minimum_num_workers;
    let desired_workers_exist = args.num_workers_desired > 0;
    let scaling_parameter_present = args.workers_max > 0 || args.workers_min > 0;
    let desired_workers_not_at_limits = args.num_workers_desired != args.workers_max
        || args.num_workers_desired != args.workers_min;

    let rules = vec![
        ValidationRule::new(|| Err(ScaleError::NotLoggedIn)).when(|| !logged_in),
        ValidationRule::new(|| Err(ScaleError::DesiredEqualsCurrentState))
            .when(|| current.max == args.workers_max)
            .when(|| current.min == args.workers_min),
        ValidationRule::new(|| Err(ScaleError::ConflictingWorkerFlags))
            .when(|| desired_workers_exist)
            .when(|| scaling_parameter_present)
            .when(|| desired_workers_not_at_limits),
        ValidationRule::new(|| Err(ScaleError::NotEnoughWorkerNodes))
            .when(|| desired_workers_exist)
            .when(|| args.num_workers_desired < minimum),
        ValidationRule::new(|| Err(ScaleError::CannotScaleBelowMinimumWorkers))
            .when(|| args.workers_max > 0)
            .when(|| args.workers_max < minimum),
        ValidationRule::new(|| Err(ScaleError::NotEnoughWorkerNodes))
            .when(|| args.workers_min > 0)
            .when(|| args.workers_min < minimum),
        ValidationRule::new(|| Err(ScaleError::WorkersMinMaxInvalid))
            .when(|| scaling_parameter_present)
            .when(|| args.workers_min > args.workers_max),
    ];

    execute_validation(ctx, &rules)
}

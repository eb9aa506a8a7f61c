use std::io::{BufRead, Write};

use anyhow::Context as _;
use grid_core::capabilities;
use grid_core::{Limits, ModifyClusterRequest, ScalingRequest};
use grid_ruleengine::Context;
use grid_scale::confirm::{confirmation_prompt, is_confirmed};
use grid_scale::validation::validate;
use grid_scale::{CurrentScaling, ScaleError, ScaleIntent, plan_scaling};
use tracing::info;

use super::{Session, cluster_has_capability};

const ACTIVITY: &str = "scale-cluster";

pub struct ScaleClusterArgs {
    pub cluster_id: String,
    pub intent: ScaleIntent,
    pub force: bool,
}

/// Bounds before and after a successful scaling call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaleOutcome {
    pub cluster_id: String,
    pub before: CurrentScaling,
    pub after: ScalingRequest,
}

impl ScaleOutcome {
    pub fn summary(&self) -> String {
        format!(
            "The cluster {} is being scaled.\n\
             Worker node limits changed from min = {}, max = {} to min = {}, max = {}.",
            self.cluster_id, self.before.min, self.before.max, self.after.min, self.after.max
        )
    }
}

/// Scale a cluster's worker bounds.
///
/// `confirm` is asked when more workers are running than the new maximum and
/// `--force` was not given; a refusal yields [`ScaleError::CommandAborted`].
pub async fn scale_cluster<F>(
    session: &Session,
    args: &ScaleClusterArgs,
    confirm: F,
) -> anyhow::Result<ScaleOutcome>
where
    F: FnOnce(&str) -> anyhow::Result<bool>,
{
    if !session.logged_in() {
        return Err(ScaleError::NotLoggedIn.into());
    }

    let client = session.client(ACTIVITY)?;
    let cluster_id = args.cluster_id.as_str();

    let details = client
        .get_cluster(cluster_id)
        .await
        .with_context(|| format!("fetching cluster {cluster_id}"))?;

    let auto_scaling =
        cluster_has_capability(&client, &details.release_version, &capabilities::autoscaling())
            .await?;

    let status = if auto_scaling {
        let status = client
            .get_cluster_status(cluster_id)
            .await
            .with_context(|| format!("fetching status of cluster {cluster_id}"))?;
        Some(status)
    } else {
        None
    };

    let current = CurrentScaling::derive(&details, status.as_ref(), auto_scaling);
    let ctx = Context::background();
    let planned = plan_scaling(&ctx, cluster_id, &args.intent, auto_scaling, &current)?;
    validate(&ctx, &planned, &current, &Limits::default(), session.logged_in())?;

    if !args.force
        && let Some(question) = confirmation_prompt(&planned, current.workers)
        && !confirm(&question)?
    {
        return Err(ScaleError::CommandAborted.into());
    }

    let updated = client
        .modify_cluster(
            cluster_id,
            &ModifyClusterRequest {
                scaling: planned.scaling(),
            },
        )
        .await
        .with_context(|| format!("scaling cluster {cluster_id}"))?;

    info!(
        cluster = %cluster_id,
        min = updated.scaling.min,
        max = updated.scaling.max,
        request_id = %client.request_id(),
        "cluster scaled"
    );

    Ok(ScaleOutcome {
        cluster_id: cluster_id.to_string(),
        before: current,
        after: updated.scaling,
    })
}

/// Ask `question` on stdin.
pub fn ask_stdin(question: &str) -> anyhow::Result<bool> {
    let mut stdout = std::io::stdout().lock();
    write!(stdout, "{question} [y/N] ")?;
    stdout.flush()?;

    let mut answer = String::new();
    std::io::stdin().lock().read_line(&mut answer)?;
    Ok(is_confirmed(&answer))
}

/// Headline and optional explanation shown for a scaling failure.
pub fn describe(err: &ScaleError) -> (String, Option<String>) {
    let (headline, subtext): (&str, Option<&str>) = match err {
        ScaleError::InvalidConfig(_) => ("Internal error while preparing the scaling request.", None),
        ScaleError::NotLoggedIn => (
            "You are not logged in.",
            Some("Please log in or pass an auth token with --auth-token."),
        ),
        ScaleError::DesiredEqualsCurrentState => (
            "Desired state equals the current state.",
            Some("The cluster already has the worker limits you asked for. Nothing to do."),
        ),
        ScaleError::ConflictingWorkerFlags => (
            "Conflicting flags used.",
            Some(
                "When specifying --num-workers, neither --workers-max nor --workers-min \
                 must be used with a different value.",
            ),
        ),
        ScaleError::NotEnoughWorkerNodes => (
            "Not enough worker nodes specified.",
            Some("The number of worker nodes must be at least the platform minimum."),
        ),
        ScaleError::CannotScaleBelowMinimumWorkers => (
            "Cannot scale below the minimum number of worker nodes.",
            Some("Please use a higher value for --workers-min or --workers-max."),
        ),
        ScaleError::WorkersMinMaxInvalid => (
            "Number of worker nodes is invalid.",
            Some("--workers-max must not be smaller than --workers-min."),
        ),
        ScaleError::CommandAborted => ("Scaling cancelled.", None),
    };

    let headline = match err {
        ScaleError::InvalidConfig(reason) => format!("{headline} ({reason})"),
        _ => headline.to_string(),
    };
    (headline, subtext.map(str::to_string))
}

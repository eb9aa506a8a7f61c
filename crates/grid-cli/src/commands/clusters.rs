use anyhow::{Context as _, bail};
use grid_core::ClusterListItem;
use tracing::info;

use super::{Session, render_table};

const LIST_ACTIVITY: &str = "list-clusters";
const DELETE_ACTIVITY: &str = "delete-cluster";

pub async fn list_clusters(session: &Session) -> anyhow::Result<String> {
    if !session.logged_in() {
        bail!("you are not logged in; use `gridctl login` or --auth-token");
    }

    let client = session.client(LIST_ACTIVITY)?;
    let clusters = client.list_clusters().await.context("listing clusters")?;
    Ok(format_clusters(clusters))
}

/// Clusters grouped by organization, then by ID.
pub fn format_clusters(mut clusters: Vec<ClusterListItem>) -> String {
    if clusters.is_empty() {
        return "No clusters\n".to_string();
    }

    clusters.sort_by(|a, b| a.owner.cmp(&b.owner).then_with(|| a.id.cmp(&b.id)));
    let rows: Vec<[String; 5]> = clusters
        .into_iter()
        .map(|c| {
            [
                c.id,
                or_na(c.name),
                or_na(short_date(&c.create_date).to_string()),
                or_na(c.owner),
                or_na(c.release_version),
            ]
        })
        .collect();

    render_table(["ID", "NAME", "CREATED", "ORGANIZATION", "RELEASE"], &rows)
}

/// `YYYY-MM-DD` part of an RFC 3339 timestamp.
fn short_date(timestamp: &str) -> &str {
    timestamp.get(..10).unwrap_or(timestamp)
}

fn or_na(value: String) -> String {
    if value.is_empty() {
        "n/a".to_string()
    } else {
        value
    }
}

pub struct DeleteClusterArgs {
    pub cluster_id: String,
    pub force: bool,
}

/// Outcome of `delete cluster`: `false` if the user declined.
pub async fn delete_cluster<F>(session: &Session, args: &DeleteClusterArgs, confirm: F) -> anyhow::Result<bool>
where
    F: FnOnce(&str) -> anyhow::Result<bool>,
{
    if !session.logged_in() {
        bail!("you are not logged in; use `gridctl login` or --auth-token");
    }
    if args.cluster_id.is_empty() {
        bail!("please select a cluster to delete");
    }

    if !args.force {
        let question = format!("Do you really want to delete cluster '{}'?", args.cluster_id);
        if !confirm(&question)? {
            return Ok(false);
        }
    }

    let client = session.client(DELETE_ACTIVITY)?;
    client
        .delete_cluster(&args.cluster_id)
        .await
        .with_context(|| format!("deleting cluster {}", args.cluster_id))?;

    info!(cluster = %args.cluster_id, "cluster deletion requested");
    Ok(true)
}

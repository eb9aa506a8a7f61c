use anyhow::Context as _;
use grid_core::ClusterDetails;
use grid_core::capabilities::{self, CapabilityDefinition};
use grid_scale::CurrentScaling;
use tracing::debug;

use super::Session;

const ACTIVITY: &str = "show-cluster";

pub async fn show_cluster(session: &Session, cluster_id: &str) -> anyhow::Result<()> {
    let client = session.client(ACTIVITY)?;
    let details = client
        .get_cluster(cluster_id)
        .await
        .with_context(|| format!("fetching cluster {cluster_id}"))?;

    let info = client
        .get_info()
        .await
        .context("fetching installation info")?;
    let capabilities =
        capabilities::capabilities_for(&info.general.provider, &details.release_version)?;
    let auto_scaling = capabilities
        .iter()
        .any(|c| c.name == capabilities::autoscaling().name);

    // Freshly created clusters have no status yet.
    let status = if auto_scaling {
        match client.get_cluster_status(cluster_id).await {
            Ok(status) => Some(status),
            Err(e) => {
                debug!(cluster = %cluster_id, error = %e, "cluster status unavailable");
                None
            }
        }
    } else {
        None
    };

    let current = (status.is_some() || !auto_scaling)
        .then(|| CurrentScaling::derive(&details, status.as_ref(), auto_scaling));

    print!(
        "{}",
        format_cluster(&details, current.as_ref(), auto_scaling, &capabilities)
    );
    Ok(())
}

/// Render cluster details as aligned `key: value` lines.
///
/// `current` is `None` when an autoscaling cluster has no status yet.
pub fn format_cluster(
    details: &ClusterDetails,
    current: Option<&CurrentScaling>,
    auto_scaling: bool,
    capabilities: &[CapabilityDefinition],
) -> String {
    let mut rows: Vec<(&str, String)> = vec![
        ("ID", details.id.clone()),
        ("Name", details.name.clone()),
        ("Organization", details.owner.clone()),
        ("Release version", details.release_version.clone()),
    ];

    if auto_scaling {
        rows.push((
            "Worker node scaling",
            format!(
                "autoscaling, min {}, max {}",
                details.scaling.min, details.scaling.max
            ),
        ));
        if let Some(current) = current {
            rows.push(("Desired worker node count", current.desired_capacity.to_string()));
            rows.push(("Worker nodes running", current.workers.to_string()));
        }
    } else {
        let workers = current.map_or(details.workers.len() as i64, |c| c.workers);
        rows.push(("Worker node scaling", format!("pinned at {workers}")));
        rows.push(("Worker nodes", workers.to_string()));
    }

    let names: Vec<&str> = capabilities.iter().map(|c| c.name).collect();
    rows.push(("Capabilities", names.join(", ")));

    let width = rows.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
    rows.iter()
        .map(|(key, value)| {
            let value = if value.is_empty() { "n/a" } else { value.as_str() };
            format!("{:<width$}  {value}\n", format!("{key}:"), width = width + 1)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use grid_core::{GridConfig, ScalingRequest, WorkerDetails};
    use grid_scale::CurrentScaling;

    use super::super::testing::FakeApi;
    use super::*;

    fn details(workers: usize) -> ClusterDetails {
        ClusterDetails {
            id: "f01r4".to_string(),
            name: "Staging".to_string(),
            owner: "acme".to_string(),
            release_version: "6.3.0".to_string(),
            scaling: ScalingRequest { min: 3, max: 5 },
            workers: vec![WorkerDetails::default(); workers],
        }
    }

    #[test]
    fn pinned_cluster_shows_worker_count() {
        let out = format_cluster(&details(4), None, false, &[]);

        assert!(out.contains("ID:"));
        assert!(out.contains("f01r4"));
        assert!(out.contains("pinned at 4"));
        assert!(!out.contains("autoscaling"));
    }

    #[test]
    fn autoscaling_cluster_shows_bounds() {
        let out = format_cluster(&details(0), None, true, &[]);
        assert!(out.contains("autoscaling, min 3, max 5"));
        assert!(!out.contains("Worker nodes running"));
    }

    #[test]
    fn autoscaling_cluster_shows_desired_and_running() {
        let current = CurrentScaling {
            min: 3,
            max: 5,
            desired_capacity: 4,
            workers: 2,
        };
        let out = format_cluster(&details(0), Some(&current), true, &[]);

        let line = |key: &str| out.lines().find(|l| l.starts_with(key)).unwrap().to_string();
        assert!(line("Desired worker node count:").ends_with(" 4"));
        assert!(line("Worker nodes running:").ends_with(" 2"));
    }

    #[test]
    fn capabilities_are_listed() {
        let caps = capabilities::capabilities_for("aws", "9.0.0").unwrap();
        let out = format_cluster(&details(0), None, true, &caps);
        let line = out.lines().find(|l| l.starts_with("Capabilities:")).unwrap();

        for cap in capabilities::all() {
            assert!(line.contains(cap.name), "{}", cap.name);
        }

        let out = format_cluster(&details(2), None, false, &[]);
        let line = out.lines().find(|l| l.starts_with("Capabilities:")).unwrap();
        assert!(line.ends_with("n/a"));
    }

    #[test]
    fn empty_values_render_as_na() {
        let mut d = details(1);
        d.name.clear();
        let out = format_cluster(&d, None, false, &[]);
        let name_line = out.lines().find(|l| l.starts_with("Name:")).unwrap();
        assert!(name_line.ends_with("n/a"));
    }

    #[test]
    fn values_are_aligned() {
        let out = format_cluster(&details(2), None, false, &[]);
        let value_column = |line: &str| {
            let key_end = line.find(':').unwrap() + 1;
            let rest = &line[key_end..];
            key_end + rest.len() - rest.trim_start().len()
        };
        let columns: Vec<usize> = out.lines().map(value_column).collect();
        assert!(columns.windows(2).all(|w| w[0] == w[1]));
    }

    #[tokio::test]
    async fn show_fetches_status_for_autoscaling_clusters() {
        let api = FakeApi::new("aws")
            .with_cluster("f01r4", "7.0.0", 3, 5, 0)
            .with_status("f01r4", 4, 4);
        let url = api.serve().await;
        let session = Session {
            config: GridConfig::default(),
            config_dir: PathBuf::from("/nonexistent"),
            endpoint: Some(url),
            token: Some("tok".to_string()),
            scheme: "giantswarm".to_string(),
        };

        show_cluster(&session, "f01r4").await.unwrap();
        assert!(show_cluster(&session, "missing").await.is_err());
    }

    #[tokio::test]
    async fn show_tolerates_missing_status() {
        let api = FakeApi::new("aws").with_cluster("f01r4", "7.0.0", 3, 5, 0);
        let url = api.serve().await;
        let session = Session {
            config: GridConfig::default(),
            config_dir: PathBuf::from("/nonexistent"),
            endpoint: Some(url),
            token: Some("tok".to_string()),
            scheme: "giantswarm".to_string(),
        };

        show_cluster(&session, "f01r4").await.unwrap();
    }
}

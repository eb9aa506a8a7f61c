pub mod auth;
pub mod clusters;
pub mod endpoints;
pub mod scale;
pub mod show;

use std::path::PathBuf;

use anyhow::{Context as _, bail};
use grid_client::{ClientConfig, GridClient};
use grid_core::GridConfig;
use grid_core::capabilities::{self, CapabilityDefinition};
use tracing::debug;

/// Flags shared by every command.
#[derive(Debug, Default)]
pub struct GlobalArgs {
    pub endpoint: Option<String>,
    pub auth_token: Option<String>,
    pub config_dir: Option<PathBuf>,
}

/// Loaded configuration plus the endpoint and credentials picked for this run.
#[derive(Debug)]
pub struct Session {
    pub config: GridConfig,
    pub config_dir: PathBuf,
    pub endpoint: Option<String>,
    pub token: Option<String>,
    pub scheme: String,
}

impl Session {
    pub fn load(globals: &GlobalArgs) -> anyhow::Result<Self> {
        let config_dir = grid_core::config::config_dir(globals.config_dir.as_deref());
        let config = GridConfig::load(&config_dir)
            .with_context(|| format!("loading configuration from {}", config_dir.display()))?;
        Ok(Self::from_config(config, config_dir, globals))
    }

    pub fn from_config(config: GridConfig, config_dir: PathBuf, globals: &GlobalArgs) -> Self {
        let overriding_token = globals.auth_token.as_deref();
        let endpoint = config.choose_endpoint(globals.endpoint.as_deref());
        let (token, scheme) = match &endpoint {
            Some(url) => (
                config.choose_token(url, overriding_token),
                config.choose_scheme(url, overriding_token),
            ),
            None => (
                overriding_token.filter(|t| !t.is_empty()).map(str::to_string),
                grid_core::config::DEFAULT_SCHEME.to_string(),
            ),
        };

        debug!(
            endpoint = endpoint.as_deref().unwrap_or("-"),
            logged_in = token.is_some(),
            "session loaded"
        );

        Self {
            config,
            config_dir,
            endpoint,
            token,
            scheme,
        }
    }

    pub fn logged_in(&self) -> bool {
        self.token.is_some()
    }

    /// API client for the chosen endpoint, tagged with `activity`.
    pub fn client(&self, activity: &str) -> anyhow::Result<GridClient> {
        let Some(endpoint) = self.endpoint.as_deref() else {
            bail!("no endpoint selected; use --endpoint or `gridctl select endpoint`");
        };
        let token = self.token.as_deref().unwrap_or_default();
        let client = GridClient::new(ClientConfig::new(endpoint, &self.scheme, token))?;
        Ok(client.with_activity(activity))
    }
}

/// Whether the cluster's release on this installation has `capability`.
pub async fn cluster_has_capability(
    client: &GridClient,
    release_version: &str,
    capability: &CapabilityDefinition,
) -> anyhow::Result<bool> {
    let info = client
        .get_info()
        .await
        .context("fetching installation info")?;
    let provider = info.general.provider;
    let has = capabilities::has_capability(&provider, release_version, capability)?;

    debug!(
        provider = %provider,
        release = %release_version,
        capability = capability.name,
        has,
        "capability checked"
    );
    Ok(has)
}

/// Left-aligned columns separated by two spaces, trailing blanks trimmed.
pub fn render_table<const N: usize>(header: [&str; N], rows: &[[String; N]]) -> String {
    let mut widths = header.map(str::len);
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.len());
        }
    }

    let render = |cells: &[&str]| {
        let line = cells
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join("  ");
        format!("{}\n", line.trim_end())
    };

    let mut out = render(&header[..]);
    for row in rows {
        let cells: Vec<&str> = row.iter().map(String::as_str).collect();
        out.push_str(&render(&cells));
    }
    out
}

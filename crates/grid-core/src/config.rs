//! gridctl configuration file: known endpoints and their credentials.
//!
//! Stored as `config.toml` inside the config directory. Endpoints are keyed
//! by their normalized URL and may carry a short alias.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Auth scheme used when none is stored or a token is given on the command line.
pub const DEFAULT_SCHEME: &str = "giantswarm";

pub const ENDPOINT_ENV: &str = "GRIDCTL_ENDPOINT";
pub const CONFIG_DIR_ENV: &str = "GRIDCTL_CONFIG_DIR";

#[cfg(unix)]
const CONFIG_FILE_MODE: u32 = 0o600;
#[cfg(unix)]
const CONFIG_DIR_MODE: u32 = 0o700;

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to access config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("email and token must both be given to store credentials")]
    CredentialsRequired,

    #[error("alias {0:?} is already used for another endpoint")]
    AliasMustBeUnique(String),

    #[error("endpoint not defined: {0}")]
    EndpointNotDefined(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GridConfig {
    /// Seconds since the epoch of the last write.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<u64>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub selected_endpoint: String,
    #[serde(default)]
    pub endpoints: BTreeMap<String, EndpointConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EndpointConfig {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub alias: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, rename = "auth_scheme", skip_serializing_if = "String::is_empty")]
    pub scheme: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub token: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub refresh_token: String,
}

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> ConfigError {
    let path = path.to_path_buf();
    move |source| ConfigError::Io { path, source }
}

fn create_private_dir(dir: &Path) -> ConfigResult<()> {
    let mut builder = std::fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(CONFIG_DIR_MODE);
    }
    builder.create(dir).map_err(io_err(dir))
}

fn write_private_file(path: &Path, content: &str) -> ConfigResult<()> {
    let mut options = std::fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(CONFIG_FILE_MODE);
    }
    let mut file = options.open(path).map_err(io_err(path))?;

    // An existing file keeps its mode on open; narrow it before writing.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(std::fs::Permissions::from_mode(CONFIG_FILE_MODE))
            .map_err(io_err(path))?;
    }

    file.write_all(content.as_bytes()).map_err(io_err(path))
}

/// Resolve the config directory: explicit path, then `$GRIDCTL_CONFIG_DIR`,
/// then `$HOME/.config/gridctl`.
pub fn config_dir(explicit: Option<&Path>) -> PathBuf {
    if let Some(dir) = explicit {
        return dir.to_path_buf();
    }
    if let Ok(dir) = std::env::var(CONFIG_DIR_ENV)
        && !dir.is_empty()
    {
        return PathBuf::from(dir);
    }
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    Path::new(&home).join(".config").join("gridctl")
}

/// Canonical form of an endpoint URL: trimmed, `https://` when no scheme is
/// given, no trailing slash.
pub fn normalize_endpoint(url: &str) -> String {
    let url = url.trim();
    let url = if url.contains("://") {
        url.to_string()
    } else {
        format!("https://{url}")
    };
    url.trim_end_matches('/').to_string()
}

impl GridConfig {
    /// Load `config.toml` from `dir`. A missing file yields an empty config.
    pub fn load(dir: &Path) -> ConfigResult<Self> {
        let path = dir.join(CONFIG_FILE_NAME);
        if !path.is_file() {
            debug!(path = %path.display(), "no config file, starting empty");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path).map_err(io_err(&path))?;
        Ok(toml::from_str(&content)?)
    }

    /// Write the config to `dir`, creating the directory if needed.
    ///
    /// On unix the directory is created `0700` and the file is only ever
    /// written with mode `0600`.
    pub fn save(&mut self, dir: &Path) -> ConfigResult<()> {
        create_private_dir(dir)?;

        self.updated = Some(
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap_or_default()
                .as_secs(),
        );

        let path = dir.join(CONFIG_FILE_NAME);
        write_private_file(&path, &self.to_toml_string()?)?;

        debug!(path = %path.display(), "config written");
        Ok(())
    }

    pub fn to_toml_string(&self) -> ConfigResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Store credentials for an endpoint after a successful login.
    ///
    /// An alias already in use must point at the same endpoint. An existing
    /// alias of the endpoint is kept.
    pub fn store_endpoint_auth(
        &mut self,
        endpoint_url: &str,
        alias: &str,
        email: &str,
        scheme: &str,
        token: &str,
        refresh_token: &str,
    ) -> ConfigResult<()> {
        let endpoint = normalize_endpoint(endpoint_url);

        if email.is_empty() || token.is_empty() {
            return Err(ConfigError::CredentialsRequired);
        }

        if !alias.is_empty()
            && let Some(aliased) = self.endpoint_by_alias(alias)
            && aliased != endpoint
        {
            return Err(ConfigError::AliasMustBeUnique(alias.to_string()));
        }

        let alias_before = self
            .endpoints
            .get(&endpoint)
            .map(|e| e.alias.clone())
            .unwrap_or_default();

        let alias = if alias_before.is_empty() {
            alias.to_string()
        } else {
            alias_before
        };

        self.endpoints.insert(
            endpoint,
            EndpointConfig {
                alias,
                email: email.to_string(),
                scheme: scheme.to_string(),
                token: token.to_string(),
                refresh_token: refresh_token.to_string(),
            },
        );

        Ok(())
    }

    /// Make the endpoint named by alias or URL the selected one.
    pub fn select_endpoint(&mut self, alias_or_url: &str) -> ConfigResult<()> {
        if alias_or_url.is_empty() {
            return Err(ConfigError::EndpointNotDefined(String::new()));
        }

        let endpoint = match self.endpoint_by_alias(alias_or_url) {
            Some(endpoint) => endpoint.to_string(),
            None => normalize_endpoint(alias_or_url),
        };

        let entry = self
            .endpoints
            .get_mut(&endpoint)
            .ok_or_else(|| ConfigError::EndpointNotDefined(alias_or_url.to_string()))?;

        if entry.scheme.is_empty() {
            entry.scheme = DEFAULT_SCHEME.to_string();
        }

        self.selected_endpoint = endpoint;
        Ok(())
    }

    /// The selected endpoint's entry, if any.
    pub fn selected(&self) -> Option<&EndpointConfig> {
        self.endpoints.get(&self.selected_endpoint)
    }

    /// Pick the endpoint to talk to: the override, then `$GRIDCTL_ENDPOINT`,
    /// then the selected endpoint.
    pub fn choose_endpoint(&self, overriding: Option<&str>) -> Option<String> {
        let from_env = std::env::var(ENDPOINT_ENV).ok();
        self.resolve_endpoint(overriding.or(from_env.as_deref()))
    }

    /// Resolve a candidate alias or URL, falling back to the selected endpoint.
    pub fn resolve_endpoint(&self, candidate: Option<&str>) -> Option<String> {
        match candidate.filter(|c| !c.is_empty()) {
            Some(candidate) => Some(
                self.endpoint_by_alias(candidate)
                    .map(str::to_string)
                    .unwrap_or_else(|| normalize_endpoint(candidate)),
            ),
            None if self.selected_endpoint.is_empty() => None,
            None => Some(self.selected_endpoint.clone()),
        }
    }

    /// The overriding token if given, else the stored token for `endpoint`.
    pub fn choose_token(&self, endpoint: &str, overriding: Option<&str>) -> Option<String> {
        if let Some(token) = overriding.filter(|t| !t.is_empty()) {
            return Some(token.to_string());
        }

        self.endpoints
            .get(&normalize_endpoint(endpoint))
            .map(|e| e.token.clone())
            .filter(|t| !t.is_empty())
    }

    /// The auth scheme for `endpoint`. A token given on the command line
    /// always uses the default scheme.
    pub fn choose_scheme(&self, endpoint: &str, overriding_token: Option<&str>) -> String {
        if overriding_token.is_some_and(|t| !t.is_empty()) {
            return DEFAULT_SCHEME.to_string();
        }

        self.endpoints
            .get(&normalize_endpoint(endpoint))
            .map(|e| e.scheme.clone())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_SCHEME.to_string())
    }

    pub fn has_endpoint_alias(&self, alias: &str) -> bool {
        self.endpoint_by_alias(alias).is_some()
    }

    pub fn endpoint_by_alias(&self, alias: &str) -> Option<&str> {
        self.endpoints
            .iter()
            .find(|(_, e)| !e.alias.is_empty() && e.alias == alias)
            .map(|(url, _)| url.as_str())
    }

    pub fn num_endpoints(&self) -> usize {
        self.endpoints.len()
    }

    /// Drop the stored tokens for `endpoint_url`.
    pub fn logout(&mut self, endpoint_url: &str) {
        if let Some(entry) = self.endpoints.get_mut(&normalize_endpoint(endpoint_url)) {
            entry.token.clear();
            entry.refresh_token.clear();
        }
    }
}

use std::io::{BufRead, Write};

use anyhow::{Context as _, anyhow, bail};
use grid_client::{ClientConfig, ClientError, GridClient};
use grid_core::GridConfig;
use grid_core::config::DEFAULT_SCHEME;
use tracing::{debug, info};

use super::Session;

const LOGIN_ACTIVITY: &str = "login";
const LOGOUT_ACTIVITY: &str = "logout";

pub struct LoginArgs {
    pub email: String,
    pub password: Option<String>,
    pub alias: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOutcome {
    pub endpoint: String,
    pub email: String,
    pub alias: String,
    pub endpoint_added: bool,
}

impl LoginOutcome {
    pub fn summary(&self) -> String {
        let mut out = format!("Successfully logged in as {} to {}", self.email, self.endpoint);
        if !self.alias.is_empty() {
            out.push_str(&format!(" (alias {})", self.alias));
        }
        out.push('.');
        if self.endpoint_added {
            out.push_str("\nThe endpoint has been added and selected.");
        }
        out
    }
}

/// Log in to the chosen endpoint with email and password, then store and
/// select the endpoint.
///
/// `read_password` is only called when no password was given.
pub async fn login<F>(session: &mut Session, args: &LoginArgs, read_password: F) -> anyhow::Result<LoginOutcome>
where
    F: FnOnce() -> anyhow::Result<String>,
{
    let Some(endpoint) = session.endpoint.clone() else {
        bail!("no endpoint given; use --endpoint <URL> to log in");
    };

    let password = match &args.password {
        Some(password) => password.clone(),
        None => read_password()?,
    };
    if password.is_empty() {
        bail!("password must not be empty");
    }

    if session.logged_in() {
        revoke_token(session).await;
    }

    let anonymous =
        GridClient::new(ClientConfig::new(&endpoint, DEFAULT_SCHEME, ""))?.with_activity(LOGIN_ACTIVITY);
    let token = anonymous
        .create_auth_token(&args.email, &password)
        .await
        .map_err(|e| match e {
            ClientError::Unauthorized => anyhow!("invalid email or password for {}", args.email),
            other => anyhow::Error::new(other).context("requesting auth token"),
        })?;

    let client =
        GridClient::new(ClientConfig::new(&endpoint, DEFAULT_SCHEME, &token))?.with_activity(LOGIN_ACTIVITY);
    let info = client.get_info().await.context("fetching installation info")?;

    let alias = match &args.alias {
        Some(alias) => alias.clone(),
        None => default_alias(&session.config, &endpoint, &info.general.installation_name),
    };

    let endpoints_before = session.config.num_endpoints();
    session
        .config
        .store_endpoint_auth(&endpoint, &alias, &args.email, DEFAULT_SCHEME, &token, "")?;
    session.config.select_endpoint(&endpoint)?;
    session
        .config
        .save(&session.config_dir)
        .with_context(|| format!("saving configuration to {}", session.config_dir.display()))?;

    let stored_alias = session
        .config
        .selected()
        .map(|e| e.alias.clone())
        .unwrap_or_default();
    session.token = Some(token);
    session.scheme = DEFAULT_SCHEME.to_string();

    info!(endpoint = %endpoint, email = %args.email, "logged in");
    Ok(LoginOutcome {
        endpoint_added: session.config.num_endpoints() > endpoints_before,
        endpoint,
        email: args.email.clone(),
        alias: stored_alias,
    })
}

/// The installation name, unless another endpoint already uses it.
fn default_alias(config: &GridConfig, endpoint: &str, installation_name: &str) -> String {
    let taken_elsewhere = config.has_endpoint_alias(installation_name)
        && config.endpoint_by_alias(installation_name) != Some(endpoint);
    if taken_elsewhere {
        String::new()
    } else {
        installation_name.to_string()
    }
}

/// Revoke the stored token of the chosen endpoint and forget it locally.
pub async fn logout(session: &mut Session) -> anyhow::Result<()> {
    let Some(endpoint) = session.endpoint.clone() else {
        bail!("no endpoint selected; nothing to log out from");
    };

    if session.logged_in() {
        revoke_token(session).await;
    }

    session.config.logout(&endpoint);
    session.token = None;
    session
        .config
        .save(&session.config_dir)
        .with_context(|| format!("saving configuration to {}", session.config_dir.display()))?;

    info!(endpoint = %endpoint, "logged out");
    println!("Logged out from {endpoint}");
    Ok(())
}

/// Best effort: an expired or unknown token must not block logging out.
async fn revoke_token(session: &Session) {
    let result = match session.client(LOGOUT_ACTIVITY) {
        Ok(client) => client.delete_auth_token().await.map_err(anyhow::Error::new),
        Err(e) => Err(e),
    };
    if let Err(e) = result {
        debug!(error = %e, "could not revoke auth token");
    }
}

/// Read a password line from stdin.
pub fn ask_password() -> anyhow::Result<String> {
    let mut stdout = std::io::stdout().lock();
    write!(stdout, "Password: ")?;
    stdout.flush()?;

    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

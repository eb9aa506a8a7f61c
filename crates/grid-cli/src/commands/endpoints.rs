use anyhow::Context as _;
use grid_core::GridConfig;
use tracing::info;

use super::{Session, render_table};

/// Table of known endpoints; the selected one is marked with `*`.
pub fn format_endpoints(config: &GridConfig) -> String {
    if config.num_endpoints() == 0 {
        return "No endpoints configured.\n".to_string();
    }

    let rows: Vec<[String; 4]> = config
        .endpoints
        .iter()
        .map(|(url, entry)| {
            let selected = if *url == config.selected_endpoint { "*" } else { "" };
            [
                selected.to_string(),
                entry.alias.clone(),
                url.clone(),
                entry.email.clone(),
            ]
        })
        .collect();

    render_table(["", "ALIAS", "URL", "EMAIL"], &rows)
}

pub fn select_endpoint(session: &mut Session, alias_or_url: &str) -> anyhow::Result<()> {
    session.config.select_endpoint(alias_or_url)?;
    session
        .config
        .save(&session.config_dir)
        .with_context(|| format!("saving configuration to {}", session.config_dir.display()))?;

    info!(endpoint = %session.config.selected_endpoint, "endpoint selected");
    println!("Endpoint selected: {}", session.config.selected_endpoint);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::GlobalArgs;
    use grid_core::EndpointConfig;
    use grid_core::config::DEFAULT_SCHEME;

    fn config() -> GridConfig {
        let mut config = GridConfig::default();
        for (url, alias, token) in [
            ("https://api.example.com", "prod", "t1"),
            ("https://api.staging.example.com", "staging", "t2"),
        ] {
            config.endpoints.insert(
                url.to_string(),
                EndpointConfig {
                    alias: alias.to_string(),
                    email: "dev@example.com".to_string(),
                    scheme: DEFAULT_SCHEME.to_string(),
                    token: token.to_string(),
                    refresh_token: String::new(),
                },
            );
        }
        config.selected_endpoint = "https://api.example.com".to_string();
        config
    }

    fn session_in(dir: &std::path::Path) -> Session {
        let globals = GlobalArgs {
            endpoint: Some("prod".to_string()),
            ..Default::default()
        };
        Session::from_config(config(), dir.to_path_buf(), &globals)
    }

    #[test]
    fn empty_config_lists_nothing() {
        assert_eq!(format_endpoints(&GridConfig::default()), "No endpoints configured.\n");
    }

    #[test]
    fn table_marks_selected_endpoint() {
        let out = format_endpoints(&config());
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("ALIAS"));
        let prod = lines.iter().find(|l| l.contains("prod")).unwrap();
        assert!(prod.starts_with('*'));
        let staging = lines.iter().find(|l| l.contains("staging")).unwrap();
        assert!(staging.starts_with(' '));
    }

    #[test]
    fn select_persists_choice() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session_in(dir.path());

        select_endpoint(&mut session, "staging").unwrap();

        let reloaded = GridConfig::load(dir.path()).unwrap();
        assert_eq!(reloaded.selected_endpoint, "https://api.staging.example.com");
    }

    #[test]
    fn select_unknown_endpoint_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session_in(dir.path());

        assert!(select_endpoint(&mut session, "nope").is_err());
        assert!(!dir.path().join(grid_core::config::CONFIG_FILE_NAME).exists());
    }
}

//! Environment-driven configuration.
//!
//! All settings come from the process environment, optionally seeded from a
//! `.env` file before startup: `GITHUB_USERNAME`, `GITHUB_TOKEN` and
//! `REPO_DIR`. Command-line flags override the environment where a flag
//! exists; the token is accepted from the environment only. The resolved
//! value is constructed once and passed into the lister and the sync engine
//! rather than read ad hoc.

use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;

/// Environment variable holding the account identifier.
pub const USERNAME_VAR: &str = "GITHUB_USERNAME";

/// Environment variable holding the API token.
pub const TOKEN_VAR: &str = "GITHUB_TOKEN";

/// Environment variable holding the mirror target directory.
pub const TARGET_DIR_VAR: &str = "REPO_DIR";

/// Resolved configuration for one run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Account whose repositories are mirrored.
    pub username: String,

    /// Token used for HTTP basic authentication against the API.
    pub token: String,

    /// Directory the bare mirrors are placed directly beneath.
    pub target_dir: PathBuf,
}

impl Config {
    /// Resolve the configuration from CLI overrides and the environment.
    ///
    /// Any missing value is fatal misconfiguration.
    pub fn resolve(username: Option<String>, target_dir: Option<String>) -> Result<Self> {
        let username = pick(username, USERNAME_VAR).with_context(|| {
            format!("GitHub account must be provided (--user or {USERNAME_VAR})")
        })?;

        let token = pick(None, TOKEN_VAR)
            .with_context(|| format!("GitHub token must be provided ({TOKEN_VAR})"))?;

        let target_dir = pick(target_dir, TARGET_DIR_VAR).with_context(|| {
            format!("Target directory must be provided (--directory or {TARGET_DIR_VAR})")
        })?;

        let target_dir = shellexpand::full(&target_dir)
            .context("Failed to expand target directory path")?;

        Ok(Self {
            username,
            token,
            target_dir: PathBuf::from(target_dir.as_ref()),
        })
    }
}

/// First non-empty value out of an explicit override and an environment
/// variable.
fn pick(explicit: Option<String>, var: &str) -> Option<String> {
    explicit
        .filter(|value| !value.is_empty())
        .or_else(|| env::var(var).ok().filter(|value| !value.is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pick_prefers_explicit_over_environment() {
        env::set_var("REPOVAULT_TEST_PICK_A", "from-env");

        let value = pick(Some("from-flag".to_string()), "REPOVAULT_TEST_PICK_A");
        assert_eq!(value, Some("from-flag".to_string()));

        env::remove_var("REPOVAULT_TEST_PICK_A");
    }

    #[test]
    fn pick_falls_back_to_environment() {
        env::set_var("REPOVAULT_TEST_PICK_B", "from-env");

        assert_eq!(
            pick(None, "REPOVAULT_TEST_PICK_B"),
            Some("from-env".to_string())
        );

        env::remove_var("REPOVAULT_TEST_PICK_B");
    }

    #[test]
    fn pick_treats_empty_values_as_missing() {
        env::set_var("REPOVAULT_TEST_PICK_C", "");

        assert_eq!(pick(Some(String::new()), "REPOVAULT_TEST_PICK_C"), None);
        assert_eq!(pick(None, "REPOVAULT_TEST_PICK_D"), None);

        env::remove_var("REPOVAULT_TEST_PICK_C");
    }

    #[test]
    fn resolve_expands_target_dir() {
        env::set_var("REPOVAULT_TEST_MIRROR_HOME", "/srv/backups");
        env::set_var(TOKEN_VAR, "test-token");

        let config = Config::resolve(
            Some("alice".to_string()),
            Some("${REPOVAULT_TEST_MIRROR_HOME}/mirrors".to_string()),
        )
        .expect("Failed to resolve config");

        assert_eq!(config.username, "alice");
        assert_eq!(config.target_dir, PathBuf::from("/srv/backups/mirrors"));

        env::remove_var("REPOVAULT_TEST_MIRROR_HOME");
    }
}

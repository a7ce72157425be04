//! Git capability over the local mirror store.
//!
//! The sync engine never talks to git directly; it goes through the
//! [`GitMirror`] trait so its decision logic can be exercised against test
//! doubles. [`SystemGit`] is the production implementation and shells out to
//! the system `git` binary.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use std::path::Path;
use tokio::process::Command;
use tracing::debug;

/// Operations the reconciler needs from the local mirror store.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GitMirror: Send + Sync {
    /// Whether a mirror already exists at `path`.
    fn mirror_exists(&self, path: &Path) -> bool;

    /// Initialize a new bare mirror of `remote_url` at `path`.
    async fn clone_mirror(&self, remote_url: &str, path: &Path) -> Result<()>;

    /// Refresh all remote-tracking refs of the existing mirror at `path`.
    async fn fetch_mirror(&self, path: &Path) -> Result<()>;
}

/// Runs the system `git` binary.
pub struct SystemGit;

#[async_trait]
impl GitMirror for SystemGit {
    fn mirror_exists(&self, path: &Path) -> bool {
        path.exists()
    }

    async fn clone_mirror(&self, remote_url: &str, path: &Path) -> Result<()> {
        debug!("Running git clone --bare {} {}", remote_url, path.display());

        let output = Command::new("git")
            .arg("clone")
            .arg("--bare")
            .arg(remote_url)
            .arg(path)
            .output()
            .await
            .context("Failed to execute git clone")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(anyhow!("git clone failed: {}", stderr.trim()));
        }

        Ok(())
    }

    async fn fetch_mirror(&self, path: &Path) -> Result<()> {
        debug!("Running git --git-dir {} fetch --all", path.display());

        let output = Command::new("git")
            .arg("--git-dir")
            .arg(path)
            .args(["fetch", "--all"])
            .output()
            .await
            .context("Failed to execute git fetch")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(anyhow!("git fetch failed: {}", stderr.trim()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn mirror_exists_is_a_plain_path_check() {
        let git = SystemGit;

        assert!(!git.mirror_exists(&PathBuf::from("/nonexistent/path/repo.git")));

        let dir = tempfile::TempDir::new().unwrap();
        assert!(git.mirror_exists(dir.path()));
    }

    #[tokio::test]
    async fn fetch_on_a_missing_mirror_reports_failure() {
        let dir = tempfile::TempDir::new().unwrap();
        let bogus = dir.path().join("not-a-repo.git");

        let err = SystemGit.fetch_mirror(&bogus).await.unwrap_err();
        assert!(err.to_string().contains("git fetch"));
    }
}

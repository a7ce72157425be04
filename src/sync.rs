//! Mirror reconciliation.
//!
//! One repository at a time: if the deterministic mirror path is absent the
//! repository is cloned as a bare mirror, otherwise its remote-tracking refs
//! are refreshed in place. After either action the description side-file is
//! rewritten unconditionally with the current remote description, so the
//! write stays idempotent. A repository removed from the remote account is
//! never pruned locally.

use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::{error, info};

use crate::config::Config;
use crate::error::{SyncError, SyncPhase};
use crate::git::{GitMirror, SystemGit};
use crate::github::RemoteRepo;

/// Suffix distinguishing bare mirrors from working copies.
const MIRROR_SUFFIX: &str = ".git";

/// Plain-text metadata file kept inside each bare mirror.
const DESCRIPTION_FILE: &str = "description";

/// Action taken for one repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncAction {
    /// No mirror existed; a fresh bare clone was made.
    Cloned,
    /// The mirror was already present; its remote refs were refreshed.
    Fetched,
}

/// Outcome counts for a whole pass.
///
/// Informational only: per-repository failures are logged as they happen and
/// never feed into the process exit status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncSummary {
    pub cloned: usize,
    pub fetched: usize,
    pub failed: usize,
}

impl SyncSummary {
    pub fn total(&self) -> usize {
        self.cloned + self.fetched + self.failed
    }
}

/// Reconciles remote repositories against the local mirror store.
pub struct SyncEngine<G = SystemGit> {
    target_dir: PathBuf,
    git: G,
}

impl SyncEngine<SystemGit> {
    /// Create an engine backed by the system `git` binary.
    pub fn new(config: &Config) -> Self {
        Self {
            target_dir: config.target_dir.clone(),
            git: SystemGit,
        }
    }
}

impl<G: GitMirror> SyncEngine<G> {
    /// Create an engine over a custom git capability.
    pub fn with_git(target_dir: impl Into<PathBuf>, git: G) -> Self {
        Self {
            target_dir: target_dir.into(),
            git,
        }
    }

    /// Deterministic mirror path for a repository name.
    pub fn mirror_path(&self, name: &str) -> PathBuf {
        self.target_dir.join(format!("{name}{MIRROR_SUFFIX}"))
    }

    /// Bring one repository's local mirror in line with its remote.
    ///
    /// A clone or fetch failure stops reconciliation for this repository
    /// before the description write; a description failure leaves the mirror
    /// in whatever state the git action produced.
    pub async fn reconcile(&self, repo: &RemoteRepo) -> Result<SyncAction, SyncError> {
        let path = self.mirror_path(&repo.name);

        let action = if self.git.mirror_exists(&path) {
            info!("Fetching updates for bare repository {}...", repo.name);
            self.git
                .fetch_mirror(&path)
                .await
                .map_err(|cause| SyncError::new(SyncPhase::Fetch, &repo.name, cause))?;
            SyncAction::Fetched
        } else {
            info!("Cloning repository {} as bare...", repo.name);
            self.git
                .clone_mirror(&repo.html_url, &path)
                .await
                .map_err(|cause| SyncError::new(SyncPhase::Clone, &repo.name, cause))?;
            SyncAction::Cloned
        };

        self.write_description(&path, repo)
            .await
            .map_err(|cause| SyncError::new(SyncPhase::Describe, &repo.name, cause))?;

        Ok(action)
    }

    /// Reconcile every repository in listing order, continuing past
    /// per-repository failures.
    pub async fn run(&self, repos: &[RemoteRepo]) -> SyncSummary {
        let mut summary = SyncSummary::default();

        for repo in repos {
            match self.reconcile(repo).await {
                Ok(SyncAction::Cloned) => summary.cloned += 1,
                Ok(SyncAction::Fetched) => summary.fetched += 1,
                Err(err) => {
                    error!("Failed to sync repository {}: {}", repo.name, err);
                    summary.failed += 1;
                }
            }
        }

        info!(
            "Sync complete: {} cloned, {} fetched, {} failed",
            summary.cloned, summary.fetched, summary.failed
        );

        summary
    }

    /// Rewrite the description side-file with the current remote value.
    async fn write_description(&self, mirror: &Path, repo: &RemoteRepo) -> anyhow::Result<()> {
        tokio::fs::write(mirror.join(DESCRIPTION_FILE), repo.description_text())
            .await
            .with_context(|| format!("Failed to write description for {}", repo.name))
    }
}

//! Error taxonomy for listing and reconciliation.
//!
//! The two families deliberately carry different weight: a [`FetchError`]
//! aborts the whole run, because an incomplete repository list cannot be
//! trusted for a mirroring pass, while a [`SyncError`] is scoped to a single
//! repository and never stops the remaining ones from being attempted.

use std::fmt;

use reqwest::StatusCode;

/// Failure while listing the account's repositories.
///
/// Always fatal to the run; no partial repository list is ever returned.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Connection, DNS, timeout or body-read failure on any page request.
    #[error("transport error talking to the repository API: {0}")]
    Transport(#[from] reqwest::Error),

    /// The API answered a page request with a non-success status.
    #[error("repository API returned {status}")]
    Status { status: StatusCode },

    /// A page body was not a well-formed array of repository records.
    #[error("malformed repository list: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Reconciliation phase a [`SyncError`] originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPhase {
    /// Initializing a new bare mirror.
    Clone,
    /// Refreshing an existing mirror's remote-tracking refs.
    Fetch,
    /// Writing the description side-file.
    Describe,
}

impl fmt::Display for SyncPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let phase = match self {
            SyncPhase::Clone => "clone",
            SyncPhase::Fetch => "fetch",
            SyncPhase::Describe => "describe",
        };
        f.write_str(phase)
    }
}

/// Failure reconciling one repository.
///
/// Logged and skipped by the driver; one repository's failure carries no
/// information about the others.
#[derive(Debug, thiserror::Error)]
#[error("{phase} failed for {repo}: {cause:#}")]
pub struct SyncError {
    pub phase: SyncPhase,
    pub repo: String,
    pub cause: anyhow::Error,
}

impl SyncError {
    pub(crate) fn new(phase: SyncPhase, repo: &str, cause: anyhow::Error) -> Self {
        Self {
            phase,
            repo: repo.to_string(),
            cause,
        }
    }
}

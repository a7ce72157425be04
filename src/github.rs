//! GitHub repository listing.
//!
//! Walks the paginated `/users/{account}/repos` endpoint until an empty page
//! signals the end of the list. Every page request is authenticated with
//! HTTP basic auth using the configured account and token. Any failure on
//! any page aborts the whole listing; a partial list is never returned.

use serde::Deserialize;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::FetchError;

/// Production API endpoint.
pub const API_BASE: &str = "https://api.github.com";

/// Fixed page size for repository listing requests.
const PAGE_SIZE: u32 = 100;

const USER_AGENT: &str = concat!("repovault/", env!("CARGO_PKG_VERSION"));

/// One remote repository as reported by the API.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteRepo {
    /// Repository name, unique within the account's namespace.
    pub name: String,

    /// HTTPS clone endpoint.
    pub html_url: String,

    /// Free-text metadata; the API reports `null` when unset.
    #[serde(default)]
    pub description: Option<String>,
}

impl RemoteRepo {
    /// The description as it is persisted locally (`null` becomes empty).
    pub fn description_text(&self) -> &str {
        self.description.as_deref().unwrap_or_default()
    }
}

/// GitHub API client scoped to one account.
pub struct GitHubClient {
    http: reqwest::Client,
    api_base: String,
    username: String,
    token: String,
}

impl GitHubClient {
    /// Create a client against the production API.
    pub fn new(config: &Config) -> Self {
        Self::with_api_base(config, API_BASE)
    }

    /// Create a client against a custom API endpoint.
    pub fn with_api_base(config: &Config, api_base: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_base: api_base.into(),
            username: config.username.clone(),
            token: config.token.clone(),
        }
    }

    /// List every repository the account owns, in API return order.
    ///
    /// Issues successive page requests starting at page 1; a page with zero
    /// records terminates the walk. Errors on any page fail the whole
    /// listing with no partial result.
    pub async fn list_repositories(&self) -> Result<Vec<RemoteRepo>, FetchError> {
        let url = format!("{}/users/{}/repos", self.api_base, self.username);
        let mut repos = Vec::new();
        let mut page: u32 = 1;

        loop {
            let response = self
                .http
                .get(&url)
                .query(&[
                    ("page", page.to_string()),
                    ("per_page", PAGE_SIZE.to_string()),
                ])
                .basic_auth(&self.username, Some(&self.token))
                .header("User-Agent", USER_AGENT)
                .header("Accept", "application/vnd.github.v3+json")
                .send()
                .await?;

            let status = response.status();
            if !status.is_success() {
                return Err(FetchError::Status { status });
            }

            let body = response.text().await?;
            let page_repos: Vec<RemoteRepo> = serde_json::from_str(&body)?;

            if page_repos.is_empty() {
                break;
            }

            debug!("Fetched page {} with {} repositories", page, page_repos.len());
            repos.extend(page_repos);
            page += 1;
        }

        info!("Found {} repositories for {}", repos.len(), self.username);
        Ok(repos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_description_deserializes_as_empty() {
        let body = r#"{"name": "a", "html_url": "https://host/alice/a", "description": null}"#;
        let repo: RemoteRepo = serde_json::from_str(body).unwrap();

        assert!(repo.description.is_none());
        assert_eq!(repo.description_text(), "");
    }

    #[test]
    fn missing_description_deserializes_as_empty() {
        let body = r#"{"name": "a", "html_url": "https://host/alice/a"}"#;
        let repo: RemoteRepo = serde_json::from_str(body).unwrap();

        assert_eq!(repo.description_text(), "");
    }

    #[test]
    fn extra_api_fields_are_ignored() {
        let body = r#"{
            "name": "a",
            "html_url": "https://host/alice/a",
            "description": "proj A",
            "fork": false,
            "size": 123
        }"#;
        let repo: RemoteRepo = serde_json::from_str(body).unwrap();

        assert_eq!(repo.name, "a");
        assert_eq!(repo.description_text(), "proj A");
    }
}

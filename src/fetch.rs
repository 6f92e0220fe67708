//! Remote identity providers used to populate the manifest.
//!
//! Each provider turns a username into a [`Coauthor`] carrying the provider's
//! noreply email, so commits are attributed without exposing a real address.

use std::time::Duration;

use reqwest::{StatusCode, blocking::Client};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::{
    coauthor::{Coauthor, CoauthorType},
    error::AppError,
};

pub const GITHUB_BASE_URL: &str = "https://api.github.com";
pub const GITLAB_BASE_URL: &str = "https://gitlab.com";
/// Upper bound on a single provider lookup
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Looks up coauthor details for a username somewhere else
pub trait UserFetcher {
    fn fetch(&self, username: &str) -> Result<Coauthor, AppError>;
}

/// Builds the HTTP client shared by the providers
pub fn http_client() -> Result<Client, AppError> {
    Ok(Client::builder()
        .timeout(FETCH_TIMEOUT)
        .user_agent(concat!("partner/", env!("CARGO_PKG_VERSION")))
        .build()?)
}

/// Error body returned by both providers on non-success statuses
#[derive(Deserialize, Debug, Default)]
struct ApiError {
    #[serde(default)]
    message: String,
}

#[derive(Deserialize, Debug)]
struct GitHubUser {
    id: u64,
    login: String,
    name: Option<String>,
}

impl From<GitHubUser> for Coauthor {
    fn from(user: GitHubUser) -> Self {
        Coauthor {
            email: format!("{}+{}@users.noreply.github.com", user.id, user.login),
            name: user.name.filter(|n| !n.is_empty()).unwrap_or_else(|| user.login.clone()),
            id: user.login,
            kind: CoauthorType::GitHub,
        }
    }
}

#[derive(Deserialize, Debug)]
struct GitLabUser {
    id: u64,
    username: String,
    name: Option<String>,
}

impl From<GitLabUser> for Coauthor {
    fn from(user: GitLabUser) -> Self {
        Coauthor {
            email: format!("{}-{}@users.noreply.gitlab.com", user.id, user.username),
            name: user.name.filter(|n| !n.is_empty()).unwrap_or_else(|| user.username.clone()),
            id: user.username,
            kind: CoauthorType::GitLab,
        }
    }
}

/// Turns a non-success response into the matching provider error
fn provider_error(provider: &str, username: &str, status: StatusCode, body: &str) -> AppError {
    if status == StatusCode::NOT_FOUND {
        return AppError::UserNotFound {
            provider: provider.to_string(),
            username: username.to_string(),
        };
    }
    let api_error: ApiError = serde_json::from_str(body).unwrap_or_default();
    let message = if api_error.message.is_empty() {
        status.to_string()
    } else {
        api_error.message
    };
    AppError::Provider {
        provider: provider.to_string(),
        username: username.to_string(),
        message,
    }
}

fn invalid_url(provider: &str, err: impl std::fmt::Display) -> AppError {
    AppError::Validation(format!("invalid {provider} URL: {err}"))
}

/// GitHub (or GitHub Enterprise) user lookup
pub struct GitHubFetcher {
    pub client: Client,
    pub base_url: String,
}

impl GitHubFetcher {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        GitHubFetcher {
            client,
            base_url: base_url.into(),
        }
    }
}

impl UserFetcher for GitHubFetcher {
    fn fetch(&self, username: &str) -> Result<Coauthor, AppError> {
        let mut url = reqwest::Url::parse(&self.base_url).map_err(|err| invalid_url("GitHub", err))?;
        url.path_segments_mut()
            .map_err(|_| invalid_url("GitHub", &self.base_url))?
            .pop_if_empty()
            .push("users")
            .push(username);
        debug!(%url, "fetching GitHub user");

        let resp = self
            .client
            .get(url)
            .header("Accept", "application/vnd.github+json")
            .send()?;

        let status = resp.status();
        if !status.is_success() {
            warn!(username, %status, "GitHub API returned non-success status");
            return Err(provider_error("GitHub", username, status, &resp.text()?));
        }

        let user: GitHubUser = resp.json()?;
        Ok(user.into())
    }
}

/// GitLab (or self-hosted GitLab) user lookup
pub struct GitLabFetcher {
    pub client: Client,
    pub base_url: String,
}

impl GitLabFetcher {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        GitLabFetcher {
            client,
            base_url: base_url.into(),
        }
    }
}

impl UserFetcher for GitLabFetcher {
    fn fetch(&self, username: &str) -> Result<Coauthor, AppError> {
        let url = reqwest::Url::parse_with_params(
            &format!("{}/api/v4/users", self.base_url.trim_end_matches('/')),
            &[("username", username)],
        )
        .map_err(|err| invalid_url("GitLab", err))?;
        debug!(%url, "fetching GitLab user");

        let resp = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .send()?;

        let status = resp.status();
        if !status.is_success() {
            warn!(username, %status, "GitLab API returned non-success status");
            return Err(provider_error("GitLab", username, status, &resp.text()?));
        }

        // The users endpoint filters by username and answers with a list.
        let users: Vec<GitLabUser> = resp.json()?;
        users
            .into_iter()
            .next()
            .map(Coauthor::from)
            .ok_or_else(|| AppError::UserNotFound {
                provider: "GitLab".to_string(),
                username: username.to_string(),
            })
    }
}

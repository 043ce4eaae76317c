//! GitHub contents API publisher
//!
//! Upsert flow per file: GET the current blob `sha` (404 means create), then
//! PUT base64 content with that `sha`. 429 and 5xx responses and connection
//! failures are transient and retried.

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use reqwest::{Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

use super::{PublishRequest, Publisher, RetryPolicy};
use crate::config::{GITHUB_TOKEN_ENV, GithubConfig};
use crate::types::{DocError, Result};

const USER_AGENT: &str = concat!("docweave/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT_SECS: u64 = 30;

pub struct GithubPublisher {
    /// Never exposed in logs or debug output
    token: SecretString,
    api_base: Url,
    owner: String,
    repo: String,
    default_branch: String,
    retry: RetryPolicy,
    client: reqwest::Client,
}

impl std::fmt::Debug for GithubPublisher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GithubPublisher")
            .field("token", &"[REDACTED]")
            .field("api_base", &self.api_base.as_str())
            .field("repo", &format!("{}/{}", self.owner, self.repo))
            .field("default_branch", &self.default_branch)
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct ContentsEntry {
    sha: String,
}

#[derive(Debug, Serialize)]
struct PutContents<'a> {
    message: &'a str,
    content: String,
    branch: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PutResponse {
    content: Option<PutContentInfo>,
}

#[derive(Debug, Deserialize)]
struct PutContentInfo {
    html_url: Option<String>,
}

impl GithubPublisher {
    /// Build from settings, reading the token from `GITHUB_TOKEN`
    pub fn from_config(config: &GithubConfig) -> Result<Self> {
        let token = config.token().ok_or_else(|| {
            DocError::Config(format!(
                "GitHub token not found. Set {} to publish",
                GITHUB_TOKEN_ENV
            ))
        })?;
        Self::new(config, token)
    }

    pub fn new(config: &GithubConfig, token: SecretString) -> Result<Self> {
        let repo = config
            .repo
            .as_deref()
            .ok_or_else(|| DocError::Config("github.repo is not set".to_string()))?;
        let (owner, name) = repo
            .split_once('/')
            .filter(|(o, n)| !o.is_empty() && !n.is_empty() && !n.contains('/'))
            .ok_or_else(|| {
                DocError::Config(format!("github.repo must be 'owner/name', got '{}'", repo))
            })?;

        let api_base = Url::parse(&config.api_base)
            .map_err(|e| DocError::Config(format!("Invalid github.api_base: {}", e)))?;
        if api_base.cannot_be_a_base() {
            return Err(DocError::Config(format!(
                "Invalid github.api_base: {}",
                config.api_base
            )));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| DocError::Http(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            token,
            api_base,
            owner: owner.to_string(),
            repo: name.to_string(),
            default_branch: config.branch.clone(),
            retry: RetryPolicy::default(),
            client,
        })
    }

    /// `{api_base}/repos/{owner}/{repo}/contents/{path...}` with each segment encoded
    fn contents_url(&self, path: &str) -> Url {
        let mut url = self.api_base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["repos", self.owner.as_str(), self.repo.as_str(), "contents"])
                .extend(path.split('/').filter(|s| !s.is_empty()));
        }
        url
    }

    fn authorized(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder
            .bearer_auth(self.token.expose_secret())
            .header("Accept", "application/vnd.github+json")
    }

    async fn existing_sha(&self, path: &str, branch: &str) -> Result<Option<String>> {
        let response = self
            .authorized(self.client.get(self.contents_url(path)))
            .query(&[("ref", branch)])
            .send()
            .await
            .map_err(|e| DocError::publish_transient(path, e.to_string()))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = check_status(path, response).await?;
        let entry: ContentsEntry = response
            .json()
            .await
            .map_err(|e| DocError::publish(path, format!("unexpected contents response: {}", e)))?;
        Ok(Some(entry.sha))
    }

    async fn upsert_once(&self, request: &PublishRequest) -> Result<String> {
        let branch = request.branch.as_deref().unwrap_or(&self.default_branch);
        let sha = self.existing_sha(&request.path, branch).await?;
        debug!(
            "{} {} on {}",
            if sha.is_some() { "Updating" } else { "Creating" },
            request.path,
            branch
        );

        let body = PutContents {
            message: &request.message,
            content: BASE64.encode(request.content.as_bytes()),
            branch,
            sha,
        };

        let response = self
            .authorized(self.client.put(self.contents_url(&request.path)))
            .json(&body)
            .send()
            .await
            .map_err(|e| DocError::publish_transient(&request.path, e.to_string()))?;
        let response = check_status(&request.path, response).await?;

        let fallback = format!(
            "https://github.com/{}/{}/blob/{}/{}",
            self.owner, self.repo, branch, request.path
        );
        let put: PutResponse = response
            .json()
            .await
            .map_err(|e| DocError::publish(&request.path, format!("unexpected response: {}", e)))?;
        Ok(put.content.and_then(|c| c.html_url).unwrap_or(fallback))
    }
}

/// Map non-success statuses to publish errors, classifying transient ones
async fn check_status(path: &str, response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let message = format!("GitHub API error ({}): {}", status, body);
    if is_transient_status(status) {
        Err(DocError::publish_transient(path, message))
    } else {
        Err(DocError::publish(path, message))
    }
}

fn is_transient_status(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

#[async_trait]
impl Publisher for GithubPublisher {
    async fn publish(&self, request: &PublishRequest) -> Result<String> {
        let url = self
            .retry
            .run(&request.path, || self.upsert_once(request))
            .await?;
        info!("Published {} to {}", request.path, url);
        Ok(url)
    }

    fn name(&self) -> &str {
        "github"
    }
}

//! Google userinfo endpoint client.

use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::config::GoogleConfig;

/// Body returned by `GET /userinfo/v2/me`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GoogleUserInfo {
    pub id: String,
    pub name: String,
    pub email: String,
    pub verified_email: bool,
    pub picture: String,
}

/// Upper bound on a profile fetch; Home stays on its spinner until it ends.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Fetches the signed-in user's profile with a bearer token.
#[derive(Debug, Clone)]
pub struct UserInfoClient {
    http: reqwest::Client,
    endpoint: String,
    timeout: Duration,
}

impl UserInfoClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
            timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn from_config(config: &GoogleConfig) -> Self {
        Self::new(config.userinfo_url.clone())
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Performs exactly one request; no retries.
    ///
    /// # Errors
    /// Returns an error on transport failure, timeout, a non-success status, or a
    /// malformed body.
    pub async fn fetch(&self, access_token: &str) -> Result<GoogleUserInfo> {
        let response = self
            .http
            .get(&self.endpoint)
            .bearer_auth(access_token)
            .timeout(self.timeout)
            .send()
            .await
            .context("Failed to send userinfo request")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Userinfo request failed (HTTP {status}): {body}");
        }

        response
            .json()
            .await
            .context("Failed to parse userinfo response")
    }
}

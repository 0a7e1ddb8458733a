//! Google sign-in for installed (desktop) applications.
//!
//! Loopback redirect + PKCE. The only thing kept from the exchange is the
//! access token; there is no refresh.

use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use super::{Pkce, bind_callback_listener, generate_pkce, wait_for_code};
use crate::config::GoogleConfig;

/// Redirect path registered for the loopback listener.
pub const CALLBACK_PATH: &str = "/oauth2callback";

/// Scopes needed to read the basic profile.
pub const SCOPES: &str = "openid email profile";

/// Returns whether Google sign-in can be offered at all.
pub fn is_configured(config: &GoogleConfig) -> bool {
    config.effective_client_id().is_some()
}

pub fn build_redirect_uri(port: u16) -> String {
    format!("http://127.0.0.1:{port}{CALLBACK_PATH}")
}

/// A prepared authorization request (PKCE, state, redirect, URL).
#[derive(Debug, Clone)]
pub struct AuthRequest {
    client_id: String,
    client_secret: Option<String>,
    auth_url: String,
    token_url: String,
    pub pkce: Pkce,
    pub state: String,
    pub redirect_uri: String,
}

impl AuthRequest {
    /// Prepares a request redirecting to the given loopback port.
    ///
    /// Returns `None` when no client id is configured.
    pub fn prepare(config: &GoogleConfig, port: u16) -> Option<Self> {
        let client_id = config.effective_client_id()?;
        Some(Self {
            client_id,
            client_secret: config.effective_client_secret(),
            auth_url: config.auth_url.clone(),
            token_url: config.token_url.clone(),
            pkce: generate_pkce(),
            state: uuid::Uuid::new_v4().simple().to_string(),
            redirect_uri: build_redirect_uri(port),
        })
    }

    /// Builds the URL the user opens to grant consent.
    pub fn authorization_url(&self) -> String {
        let query = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("response_type", "code")
            .append_pair("client_id", &self.client_id)
            .append_pair("redirect_uri", &self.redirect_uri)
            .append_pair("scope", SCOPES)
            .append_pair("code_challenge", &self.pkce.challenge)
            .append_pair("code_challenge_method", "S256")
            .append_pair("state", &self.state)
            .finish();

        format!("{}?{query}", self.auth_url)
    }

    /// Checks a state echoed back by a pasted redirect.
    ///
    /// # Errors
    /// Returns an error when a state is present and differs from ours.
    pub fn verify_state(&self, returned: Option<&str>) -> Result<()> {
        match returned {
            Some(state) if state != self.state => {
                anyhow::bail!("OAuth state mismatch. Please try again.")
            }
            _ => Ok(()),
        }
    }

    /// Exchanges an authorization code for an access token.
    ///
    /// # Errors
    /// Returns an error on transport failure, a non-success status, or a malformed body.
    pub async fn exchange_code(&self, code: &str) -> Result<String> {
        let body = {
            let mut form = url::form_urlencoded::Serializer::new(String::new());
            form.append_pair("grant_type", "authorization_code")
                .append_pair("client_id", &self.client_id)
                .append_pair("code", code)
                .append_pair("code_verifier", &self.pkce.verifier)
                .append_pair("redirect_uri", &self.redirect_uri);
            if let Some(secret) = &self.client_secret {
                form.append_pair("client_secret", secret);
            }
            form.finish()
        };

        let response = reqwest::Client::new()
            .post(&self.token_url)
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body(body)
            .send()
            .await
            .context("Failed to send token exchange request")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Token exchange failed (HTTP {status}): {body}");
        }

        let token: TokenResponse = response
            .json()
            .await
            .context("Failed to parse token response")?;
        Ok(token.access_token)
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// An authorization request with its loopback listener already bound.
#[derive(Debug)]
pub struct PendingSignIn {
    pub request: AuthRequest,
    listener: TcpListener,
    timeout: Duration,
}

impl PendingSignIn {
    /// Binds the callback listener and prepares the request.
    ///
    /// # Errors
    /// Returns an error if sign-in is not configured or the port cannot be bound.
    pub async fn start(config: &GoogleConfig) -> Result<Self> {
        if !is_configured(config) {
            anyhow::bail!("Google sign-in is not configured (set google.client_id)");
        }

        let listener = bind_callback_listener(config.callback_port).await?;
        let port = listener
            .local_addr()
            .context("Failed to read callback listener address")?
            .port();
        let request = AuthRequest::prepare(config, port)
            .context("Google sign-in is not configured (set google.client_id)")?;

        tracing::debug!(port, "OAuth callback listener bound");
        Ok(Self {
            request,
            listener,
            timeout: config.callback_timeout(),
        })
    }

    pub fn authorization_url(&self) -> String {
        self.request.authorization_url()
    }

    /// Waits for the browser redirect. `None` on timeout, cancel, or denial.
    pub async fn wait_for_code(&self, cancel: CancellationToken) -> Option<String> {
        wait_for_code(
            &self.listener,
            CALLBACK_PATH,
            &self.request.state,
            self.timeout,
            cancel,
        )
        .await
    }
}

/// Runs the loopback flow end to end and returns the access token.
///
/// `launch` receives the authorization URL (typically opens a browser).
/// Returns `Ok(None)` when the user never completes consent.
///
/// # Errors
/// Returns an error if the flow cannot start or the code exchange fails.
pub async fn authorize(
    config: &GoogleConfig,
    cancel: CancellationToken,
    launch: impl FnOnce(&str),
) -> Result<Option<String>> {
    let pending = PendingSignIn::start(config).await?;
    launch(&pending.authorization_url());

    let Some(code) = pending.wait_for_code(cancel).await else {
        return Ok(None);
    };
    pending.request.exchange_code(&code).await.map(Some)
}

//! OAuth helpers shared by the CLI and the TUI.
//!
//! PKCE generation, pasted-code parsing and the loopback redirect listener.
//! Tokens are never logged or displayed in full.

pub mod google;

use std::time::Duration;

use anyhow::{Context, Result};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use sha2::{Digest, Sha256};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// When set (to anything), authorization URLs are printed instead of opened.
pub const NO_BROWSER_ENV: &str = "PORTAL_NO_BROWSER";

pub fn browser_disabled() -> bool {
    std::env::var_os(NO_BROWSER_ENV).is_some()
}

/// PKCE code verifier and challenge
#[derive(Debug, Clone)]
pub struct Pkce {
    pub verifier: String,
    pub challenge: String,
}

/// Generate PKCE code verifier and challenge
pub fn generate_pkce() -> Pkce {
    // Use two UUIDs (16 bytes each) to get 32 random bytes
    let uuid1 = uuid::Uuid::new_v4();
    let uuid2 = uuid::Uuid::new_v4();
    let mut verifier_bytes = [0u8; 32];
    verifier_bytes[..16].copy_from_slice(uuid1.as_bytes());
    verifier_bytes[16..].copy_from_slice(uuid2.as_bytes());
    let verifier = URL_SAFE_NO_PAD.encode(verifier_bytes);

    let challenge = pkce_challenge(&verifier);

    Pkce {
        verifier,
        challenge,
    }
}

fn pkce_challenge(verifier: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(hasher.finalize())
}

/// Parses a pasted authorization input into code + optional state.
///
/// Accepts a full redirect URL, a raw query string, `code#state`, or a bare code.
pub fn parse_authorization_input(input: &str) -> (Option<String>, Option<String>) {
    let value = input.trim();
    if value.is_empty() {
        return (None, None);
    }

    if let Ok(url) = url::Url::parse(value) {
        let query = url.query().unwrap_or_default();
        return (query_param(query, "code"), query_param(query, "state"));
    }

    if let Some((code, state)) = value.split_once('#') {
        return (Some(code.to_string()), Some(state.to_string()));
    }

    if value.contains("code=") {
        let query = value.trim_start_matches('?');
        return (query_param(query, "code"), query_param(query, "state"));
    }

    (Some(value.to_string()), None)
}

fn query_param(query: &str, name: &str) -> Option<String> {
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
}

/// Returns a masked version of a token for display (first 12 chars + ...).
pub fn mask_token(token: &str) -> String {
    match token.get(..12) {
        Some(prefix) if token.len() > 16 => format!("{prefix}..."),
        _ => "***".to_string(),
    }
}

/// What a single request to the loopback listener carried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Callback {
    /// Authorization code with a matching state.
    Code(String),
    /// The provider redirected back with an error (e.g. `access_denied`).
    Denied(String),
    /// Not our redirect (wrong path, wrong state, favicon probe).
    Ignored,
}

/// Binds the loopback listener for the redirect.
///
/// # Errors
/// Returns an error if the port is unavailable.
pub async fn bind_callback_listener(port: u16) -> Result<TcpListener> {
    TcpListener::bind(("127.0.0.1", port))
        .await
        .with_context(|| format!("Failed to bind OAuth callback listener on 127.0.0.1:{port}"))
}

/// How long a single browser connection may stay silent before it is dropped.
const CONNECTION_READ_TIMEOUT: Duration = Duration::from_secs(5);

/// Waits for the browser redirect and returns the authorization code.
///
/// Returns `None` on timeout, cancellation, a denied consent screen, or a
/// listener failure. Unrelated requests are answered and ignored. Each
/// connection is served on its own task, so an idle preconnect cannot hold
/// back the real redirect.
pub async fn wait_for_code(
    listener: &TcpListener,
    callback_path: &str,
    expected_state: &str,
    timeout: Duration,
    cancel: CancellationToken,
) -> Option<String> {
    let (callback_tx, mut callback_rx) = mpsc::unbounded_channel();

    let accept = async {
        loop {
            tokio::select! {
                conn = listener.accept() => {
                    let (stream, _) = match conn {
                        Ok(conn) => conn,
                        Err(err) => {
                            tracing::warn!(error = %err, "OAuth callback listener failed");
                            return None;
                        }
                    };
                    let callback_tx = callback_tx.clone();
                    let callback_path = callback_path.to_string();
                    let expected_state = expected_state.to_string();
                    tokio::spawn(async move {
                        let callback =
                            answer_connection(stream, &callback_path, &expected_state).await;
                        let _ = callback_tx.send(callback);
                    });
                }
                Some(callback) = callback_rx.recv() => match callback {
                    Callback::Code(code) => return Some(code),
                    Callback::Denied(reason) => {
                        tracing::info!(%reason, "OAuth consent was not granted");
                        return None;
                    }
                    Callback::Ignored => {}
                },
            }
        }
    };

    tokio::select! {
        () = cancel.cancelled() => {
            tracing::debug!("OAuth callback wait cancelled");
            None
        }
        result = tokio::time::timeout(timeout, accept) => {
            result.unwrap_or_else(|_| {
                tracing::info!(timeout_secs = timeout.as_secs(), "OAuth callback timed out");
                None
            })
        }
    }
}

/// Reads one request, answers it, and classifies it.
async fn answer_connection(
    mut stream: TcpStream,
    callback_path: &str,
    expected_state: &str,
) -> Callback {
    let mut buffer = [0u8; 4096];
    let read = match tokio::time::timeout(CONNECTION_READ_TIMEOUT, stream.read(&mut buffer)).await {
        Ok(Ok(read)) => read,
        Ok(Err(_)) | Err(_) => return Callback::Ignored,
    };
    let request = String::from_utf8_lossy(&buffer[..read]);

    let callback = parse_callback_request(&request, callback_path, expected_state);
    let response = match callback {
        Callback::Code(_) => oauth_success_response(),
        Callback::Denied(_) | Callback::Ignored => oauth_error_response(),
    };
    let _ = stream.write_all(response.as_bytes()).await;
    let _ = stream.shutdown().await;
    callback
}

/// Classifies a raw HTTP request received on the loopback listener.
pub fn parse_callback_request(request: &str, callback_path: &str, expected_state: &str) -> Callback {
    let Some(path) = request
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
    else {
        return Callback::Ignored;
    };

    let Ok(url) = url::Url::parse(&format!("http://localhost{path}")) else {
        return Callback::Ignored;
    };
    if url.path() != callback_path {
        return Callback::Ignored;
    }

    let query = url.query().unwrap_or_default();
    let param = |name: &str| query_param(query, name);

    if param("state").as_deref() != Some(expected_state) {
        return Callback::Ignored;
    }
    if let Some(error) = param("error") {
        return Callback::Denied(error);
    }
    param("code").map_or(Callback::Ignored, Callback::Code)
}

fn oauth_success_response() -> String {
    let body = "<!doctype html><html><head><meta charset=\"utf-8\" /><title>Signed in</title></head><body><p>Signed in. Return to your terminal to continue.</p></body></html>";
    format!(
        "HTTP/1.1 200 OK\r\nContent-Type: text/html; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        body.len(),
        body
    )
}

fn oauth_error_response() -> String {
    let body = "Invalid OAuth callback";
    format!(
        "HTTP/1.1 400 Bad Request\r\nContent-Type: text/plain; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        body.len(),
        body
    )
}

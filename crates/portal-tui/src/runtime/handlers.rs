//! Effect handlers for the TUI runtime.
//!
//! Pure async functions that perform I/O and return the `UiEvent` describing
//! the result. They never touch state; the runtime spawns them and forwards the
//! result to the inbox.

use portal_core::config::GoogleConfig;
use portal_core::oauth::google;
use portal_core::session::{AuthOutcome, SessionResolver};
use tokio_util::sync::CancellationToken;

use super::inbox::UiEventSender;
use crate::events::UiEvent;

/// Runs the Google loopback flow. Failures are logged and reported as `None`.
pub async fn google_sign_in(
    config: GoogleConfig,
    cancel: Option<CancellationToken>,
    inbox: UiEventSender,
) -> UiEvent {
    let cancel = cancel.unwrap_or_default();
    let result = google::authorize(&config, cancel, |url| {
        let _ = inbox.send(UiEvent::SignInUrlReady {
            url: url.to_string(),
        });
    })
    .await;

    let outcome = match result {
        Ok(Some(access_token)) => {
            tracing::info!("Google sign-in completed");
            Some(AuthOutcome::Provider { access_token })
        }
        Ok(None) => {
            tracing::info!("Google sign-in ended without a code");
            None
        }
        Err(e) => {
            tracing::warn!(error = %format!("{e:#}"), "Google sign-in failed");
            None
        }
    };
    UiEvent::GoogleSignInFinished { outcome }
}

pub async fn resolve_session(resolver: SessionResolver, outcome: AuthOutcome) -> UiEvent {
    let profile = resolver.resolve(&outcome).await;
    UiEvent::SessionResolved { profile }
}

//! UI effect types.
//!
//! Effects are commands returned by the reducer that the runtime executes.
//! They represent I/O and task spawning only (no direct UI mutations).
//!
//! Cancellation is initiated from the reducer via `UiEffect::CancelTask`;
//! the runtime just calls `token.cancel()`.

use portal_core::session::AuthOutcome;
use tokio_util::sync::CancellationToken;

use crate::common::TaskId;

/// Effects returned by the reducer for the runtime to execute.
#[derive(Debug)]
pub enum UiEffect {
    /// Quit the application.
    Quit,

    /// Open a URL in the system browser (best effort).
    OpenBrowser { url: String },

    /// Bind the loopback listener and run Google sign-in.
    StartGoogleSignIn { task: TaskId },

    /// Resolve the outcome into a profile and persist it.
    ResolveSession { task: TaskId, outcome: AuthOutcome },

    /// Remove the persisted profile.
    Logout,

    /// Cancel an in-flight task.
    CancelTask { token: Option<CancellationToken> },
}

//! UI event types.
//!
//! All external inputs (terminal, async results) are converted to `UiEvent`
//! before being processed by the reducer. Async work reports back through the
//! runtime inbox wrapped in `TaskStarted` / `TaskCompleted`.

use crossterm::event::Event as CrosstermEvent;
use portal_core::profile::UserProfile;
use portal_core::session::AuthOutcome;

use crate::common::{TaskCompleted, TaskKind, TaskStarted};

#[derive(Debug)]
pub enum UiEvent {
    /// Periodic tick; drives the spinner and rendering.
    Tick,

    /// Raw terminal input.
    Terminal(CrosstermEvent),

    /// The runtime spawned a task.
    TaskStarted {
        kind: TaskKind,
        started: TaskStarted,
    },

    /// A task finished; `result` is the event it produced.
    TaskCompleted {
        kind: TaskKind,
        completed: TaskCompleted<Box<UiEvent>>,
    },

    /// The loopback listener is bound and consent can begin.
    SignInUrlReady { url: String },

    /// Google sign-in ended. `None` when cancelled, denied, timed out, or failed.
    GoogleSignInFinished { outcome: Option<AuthOutcome> },

    /// Session resolution ended. `None` when the provider fetch failed.
    SessionResolved { profile: Option<UserProfile> },

    /// The persisted profile was removed (or was already gone).
    LoggedOut,

    /// The store could not be cleared; the profile is still persisted.
    LogoutFailed { error: String },
}

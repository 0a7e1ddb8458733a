//! Application state composition.
//!
//! ```text
//! AppState
//! ├── screen: Screen          (Login | Home)
//! ├── login: LoginState       (menu selection, readiness, pending URL)
//! ├── home: HomeState         (resolved profile, status)
//! ├── task_seq: TaskSeq       (async task id generator)
//! └── tasks: Tasks            (task lifecycle state)
//! ```

use crate::common::{TaskSeq, Tasks};
use crate::home::HomeState;
use crate::login::LoginState;

/// Navigation destinations. Home is entered carrying an `AuthOutcome`, which
/// is handed straight to the resolver task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Login,
    Home,
}

#[derive(Debug)]
pub struct AppState {
    pub screen: Screen,
    pub login: LoginState,
    pub home: HomeState,
    pub task_seq: TaskSeq,
    pub tasks: Tasks,
    pub spinner_frame: usize,
    pub should_quit: bool,
}

impl AppState {
    /// Starts on Login. `google_ready` gates the Google action.
    pub fn new(google_ready: bool) -> Self {
        Self {
            screen: Screen::Login,
            login: LoginState::new(google_ready),
            home: HomeState::default(),
            task_seq: TaskSeq::default(),
            tasks: Tasks::default(),
            spinner_frame: 0,
            should_quit: false,
        }
    }
}

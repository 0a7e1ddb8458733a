//! TUI reducer (update function).
//!
//! All state mutations happen here. The runtime calls `update(app, event)`
//! and executes the returned effects.

use crossterm::event::{Event, KeyEventKind};

#[cfg(test)]
use crate::common::TaskKind;
use crate::effects::UiEffect;
use crate::events::UiEvent;
use crate::state::{AppState, Screen};
use crate::{home, login};

/// Takes the current state and an event, mutates state, and returns effects
/// for the runtime to execute.
pub fn update(app: &mut AppState, event: UiEvent) -> Vec<UiEffect> {
    match event {
        UiEvent::Tick => {
            app.spinner_frame = app.spinner_frame.wrapping_add(1);
            vec![]
        }
        UiEvent::Terminal(term_event) => handle_terminal_event(app, term_event),
        UiEvent::TaskStarted { kind, started } => {
            let state = app.tasks.state_mut(kind);
            // Ignore starts for tasks the reducer already abandoned.
            if state.active == Some(started.id) {
                state.on_started(&started);
            } else if let Some(cancel) = started.cancel {
                cancel.cancel();
            }
            vec![]
        }
        UiEvent::TaskCompleted { kind, completed } => {
            if !app.tasks.state_mut(kind).finish_if_active(completed.id) {
                tracing::debug!(?kind, id = completed.id.0, "Dropping stale task result");
                return vec![];
            }
            update(app, *completed.result)
        }
        UiEvent::SignInUrlReady { url } => login::handle_sign_in_url(app, url),
        UiEvent::GoogleSignInFinished { outcome } => {
            login::handle_sign_in_finished(app, outcome)
        }
        UiEvent::SessionResolved { profile } => home::handle_session_resolved(app, profile),
        UiEvent::LoggedOut => home::handle_logged_out(app),
        UiEvent::LogoutFailed { error } => home::handle_logout_failed(app, &error),
    }
}

fn handle_terminal_event(app: &mut AppState, event: Event) -> Vec<UiEffect> {
    let Event::Key(key) = event else {
        return vec![];
    };
    if key.kind != KeyEventKind::Press {
        return vec![];
    }

    match app.screen {
        Screen::Login => login::handle_key(app, key),
        Screen::Home => home::handle_key(app, key),
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use portal_core::profile::UserProfile;
    use portal_core::session::AuthOutcome;
    use tokio_util::sync::CancellationToken;

    use super::*;
    use crate::common::{TaskCompleted, TaskStarted};

    fn press(c: char) -> UiEvent {
        UiEvent::Terminal(Event::Key(KeyEvent::new(
            KeyCode::Char(c),
            KeyModifiers::NONE,
        )))
    }

    fn completed(kind: TaskKind, id: crate::common::TaskId, result: UiEvent) -> UiEvent {
        UiEvent::TaskCompleted {
            kind,
            completed: TaskCompleted {
                id,
                result: Box::new(result),
            },
        }
    }

    #[test]
    fn test_guest_flow_end_to_end() {
        let mut app = AppState::new(false);

        let effects = update(&mut app, press('u'));
        let [UiEffect::ResolveSession { task, .. }] = effects.as_slice() else {
            panic!("expected resolve effect");
        };
        let task = *task;

        let profile = UserProfile::guest("g1", "http://placeholder");
        update(
            &mut app,
            completed(
                TaskKind::ResolveSession,
                task,
                UiEvent::SessionResolved {
                    profile: Some(profile.clone()),
                },
            ),
        );

        assert_eq!(app.screen, Screen::Home);
        assert!(!app.home.resolving);
        assert_eq!(app.home.profile, Some(profile));
    }

    #[test]
    fn test_google_flow_end_to_end() {
        let mut app = AppState::new(true);

        let effects = update(&mut app, press('g'));
        let [UiEffect::StartGoogleSignIn { task }] = effects.as_slice() else {
            panic!("expected sign-in effect");
        };
        let task = *task;

        update(
            &mut app,
            UiEvent::TaskStarted {
                kind: TaskKind::GoogleSignIn,
                started: TaskStarted {
                    id: task,
                    cancel: Some(CancellationToken::new()),
                },
            },
        );
        let effects = update(
            &mut app,
            UiEvent::SignInUrlReady {
                url: "https://accounts.google.com/o/oauth2/v2/auth?x=1".to_string(),
            },
        );
        assert!(matches!(effects.as_slice(), [UiEffect::OpenBrowser { .. }]));

        let outcome = AuthOutcome::Provider {
            access_token: "ya29.token".to_string(),
        };
        let effects = update(
            &mut app,
            completed(
                TaskKind::GoogleSignIn,
                task,
                UiEvent::GoogleSignInFinished {
                    outcome: Some(outcome),
                },
            ),
        );

        assert_eq!(app.screen, Screen::Home);
        assert!(!app.tasks.google_sign_in.is_running());
        assert!(matches!(
            effects.as_slice(),
            [UiEffect::ResolveSession {
                outcome: AuthOutcome::Provider { .. },
                ..
            }]
        ));
    }

    #[test]
    fn test_cancelled_task_result_is_dropped() {
        let mut app = AppState::new(true);
        let effects = update(&mut app, press('g'));
        let [UiEffect::StartGoogleSignIn { task }] = effects.as_slice() else {
            panic!("expected sign-in effect");
        };
        let task = *task;

        update(
            &mut app,
            UiEvent::Terminal(Event::Key(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE))),
        );

        // A late success after Esc must not navigate.
        let effects = update(
            &mut app,
            completed(
                TaskKind::GoogleSignIn,
                task,
                UiEvent::GoogleSignInFinished {
                    outcome: Some(AuthOutcome::Provider {
                        access_token: "late".to_string(),
                    }),
                },
            ),
        );

        assert!(effects.is_empty());
        assert_eq!(app.screen, Screen::Login);
    }

    #[test]
    fn test_late_start_of_abandoned_task_is_cancelled() {
        let mut app = AppState::new(true);
        let effects = update(&mut app, press('g'));
        let [UiEffect::StartGoogleSignIn { task }] = effects.as_slice() else {
            panic!("expected sign-in effect");
        };
        let task = *task;
        update(
            &mut app,
            UiEvent::Terminal(Event::Key(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE))),
        );

        let token = CancellationToken::new();
        update(
            &mut app,
            UiEvent::TaskStarted {
                kind: TaskKind::GoogleSignIn,
                started: TaskStarted {
                    id: task,
                    cancel: Some(token.clone()),
                },
            },
        );

        assert!(token.is_cancelled());
        assert!(!app.tasks.google_sign_in.is_running());
    }

    #[test]
    fn test_home_keys_route_by_screen() {
        let mut app = AppState::new(false);
        // 'l' means nothing on Login.
        assert!(update(&mut app, press('l')).is_empty());
        assert_eq!(app.screen, Screen::Login);
    }
}

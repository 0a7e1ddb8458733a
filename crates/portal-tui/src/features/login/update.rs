//! Login reducer.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use portal_core::session::AuthOutcome;

use super::LoginAction;
use crate::effects::UiEffect;
use crate::home;
use crate::state::{AppState, Screen};

pub fn handle_key(app: &mut AppState, key: KeyEvent) -> Vec<UiEffect> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('c') if ctrl => quit(app),
        KeyCode::Char('q') => quit(app),
        KeyCode::Esc => cancel_pending(app),
        KeyCode::Up | KeyCode::Char('k') => {
            app.login.select_prev();
            vec![]
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.login.select_next();
            vec![]
        }
        KeyCode::Enter => {
            let action = app.login.selected_action();
            activate(app, action)
        }
        KeyCode::Char('g') => activate(app, LoginAction::Google),
        KeyCode::Char('u') => activate(app, LoginAction::Guest),
        _ => vec![],
    }
}

fn activate(app: &mut AppState, action: LoginAction) -> Vec<UiEffect> {
    match action {
        LoginAction::Google => sign_in_with_google(app),
        LoginAction::Guest => {
            let mut effects = cancel_pending(app);
            effects.extend(home::enter(app, AuthOutcome::Guest));
            effects
        }
    }
}

fn sign_in_with_google(app: &mut AppState) -> Vec<UiEffect> {
    // Disabled until configured, and a no-op while an attempt is in flight.
    if !app.login.google_ready || app.tasks.google_sign_in.is_running() {
        return vec![];
    }

    let task = app.task_seq.next_id();
    // Claimed now so a second press before the runtime reports the start is ignored.
    app.tasks.google_sign_in.active = Some(task);
    app.login.auth_url = None;
    vec![UiEffect::StartGoogleSignIn { task }]
}

fn cancel_pending(app: &mut AppState) -> Vec<UiEffect> {
    if !app.tasks.google_sign_in.is_running() {
        return vec![];
    }
    let token = app.tasks.google_sign_in.cancel.clone();
    app.tasks.google_sign_in.clear();
    app.login.auth_url = None;
    vec![UiEffect::CancelTask { token }]
}

fn quit(app: &mut AppState) -> Vec<UiEffect> {
    let mut effects = cancel_pending(app);
    effects.push(UiEffect::Quit);
    effects
}

/// Stores the authorization URL and opens it.
pub fn handle_sign_in_url(app: &mut AppState, url: String) -> Vec<UiEffect> {
    if app.screen != Screen::Login || !app.tasks.google_sign_in.is_running() {
        return vec![];
    }
    app.login.auth_url = Some(url.clone());
    vec![UiEffect::OpenBrowser { url }]
}

/// Completes a Google attempt. Failures leave the user on Login.
pub fn handle_sign_in_finished(app: &mut AppState, outcome: Option<AuthOutcome>) -> Vec<UiEffect> {
    app.login.auth_url = None;
    match outcome {
        Some(outcome) if app.screen == Screen::Login => home::enter(app, outcome),
        _ => vec![],
    }
}

#[cfg(test)]
mod tests {
    use tokio_util::sync::CancellationToken;

    use super::*;
    use crate::common::{TaskKind, TaskStarted};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_guest_navigates_home_and_resolves() {
        let mut app = AppState::new(false);
        let effects = handle_key(&mut app, key(KeyCode::Char('u')));

        assert_eq!(app.screen, Screen::Home);
        assert!(app.home.resolving);
        assert!(matches!(
            effects.as_slice(),
            [UiEffect::ResolveSession {
                outcome: AuthOutcome::Guest,
                ..
            }]
        ));
    }

    #[test]
    fn test_enter_on_guest_entry() {
        let mut app = AppState::new(true);
        handle_key(&mut app, key(KeyCode::Down));
        assert_eq!(app.login.selected_action(), LoginAction::Guest);

        let effects = handle_key(&mut app, key(KeyCode::Enter));
        assert_eq!(app.screen, Screen::Home);
        assert_eq!(effects.len(), 1);
    }

    #[test]
    fn test_google_disabled_until_configured() {
        let mut app = AppState::new(false);
        let effects = handle_key(&mut app, key(KeyCode::Char('g')));

        assert!(effects.is_empty());
        assert_eq!(app.screen, Screen::Login);
        assert!(!app.tasks.google_sign_in.is_running());
    }

    #[test]
    fn test_google_is_noop_while_in_flight() {
        let mut app = AppState::new(true);
        let first = handle_key(&mut app, key(KeyCode::Enter));
        assert!(matches!(first.as_slice(), [UiEffect::StartGoogleSignIn { .. }]));

        let second = handle_key(&mut app, key(KeyCode::Char('g')));
        assert!(second.is_empty());
    }

    #[test]
    fn test_escape_cancels_pending_sign_in() {
        let mut app = AppState::new(true);
        let effects = handle_key(&mut app, key(KeyCode::Char('g')));
        let [UiEffect::StartGoogleSignIn { task }] = effects.as_slice() else {
            panic!("expected sign-in effect");
        };
        let token = CancellationToken::new();
        app.tasks
            .state_mut(TaskKind::GoogleSignIn)
            .on_started(&TaskStarted {
                id: *task,
                cancel: Some(token.clone()),
            });

        let effects = handle_key(&mut app, key(KeyCode::Esc));

        assert!(matches!(
            effects.as_slice(),
            [UiEffect::CancelTask { token: Some(_) }]
        ));
        assert!(!app.tasks.google_sign_in.is_running());
        assert_eq!(app.screen, Screen::Login);
    }

    #[test]
    fn test_failed_sign_in_stays_on_login() {
        let mut app = AppState::new(true);
        handle_key(&mut app, key(KeyCode::Char('g')));
        app.login.auth_url = Some("https://accounts.google.com/o/oauth2/v2/auth".to_string());

        let effects = handle_sign_in_finished(&mut app, None);

        assert!(effects.is_empty());
        assert_eq!(app.screen, Screen::Login);
        assert!(app.login.auth_url.is_none());
    }

    #[test]
    fn test_successful_sign_in_carries_token_home() {
        let mut app = AppState::new(true);
        let outcome = AuthOutcome::Provider {
            access_token: "ya29.token".to_string(),
        };

        let effects = handle_sign_in_finished(&mut app, Some(outcome.clone()));

        assert_eq!(app.screen, Screen::Home);
        match effects.as_slice() {
            [UiEffect::ResolveSession { outcome: got, .. }] => assert_eq!(got, &outcome),
            other => panic!("unexpected effects: {other:?}"),
        }
    }

    #[test]
    fn test_quit_key() {
        let mut app = AppState::new(true);
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);

        assert!(matches!(
            handle_key(&mut app, ctrl_c).as_slice(),
            [UiEffect::Quit]
        ));
    }
}

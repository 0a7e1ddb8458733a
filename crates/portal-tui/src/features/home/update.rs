//! Home reducer.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use portal_core::profile::UserProfile;
use portal_core::session::AuthOutcome;

use super::HomeState;
use crate::effects::UiEffect;
use crate::state::{AppState, Screen};

/// Navigates to Home carrying `outcome` and schedules its resolution.
pub fn enter(app: &mut AppState, outcome: AuthOutcome) -> Vec<UiEffect> {
    app.screen = Screen::Home;
    app.home = HomeState::resolving();

    let task = app.task_seq.next_id();
    app.tasks.resolve_session.active = Some(task);
    vec![UiEffect::ResolveSession { task, outcome }]
}

pub fn handle_key(app: &mut AppState, key: KeyEvent) -> Vec<UiEffect> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('c') if ctrl => vec![UiEffect::Quit],
        KeyCode::Char('q') => vec![UiEffect::Quit],
        KeyCode::Char('l') => logout(&mut app.home),
        KeyCode::Char('o') => app
            .home
            .image_url()
            .map(|url| {
                vec![UiEffect::OpenBrowser {
                    url: url.to_string(),
                }]
            })
            .unwrap_or_default(),
        _ => vec![],
    }
}

/// Shown when logout is requested before the profile has been persisted.
pub const LOGOUT_DEFERRED_NOTICE: &str = "Finishing sign-in; press l again once the profile loads.";

fn logout(home: &mut HomeState) -> Vec<UiEffect> {
    // The resolver persists when it finishes; clearing before that would be undone.
    if home.resolving {
        home.notice = Some(LOGOUT_DEFERRED_NOTICE.to_string());
        return vec![];
    }
    home.notice = None;
    vec![UiEffect::Logout]
}

pub fn handle_session_resolved(app: &mut AppState, profile: Option<UserProfile>) -> Vec<UiEffect> {
    app.home.profile = profile;
    app.home.resolving = false;
    app.home.notice = None;
    vec![]
}

// Stays on Home afterwards; there is no route back to Login.
pub fn handle_logged_out(app: &mut AppState) -> Vec<UiEffect> {
    app.home.profile = None;
    app.home.signed_out = true;
    app.home.notice = None;
    vec![]
}

pub fn handle_logout_failed(app: &mut AppState, error: &str) -> Vec<UiEffect> {
    app.home.notice = Some(format!("Logout failed: {error}"));
    vec![]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
    }

    fn ann() -> UserProfile {
        UserProfile {
            id: "42".to_string(),
            name: "Ann".to_string(),
            email: Some("a@x.com".to_string()),
            verified_email: Some(true),
            profile_image: "http://img".to_string(),
        }
    }

    fn resolved_home(profile: Option<UserProfile>) -> AppState {
        let mut app = AppState::new(false);
        enter(&mut app, AuthOutcome::Guest);
        app.tasks.resolve_session.clear();
        handle_session_resolved(&mut app, profile);
        app
    }

    #[test]
    fn test_logout_clears_profile_and_stays_home() {
        let mut app = resolved_home(Some(ann()));

        let effects = handle_key(&mut app, key('l'));
        assert!(matches!(effects.as_slice(), [UiEffect::Logout]));

        handle_logged_out(&mut app);
        assert!(app.home.profile.is_none());
        assert!(app.home.signed_out);
        assert_eq!(app.screen, Screen::Home);
    }

    #[test]
    fn test_logout_twice_is_harmless() {
        let mut app = resolved_home(Some(ann()));
        handle_key(&mut app, key('l'));
        handle_logged_out(&mut app);

        let effects = handle_key(&mut app, key('l'));
        assert!(matches!(effects.as_slice(), [UiEffect::Logout]));
        handle_logged_out(&mut app);
        assert!(app.home.profile.is_none());
    }

    #[test]
    fn test_logout_waits_for_resolution() {
        let mut app = AppState::new(false);
        enter(&mut app, AuthOutcome::Guest);

        assert!(handle_key(&mut app, key('l')).is_empty());
        assert_eq!(app.home.notice.as_deref(), Some(LOGOUT_DEFERRED_NOTICE));

        app.tasks.resolve_session.clear();
        handle_session_resolved(&mut app, Some(ann()));
        assert!(app.home.notice.is_none());
        assert!(matches!(
            handle_key(&mut app, key('l')).as_slice(),
            [UiEffect::Logout]
        ));
    }

    #[test]
    fn test_failed_logout_keeps_profile() {
        let mut app = resolved_home(Some(ann()));
        handle_key(&mut app, key('l'));

        handle_logout_failed(&mut app, "Failed to parse storage");

        assert_eq!(app.home.profile, Some(ann()));
        assert!(!app.home.signed_out);
        assert_eq!(
            app.home.notice.as_deref(),
            Some("Logout failed: Failed to parse storage")
        );
    }

    #[test]
    fn test_open_image_only_with_profile() {
        let mut app = resolved_home(Some(ann()));
        assert!(matches!(
            handle_key(&mut app, key('o')).as_slice(),
            [UiEffect::OpenBrowser { url }] if url == "http://img"
        ));

        let mut anonymous = resolved_home(None);
        assert!(handle_key(&mut anonymous, key('o')).is_empty());
    }
}

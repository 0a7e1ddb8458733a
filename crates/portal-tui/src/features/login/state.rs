/// Entries of the login menu, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginAction {
    Google,
    Guest,
}

impl LoginAction {
    pub const ALL: [LoginAction; 2] = [LoginAction::Google, LoginAction::Guest];

    pub fn label(self) -> &'static str {
        match self {
            LoginAction::Google => "Sign in with Google",
            LoginAction::Guest => "Continue as guest",
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoginState {
    pub selected: usize,
    /// Whether a Google client id is configured.
    pub google_ready: bool,
    /// Authorization URL of the in-flight sign-in, once the listener is bound.
    pub auth_url: Option<String>,
}

impl LoginState {
    pub fn new(google_ready: bool) -> Self {
        Self {
            selected: 0,
            google_ready,
            auth_url: None,
        }
    }

    pub fn selected_action(&self) -> LoginAction {
        LoginAction::ALL[self.selected.min(LoginAction::ALL.len() - 1)]
    }

    pub fn select_next(&mut self) {
        self.selected = (self.selected + 1).min(LoginAction::ALL.len() - 1);
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }
}

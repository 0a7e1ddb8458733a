//! Login screen: Google sign-in or guest entry.

mod render;
mod state;
mod update;

pub use render::render_login;
pub use state::{LoginAction, LoginState};
pub use update::{handle_key, handle_sign_in_finished, handle_sign_in_url};

//! Home screen: resolved identity and logout.

mod render;
mod state;
mod update;

pub use render::render_home;
pub use state::HomeState;
pub use update::{
    enter, handle_key, handle_logged_out, handle_logout_failed, handle_session_resolved,
};

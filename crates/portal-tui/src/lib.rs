//! Full-screen TUI for portal: Login and Home screens.

pub mod common;
pub mod effects;
pub mod events;
pub mod features;
pub mod render;
pub mod runtime;
pub mod state;
pub mod terminal;
pub mod update;

use std::io::{IsTerminal, stdout};

use anyhow::Result;
pub use features::{home, login};
use portal_core::config::Config;
use portal_core::session::SessionResolver;
pub use runtime::TuiRuntime;

/// Runs the interactive sign-in flow until the user quits.
///
/// # Errors
/// Returns an error if stdout is not a terminal or terminal I/O fails.
pub async fn run(config: &Config, resolver: SessionResolver) -> Result<()> {
    if !stdout().is_terminal() {
        anyhow::bail!(
            "The interactive sign-in requires a terminal.\n\
             Use `portal login --guest` or `portal login --google` instead."
        );
    }

    let mut runtime = TuiRuntime::new(config.google.clone(), resolver)?;
    runtime.run()
}

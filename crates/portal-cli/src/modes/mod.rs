//! Runtime execution modes.
//!
//! - headless: `portal login`, `whoami`, `logout` (see `cli::commands`)
//! - `tui`: full-screen Login/Home screens (optional feature)

#[cfg(feature = "tui")]
pub use portal_tui::run as run_tui;

#[cfg(not(feature = "tui"))]
pub async fn run_tui(
    _config: &portal_core::config::Config,
    _resolver: portal_core::session::SessionResolver,
) -> anyhow::Result<()> {
    anyhow::bail!(
        "TUI support is disabled in this build (feature \"tui\").\n\
         Use `portal login --guest` or `portal login --google` instead."
    );
}

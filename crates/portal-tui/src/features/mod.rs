//! Feature slices for the TUI (state/update/render per screen).

pub mod home;
pub mod login;

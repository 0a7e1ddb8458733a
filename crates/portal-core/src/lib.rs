//! Core portal library (config, storage, OAuth, session resolution).

pub mod config;
pub mod logging;
pub mod oauth;
pub mod profile;
pub mod session;
pub mod store;
pub mod userinfo;

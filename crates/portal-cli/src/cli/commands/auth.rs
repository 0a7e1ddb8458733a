//! Headless sign-in, whoami, and logout.

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use portal_core::config::{Config, paths};
use portal_core::oauth::google::{AuthRequest, PendingSignIn};
use portal_core::oauth::{self, parse_authorization_input};
use portal_core::profile::UserProfile;
use portal_core::session::{AuthOutcome, SessionResolver, home_lines};
use tokio_util::sync::CancellationToken;

pub async fn login_guest(resolver: &SessionResolver) -> Result<()> {
    enter_home(resolver, AuthOutcome::Guest).await;
    Ok(())
}

pub async fn login_with_token(resolver: &SessionResolver, access_token: String) -> Result<()> {
    enter_home(resolver, AuthOutcome::Provider { access_token }).await;
    Ok(())
}

pub async fn login_google(config: &Config, resolver: &SessionResolver) -> Result<()> {
    if !oauth::google::is_configured(&config.google) {
        anyhow::bail!(
            "Google sign-in is not configured.\n\
             Set google.client_id in {} or export {}.",
            paths::config_path().display(),
            portal_core::config::CLIENT_ID_ENV
        );
    }

    let (request, code) = match PendingSignIn::start(&config.google).await {
        Ok(pending) => {
            print_instructions(&pending.authorization_url());
            let code = pending.wait_for_code(CancellationToken::new()).await;
            (pending.request, code)
        }
        Err(e) => {
            // No listener: the user pastes the redirect URL instead.
            tracing::warn!(error = %format!("{e:#}"), "Callback listener unavailable");
            let request = AuthRequest::prepare(&config.google, config.google.callback_port)
                .context("Google sign-in is not configured")?;
            print_instructions(&request.authorization_url());
            (request, None)
        }
    };

    let code = match code {
        Some(code) => Some(code),
        None => prompt_for_code(&request)?,
    };
    let Some(code) = code else {
        eprintln!("Google sign-in did not complete; no profile saved.");
        return Ok(());
    };

    println!("Exchanging code for an access token...");
    match request.exchange_code(&code).await {
        Ok(access_token) => {
            tracing::info!(token = %oauth::mask_token(&access_token), "Google sign-in completed");
            enter_home(resolver, AuthOutcome::Provider { access_token }).await;
        }
        Err(e) => {
            tracing::warn!(error = %format!("{e:#}"), "Token exchange failed");
            eprintln!("Google sign-in did not complete; no profile saved.");
        }
    }
    Ok(())
}

fn print_instructions(url: &str) {
    println!("To sign in with Google:");
    println!();
    println!("  1. A browser window will open (or visit the URL below)");
    println!("  2. Choose your Google account and allow access");
    println!("  3. If redirected to 127.0.0.1, return here to continue");
    println!("  4. Otherwise, paste the authorization code or URL");
    println!();
    println!("Authorization URL:");
    println!("  {url}");
    println!();

    if !oauth::browser_disabled() {
        let _ = open::that(url);
    }
}

fn prompt_for_code(request: &AuthRequest) -> Result<Option<String>> {
    print!("Paste authorization code (or full redirect URL): ");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().lock().read_line(&mut input)?;
    let (code, provided_state) = parse_authorization_input(&input);
    request.verify_state(provided_state.as_deref())?;
    Ok(code)
}

async fn enter_home(resolver: &SessionResolver, outcome: AuthOutcome) {
    let profile = resolver.resolve(&outcome).await;
    print_home(profile.as_ref());
}

fn print_home(profile: Option<&UserProfile>) {
    for line in home_lines(profile) {
        println!("{line}");
    }
}

pub fn whoami(resolver: &SessionResolver) -> Result<()> {
    match resolver.current()? {
        Some(profile) => {
            print_home(Some(&profile));
            println!("Id: {}", profile.id);
        }
        None => println!("Not logged in"),
    }
    Ok(())
}

pub fn logout(resolver: &SessionResolver) -> Result<()> {
    if resolver.logout().context("Logout failed")? {
        println!("✓ Logged out");
        println!("  Profile removed from: {}", paths::storage_path().display());
    } else {
        println!("Not logged in (no saved profile).");
    }
    Ok(())
}

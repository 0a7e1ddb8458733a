//! Session resolution: turns a raw sign-in result into a persisted profile.

use std::fmt;
use std::sync::Arc;

use anyhow::Result;

use crate::config::Config;
use crate::profile::{self, UserProfile};
use crate::store::KeyValueStore;
use crate::userinfo::UserInfoClient;

/// Text shown on Home when no profile could be resolved.
pub const ANONYMOUS_LABEL: &str = "Guest User";

/// Result of a sign-in attempt, handed from Login to Home.
#[derive(Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    Guest,
    Provider { access_token: String },
}

impl fmt::Debug for AuthOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Guest => f.write_str("Guest"),
            Self::Provider { access_token } => f
                .debug_struct("Provider")
                .field("access_token", &crate::oauth::mask_token(access_token))
                .finish(),
        }
    }
}

/// Resolves sign-in outcomes into profiles and owns logout.
#[derive(Clone)]
pub struct SessionResolver {
    store: Arc<dyn KeyValueStore>,
    userinfo: UserInfoClient,
    guest_avatar: String,
}

impl SessionResolver {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        userinfo: UserInfoClient,
        guest_avatar: impl Into<String>,
    ) -> Self {
        Self {
            store,
            userinfo,
            guest_avatar: guest_avatar.into(),
        }
    }

    pub fn from_config(config: &Config, store: Arc<dyn KeyValueStore>) -> Self {
        Self::new(
            store,
            UserInfoClient::from_config(&config.google),
            config.guest.avatar_url.clone(),
        )
    }

    /// Produces and persists the profile for `outcome`.
    ///
    /// A failed profile fetch is logged and yields `None`; nothing is persisted
    /// in that case. A failed store write is logged and the profile is still
    /// returned.
    pub async fn resolve(&self, outcome: &AuthOutcome) -> Option<UserProfile> {
        let profile = match outcome {
            AuthOutcome::Guest => {
                let id = uuid::Uuid::new_v4().simple().to_string();
                UserProfile::guest(id, self.guest_avatar.clone())
            }
            AuthOutcome::Provider { access_token } => {
                match self.userinfo.fetch(access_token).await {
                    Ok(info) => UserProfile::from(info),
                    Err(e) => {
                        tracing::error!(
                            endpoint = self.userinfo.endpoint(),
                            error = %format!("{e:#}"),
                            "Failed to fetch user profile"
                        );
                        return None;
                    }
                }
            }
        };

        if let Err(e) = profile::save(self.store.as_ref(), &profile) {
            tracing::warn!(error = %format!("{e:#}"), "Failed to persist profile");
        } else {
            tracing::info!(id = %profile.id, guest = profile.is_guest(), "Profile persisted");
        }

        Some(profile)
    }

    /// Forgets the local session. Never contacts the provider.
    ///
    /// Returns whether a persisted profile was removed. Safe to call repeatedly.
    ///
    /// # Errors
    /// Returns an error if the store cannot be read or rewritten; the profile
    /// is then still persisted.
    pub fn logout(&self) -> Result<bool> {
        let removed = profile::clear(self.store.as_ref())?;
        tracing::info!(removed, "Logged out");
        Ok(removed)
    }

    /// Loads the persisted profile, if any.
    ///
    /// # Errors
    /// Returns an error if the store cannot be read or holds a malformed value.
    pub fn current(&self) -> Result<Option<UserProfile>> {
        profile::load(self.store.as_ref())
    }
}

/// Headline for the Home screen.
pub fn home_greeting(profile: Option<&UserProfile>) -> String {
    profile.map_or_else(
        || ANONYMOUS_LABEL.to_string(),
        |p| format!("Welcome, {}", p.name),
    )
}

/// Plain-text Home rendering shared by the CLI and TUI tests.
pub fn home_lines(profile: Option<&UserProfile>) -> Vec<String> {
    let mut lines = vec![home_greeting(profile)];
    let Some(profile) = profile else {
        return lines;
    };

    if let Some(email) = &profile.email {
        let verified = match profile.verified_email {
            Some(true) => " (verified)",
            Some(false) => " (unverified)",
            None => "",
        };
        lines.push(format!("Email: {email}{verified}"));
    }
    if !profile.profile_image.is_empty() {
        lines.push(format!("Image: {}", profile.profile_image));
    }
    lines
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{header, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::profile::PROFILE_KEY;
    use crate::store::{FileStore, MemoryStore};

    const AVATAR: &str = "http://placeholder/avatar.jpg";

    fn resolver(store: Arc<MemoryStore>, endpoint: String) -> SessionResolver {
        SessionResolver::new(store, UserInfoClient::new(endpoint), AVATAR)
    }

    fn ann_json() -> serde_json::Value {
        serde_json::json!({
            "id": "42",
            "name": "Ann",
            "email": "a@x.com",
            "verified_email": true,
            "picture": "http://img",
        })
    }

    #[tokio::test]
    async fn test_guest_resolution() {
        let store = Arc::new(MemoryStore::new());
        let resolver = resolver(Arc::clone(&store), "http://127.0.0.1:9/unused".to_string());

        let profile = resolver.resolve(&AuthOutcome::Guest).await.unwrap();

        assert_eq!(profile.name, "Guest");
        assert!(profile.email.is_none());
        assert!(profile.verified_email.is_none());
        assert_eq!(profile.profile_image, AVATAR);
        assert_eq!(resolver.current().unwrap(), Some(profile));
    }

    #[tokio::test]
    async fn test_two_guests_get_distinct_ids() {
        let store = Arc::new(MemoryStore::new());
        let resolver = resolver(store, "http://127.0.0.1:9/unused".to_string());

        let first = resolver.resolve(&AuthOutcome::Guest).await.unwrap();
        let second = resolver.resolve(&AuthOutcome::Guest).await.unwrap();

        assert_ne!(first.id, second.id);
        assert_eq!(first.name, second.name);
        assert_eq!(first.profile_image, second.profile_image);
    }

    #[tokio::test]
    async fn test_provider_profile_is_mapped_and_persisted() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(header("authorization", "Bearer tok"))
            .respond_with(ResponseTemplate::new(200).set_body_json(ann_json()))
            .expect(1)
            .mount(&server)
            .await;

        let store = Arc::new(MemoryStore::new());
        let resolver = resolver(Arc::clone(&store), server.uri());
        let outcome = AuthOutcome::Provider {
            access_token: "tok".to_string(),
        };

        resolver.resolve(&outcome).await.unwrap();

        let raw = store.get_item(PROFILE_KEY).unwrap().unwrap();
        let persisted: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(
            persisted,
            serde_json::json!({
                "id": "42",
                "name": "Ann",
                "email": "a@x.com",
                "verified_email": true,
                "profileImage": "http://img",
            })
        );
    }

    #[tokio::test]
    async fn test_failed_fetch_persists_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;

        let store = Arc::new(MemoryStore::new());
        let resolver = resolver(Arc::clone(&store), server.uri());
        let outcome = AuthOutcome::Provider {
            access_token: "tok".to_string(),
        };

        let profile = resolver.resolve(&outcome).await;

        assert!(profile.is_none());
        assert!(store.is_empty());
        assert_eq!(home_lines(profile.as_ref()), vec!["Guest User".to_string()]);
    }

    #[tokio::test]
    async fn test_logout_is_idempotent() {
        let store = Arc::new(MemoryStore::new());
        let resolver = resolver(Arc::clone(&store), "http://127.0.0.1:9/unused".to_string());
        resolver.resolve(&AuthOutcome::Guest).await.unwrap();

        assert!(resolver.logout().unwrap());
        assert!(store.get_item(PROFILE_KEY).unwrap().is_none());
        assert!(!resolver.logout().unwrap());
        assert_eq!(resolver.current().unwrap(), None);
    }

    #[tokio::test]
    async fn test_logout_reports_unreadable_storage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        let store = Arc::new(FileStore::new(&path));
        let resolver = SessionResolver::new(
            store,
            UserInfoClient::new("http://127.0.0.1:9/unused"),
            AVATAR,
        );
        resolver.resolve(&AuthOutcome::Guest).await.unwrap();
        std::fs::write(&path, "{ not json").unwrap();

        let err = resolver.logout().unwrap_err();
        assert!(format!("{err:#}").contains("Failed to parse storage"));
    }

    #[test]
    fn test_home_lines() {
        let ann = UserProfile {
            id: "42".to_string(),
            name: "Ann".to_string(),
            email: Some("a@x.com".to_string()),
            verified_email: Some(true),
            profile_image: "http://img".to_string(),
        };
        assert_eq!(
            home_lines(Some(&ann)),
            vec![
                "Welcome, Ann".to_string(),
                "Email: a@x.com (verified)".to_string(),
                "Image: http://img".to_string(),
            ]
        );

        let guest = UserProfile::guest("g", "http://p");
        assert_eq!(
            home_lines(Some(&guest)),
            vec!["Welcome, Guest".to_string(), "Image: http://p".to_string()]
        );
    }

    #[test]
    fn test_outcome_debug_masks_token() {
        let outcome = AuthOutcome::Provider {
            access_token: "ya29.averyveryverylongsecret".to_string(),
        };
        let debug = format!("{outcome:?}");
        assert!(!debug.contains("averyveryverylongsecret"));
    }
}

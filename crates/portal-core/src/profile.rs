//! Normalized user profile and its persisted slot.
//!
//! The profile lives in the key-value store under [`PROFILE_KEY`] as a JSON
//! string until logout clears it.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::store::KeyValueStore;
use crate::userinfo::GoogleUserInfo;

/// Fixed storage key for the signed-in profile.
pub const PROFILE_KEY: &str = "@user";

/// Display name given to guest sessions.
pub const GUEST_NAME: &str = "Guest";

/// Signed-in identity, either guest-shaped or provider-shaped.
///
/// Guest profiles carry no email fields; provider profiles carry all of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verified_email: Option<bool>,
    #[serde(rename = "profileImage")]
    pub profile_image: String,
}

impl UserProfile {
    /// Builds a guest profile with the given id and placeholder image.
    pub fn guest(id: impl Into<String>, profile_image: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: GUEST_NAME.to_string(),
            email: None,
            verified_email: None,
            profile_image: profile_image.into(),
        }
    }

    /// Returns true when the profile has no provider-backed email fields.
    pub fn is_guest(&self) -> bool {
        self.email.is_none() && self.verified_email.is_none()
    }
}

impl From<GoogleUserInfo> for UserProfile {
    fn from(info: GoogleUserInfo) -> Self {
        Self {
            id: info.id,
            name: info.name,
            email: Some(info.email),
            verified_email: Some(info.verified_email),
            profile_image: info.picture,
        }
    }
}

/// Writes the profile under [`PROFILE_KEY`].
///
/// # Errors
/// Returns an error if serialization or the store write fails.
pub fn save(store: &dyn KeyValueStore, profile: &UserProfile) -> Result<()> {
    let json = serde_json::to_string(profile).context("Failed to serialize profile")?;
    store
        .set_item(PROFILE_KEY, &json)
        .context("Failed to persist profile")
}

/// Reads the persisted profile, if any.
///
/// # Errors
/// Returns an error if the store cannot be read or the stored value is not a profile.
pub fn load(store: &dyn KeyValueStore) -> Result<Option<UserProfile>> {
    let Some(json) = store
        .get_item(PROFILE_KEY)
        .context("Failed to read persisted profile")?
    else {
        return Ok(None);
    };

    serde_json::from_str(&json)
        .map(Some)
        .context("Failed to parse persisted profile")
}

/// Removes the persisted profile. Returns whether one was present.
///
/// # Errors
/// Returns an error if the store cannot be written.
pub fn clear(store: &dyn KeyValueStore) -> Result<bool> {
    store
        .remove_item(PROFILE_KEY)
        .context("Failed to remove persisted profile")
}

use portal_core::profile::UserProfile;

#[derive(Debug, Clone, Default)]
pub struct HomeState {
    /// Resolved profile; `None` renders as "Guest User".
    pub profile: Option<UserProfile>,
    /// The resolver task has not reported back yet.
    pub resolving: bool,
    /// Set once logout ran on this screen.
    pub signed_out: bool,
    /// One-line message under the profile (logout deferred or failed).
    pub notice: Option<String>,
}

impl HomeState {
    pub fn resolving() -> Self {
        Self {
            resolving: true,
            ..Self::default()
        }
    }

    /// Image URL to open, if the profile has one.
    pub fn image_url(&self) -> Option<&str> {
        self.profile
            .as_ref()
            .map(|p| p.profile_image.as_str())
            .filter(|url| !url.is_empty())
    }
}

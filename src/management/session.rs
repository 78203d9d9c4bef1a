use crate::{
    error::StoreError,
    management::ACCESS_TOKEN_COOKIE,
    spotify::client::ApiClient,
    types::User,
    warning,
};

/// Endpoint returning the logged in user's profile.
pub const ME_ENDPOINT: &str = "/spotify/me";

/// Login state of the dashboard user.
pub struct Session {
    api: ApiClient,
}

impl Session {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Returns the current user, or `None` when nobody is logged in.
    ///
    /// A stored token the backend no longer accepts is dropped.
    pub async fn check(&self) -> Option<User> {
        let jar = self.api.policy().jar();
        jar.access_token().await?;

        match self.api.fetch_one::<User>(ME_ENDPOINT, &[]).await {
            Ok(user) => Some(user),
            Err(e) => {
                warning!("Auth check failed: {}", e);
                if let Err(e) = jar.remove(ACCESS_TOKEN_COOKIE).await {
                    warning!("Failed to drop stored token: {}", e);
                }
                None
            }
        }
    }

    /// Drops the stored token and sends the user to the main view.
    ///
    /// # Errors
    ///
    /// Returns the [`StoreError`] of the jar when the cookie cannot be removed.
    /// The navigation happens either way.
    pub async fn logout(&self) -> Result<(), StoreError> {
        self.api.policy().end_session().await
    }
}

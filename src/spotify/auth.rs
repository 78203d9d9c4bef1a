use reqwest::{Client, Url};

use crate::{
    config,
    error::AuthError,
    types::{ErrorResponse, TokenResponse},
};

/// Spotify's consent screen.
pub const SPOTIFY_AUTHORIZE_URL: &str = "https://accounts.spotify.com/authorize";

/// Permissions the dashboard asks for, space delimited.
pub const SPOTIFY_SCOPE: &str = "user-read-private user-read-email user-top-read playlist-read-private playlist-modify-public playlist-modify-private";

/// Backend route that swaps an authorization code for tokens.
pub const EXCHANGE_PATH: &str = "/api/v1/spotify/auth/callback";

/// Builds the Spotify consent-screen URL.
///
/// All values are form-urlencoded. Nothing is opened here, the caller decides
/// how to send the user to the returned URL.
///
/// # Errors
///
/// Returns [`AuthError::MissingClientId`] when no client id is configured, so
/// no redirect is ever attempted without one.
///
/// # Example
///
/// ```
/// let url = get_auth_url(Some("abc"), "http://127.0.0.1:3000/callback")?;
/// assert!(url.starts_with("https://accounts.spotify.com/authorize?client_id=abc"));
/// ```
pub fn get_auth_url(client_id: Option<&str>, redirect_uri: &str) -> Result<String, AuthError> {
    let client_id = client_id
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or(AuthError::MissingClientId)?;

    let url = Url::parse_with_params(
        SPOTIFY_AUTHORIZE_URL,
        &[
            ("client_id", client_id),
            ("response_type", "code"),
            ("redirect_uri", redirect_uri),
            ("scope", SPOTIFY_SCOPE),
        ],
    )
    .map_err(|e| AuthError::InvalidUrl(e.to_string()))?;

    Ok(url.to_string())
}

/// Consent URL used by the login action. It always shows the consent dialog,
/// which lets the user switch accounts.
pub fn login_url(client_id: Option<&str>, redirect_uri: &str) -> Result<String, AuthError> {
    Ok(format!("{}&show_dialog=true", get_auth_url(client_id, redirect_uri)?))
}

/// Consent URL from the environment configuration.
pub fn login_url_from_env() -> Result<String, AuthError> {
    login_url(
        config::spotify_client_id().as_deref(),
        &config::spotify_redirect_uri(),
    )
}

/// Client for the backend's code exchange endpoint.
#[derive(Debug, Clone)]
pub struct TokenExchange {
    client: Client,
    endpoint: String,
}

impl TokenExchange {
    /// Exchange client posting to [`EXCHANGE_PATH`] on `api_base_url`.
    pub fn new(api_base_url: &str) -> Self {
        Self {
            client: Client::new(),
            endpoint: format!("{}{}", api_base_url.trim_end_matches('/'), EXCHANGE_PATH),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Exchanges an authorization code through the backend.
    ///
    /// The `redirect_uri` must be the one used to build the consent URL,
    /// Spotify rejects the exchange otherwise.
    ///
    /// # Errors
    ///
    /// - [`AuthError::ExchangeFailed`] for any non-2xx answer. The message is the
    ///   body's `message`, then its `error`, then a status-coded fallback when
    ///   the body is missing or not JSON.
    /// - [`AuthError::Network`] when the backend is unreachable or a 2xx body is
    ///   not valid JSON.
    pub async fn exchange(&self, code: &str, redirect_uri: &str) -> Result<TokenResponse, AuthError> {
        let res = self
            .client
            .post(&self.endpoint)
            .form(&[("code", code), ("redirect_uri", redirect_uri)])
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(AuthError::ExchangeFailed {
                status,
                message: exchange_error_message(status.as_u16(), &body),
            });
        }

        Ok(res.json::<TokenResponse>().await?)
    }
}

/// Human readable message for a failed exchange.
///
/// # Arguments
///
/// * `status` - HTTP status of the failed answer
/// * `body` - Raw response body, possibly empty or not JSON
///
/// # Example
///
/// ```
/// assert_eq!(exchange_error_message(400, r#"{"error":"invalid_grant"}"#), "invalid_grant");
/// assert_eq!(
///     exchange_error_message(502, "<html>"),
///     "Failed to exchange code for tokens (Status: 502)"
/// );
/// ```
pub fn exchange_error_message(status: u16, body: &str) -> String {
    let parsed: ErrorResponse = serde_json::from_str(body).unwrap_or_default();
    let non_empty = |v: Option<String>| v.filter(|s| !s.is_empty());

    non_empty(parsed.message)
        .or_else(|| non_empty(parsed.error))
        .unwrap_or_else(|| format!("Failed to exchange code for tokens (Status: {status})"))
}

use reqwest::StatusCode;
use thiserror::Error;

/// Message shown when the provider reports that the user denied access.
pub const MSG_ACCESS_DENIED: &str = "Access denied. Please try again.";
/// Message shown when the callback never received an authorization code.
pub const MSG_NO_CODE: &str = "No authorization code received. Please try again.";
/// Message shown when the backend answered without a usable access token.
pub const MSG_NO_TOKEN: &str = "No access token received. Please try again.";
/// Message shown when the token could not be written to the cookie jar.
pub const MSG_SAVE_FAILED: &str = "Failed to save authentication token. Please try again.";
/// Fallback for exchange failures that carry no message of their own.
pub const MSG_EXCHANGE_FALLBACK: &str =
    "Failed to exchange authorization code. Please try again.";

/// Failures of the OAuth login flow.
///
/// Every variant except [`AuthError::MissingClientId`] ends a callback page in
/// its error state; the `Display` output is exactly what the page shows.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("SPOTIFY_CLIENT_ID is not set")]
    MissingClientId,

    #[error("invalid url: {0}")]
    InvalidUrl(String),

    #[error("{}", MSG_ACCESS_DENIED)]
    UserDenied { reason: String },

    #[error("{}", MSG_NO_CODE)]
    MissingCode,

    #[error("{message}")]
    ExchangeFailed { status: StatusCode, message: String },

    #[error("{}", MSG_NO_TOKEN)]
    NoToken,

    #[error("{}", MSG_SAVE_FAILED)]
    PersistenceFailed,

    #[error("{}", network_message(.0))]
    Network(#[from] reqwest::Error),
}

fn network_message(err: &reqwest::Error) -> String {
    let message = err.to_string();
    if message.is_empty() {
        MSG_EXCHANGE_FALLBACK.to_string()
    } else {
        message
    }
}

/// Failures of the cookie jar.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("cookie jar io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("cookie jar is corrupt: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Failures of authenticated dashboard API calls.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("session expired, please log in again")]
    Unauthorized,

    #[error("http status {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid response: {0}")]
    InvalidResponse(#[from] serde_json::Error),
}

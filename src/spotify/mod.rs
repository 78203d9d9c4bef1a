//! # Spotify Integration Module
//!
//! Talks to Spotify's consent screen and to the dashboard backend that holds
//! the client secret.
//!
//! ```text
//! CLI / local server
//!          ↓
//!     ├── auth    consent URL, code exchange
//!     └── client  authenticated dashboard API calls
//!          ↓
//! reqwest → dashboard backend → Spotify Web API
//! ```
//!
//! The backend does the actual token request against Spotify, this crate only
//! forwards the authorization code together with the redirect URI it used.
//! Every authenticated call carries the stored token as a bearer header, and a
//! 401 answer ends the session through the client's
//! [`client::SessionPolicy`].

pub mod auth;
pub mod client;

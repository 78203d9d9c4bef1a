//! # API Module
//!
//! Routes served by the local login server.
//!
//! - [`home`] - main view, shows whether a session token is stored
//! - [`login`] - redirects to the Spotify consent screen
//! - [`callback`] - receives `code`/`error` from Spotify and runs the
//!   [`crate::callback::CallbackPage`]
//! - [`health`] - status and version for monitoring
//!
//! ```rust,ignore
//! use axum::{Router, routing::get};
//! use spotdash::api::{callback, health};
//!
//! let app = Router::new()
//!     .route("/callback", get(callback))
//!     .route("/health", get(health));
//! ```

mod callback;
mod health;
mod home;

pub use callback::callback;
pub use callback::render;
pub use health::health;
pub use home::home;
pub use home::login;

const STYLE: &str = "body{background:#121212;color:#fff;font-family:sans-serif;display:flex;\
min-height:100vh;align-items:center;justify-content:center;text-align:center}\
p{color:#9ca3af}.btn{background:#1db954;color:#fff;padding:.6em 1.4em;border-radius:2em;\
text-decoration:none;display:inline-block;margin-top:1em}\
.icon{width:4rem;height:4rem;border-radius:50%;margin:0 auto 1rem;font-size:1.5rem;\
line-height:4rem}.icon.ok{background:#1db954}.icon.error{background:#ef4444}\
.spinner{width:2rem;height:2rem;border:2px solid #1db954;border-top-color:transparent;\
border-radius:50%;margin:1rem auto;animation:spin 1s linear infinite}\
@keyframes spin{to{transform:rotate(360deg)}}";

/// Wraps a body into the shared page layout.
pub(crate) fn page(title: &str, head: &str, body: &str) -> String {
    format!(
        r#"<!doctype html>
<html>
  <head><meta charset="utf-8" /><title>{title}</title><style>{STYLE}</style>{head}</head>
  <body><main>{body}</main></body>
</html>
"#
    )
}

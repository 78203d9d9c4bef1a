//! Spotify Dashboard Login Companion
//!
//! This library implements the client half of the dashboard's Spotify OAuth
//! login: it builds the consent URL, receives the authorization code on a
//! local callback route, exchanges it through the dashboard backend, keeps the
//! access token in a cookie jar and attaches it to later API calls.
//!
//! # Modules
//!
//! - `api` - HTTP routes of the local login server
//! - `callback` - the callback page state machine
//! - `cli` - Command-line interface implementations
//! - `config` - Configuration management and environment variables
//! - `error` - Error types of the login flow and the API client
//! - `management` - Cookie jar and session handling
//! - `navigation` - Full-page navigation requests
//! - `server` - Local HTTP server for OAuth callbacks
//! - `spotify` - Consent URL, code exchange and dashboard API client
//! - `types` - Data structures and type definitions
//! - `utils` - Utility functions and helpers
//!
//! # Example
//!
//! ```
//! use spotdash::{config, cli};
//!
//! #[tokio::main]
//! async fn main() -> spotdash::Res<()> {
//!     config::load_env().await?;
//!     cli::me().await;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod callback;
pub mod cli;
pub mod config;
pub mod error;
pub mod management;
pub mod navigation;
pub mod server;
pub mod spotify;
pub mod types;
pub mod utils;

/// Result alias used by the CLI and the server entry points.
///
/// Errors are boxed so the different error types of the crate (`AuthError`,
/// `StoreError`, io and http errors) can travel through `?` unchanged.
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints a status line prefixed with a blue `o`.
///
/// ```
/// info!("Listening on {}", addr);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a line prefixed with a green checkmark once something completed.
///
/// ```
/// success!("Authentication successful!");
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a line prefixed with a red `!` and exits with status 1.
///
/// Only for failures the command cannot continue from, the code after the
/// macro never runs.
///
/// ```
/// error!("Cannot start login: {}", err);
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a line prefixed with a yellow `!` for recoverable problems.
///
/// ```
/// warning!("Auth check failed: {}", err);
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}

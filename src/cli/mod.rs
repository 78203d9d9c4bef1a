//! # CLI Module
//!
//! User-facing commands of spotdash.
//!
//! - [`login`] - browser login through the local callback server
//! - [`logout`] - drops the stored access token
//! - [`me`] - shows the logged in Spotify profile
//! - [`auth_url`] - prints the consent-screen URL without opening it
//!
//! ```bash
//! spotdash login
//! spotdash me
//! spotdash logout
//! ```

mod login;
mod session;

use tabled::Table;

use crate::{types::User, utils};

pub use login::login;
pub use login::{LoginOutcome, wait_for_login};
pub use session::auth_url;
pub use session::logout;
pub use session::me;

fn print_user(user: &User) {
    let table = Table::new(utils::user_table_rows(user));
    println!("{}", table);
}

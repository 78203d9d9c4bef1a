mod cookies;
mod session;

pub use cookies::ACCESS_TOKEN_COOKIE;
pub use cookies::CookieJar;
pub use session::ME_ENDPOINT;
pub use session::Session;

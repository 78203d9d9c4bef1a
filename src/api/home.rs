use axum::{
    Extension,
    response::{Html, IntoResponse, Redirect, Response},
};

use crate::{api::page, server::AppState, spotify::auth, warning};

/// Main view: shows whether a token is stored and offers the login.
pub async fn home(Extension(state): Extension<AppState>) -> Html<String> {
    let body = match state.jar.access_token().await {
        Some(_) => r#"<h1>Connected to Spotify</h1>
<p>Your dashboard session is active. You can close this window.</p>"#
            .to_string(),
        None => r#"<h1>Spotify Dashboard</h1>
<p>Connect your Spotify account to see your listening stats.</p>
<a class="btn" href="/login">Log in with Spotify</a>"#
            .to_string(),
    };

    Html(page("Spotify Dashboard", "", &body))
}

/// Sends the browser to the Spotify consent screen.
///
/// Without a client id there is nothing to redirect to, the page says so.
pub async fn login(Extension(state): Extension<AppState>) -> Response {
    match auth::login_url(state.client_id.as_deref(), &state.settings.redirect_uri) {
        Ok(url) => Redirect::to(&url).into_response(),
        Err(e) => {
            warning!("Cannot start login: {}", e);
            Html(page(
                "Configuration error",
                "",
                "<h1>Login unavailable</h1><p>SPOTIFY_CLIENT_ID is not set.</p>",
            ))
            .into_response()
        }
    }
}

use crate::{
    cli::print_user,
    config, error, info,
    management::{CookieJar, Session},
    navigation::Navigator,
    spotify::{
        auth,
        client::{ApiClient, SessionPolicy},
    },
    success,
};

fn session() -> Session {
    let (navigator, _) = Navigator::channel();
    let policy = SessionPolicy::new(CookieJar::open_default(), navigator);
    Session::new(ApiClient::new(&config::api_base_url(), policy))
}

pub async fn logout() {
    match session().logout().await {
        Ok(()) => success!("Logged out."),
        Err(e) => error!("Failed to remove stored token: {}", e),
    }
}

pub async fn me() {
    match session().check().await {
        Some(user) => print_user(&user),
        None => info!("Not logged in. Run `spotdash login`."),
    }
}

pub fn auth_url() {
    match auth::get_auth_url(
        config::spotify_client_id().as_deref(),
        &config::spotify_redirect_uri(),
    ) {
        Ok(url) => println!("{}", url),
        Err(e) => error!("Cannot build authorization URL: {}", e),
    }
}

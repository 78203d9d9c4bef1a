use std::{net::SocketAddr, str::FromStr, sync::Arc, time::Duration};

use axum::{Extension, Router, routing::get};
use tokio::{
    net::TcpListener,
    sync::{Mutex, watch},
};

use crate::{
    Res, api,
    callback::{CallbackPage, CallbackStatus},
    config::{self, CallbackSettings},
    management::CookieJar,
    navigation::Navigator,
};

/// How long the callback route waits for the page to settle before it
/// answers with the loading view.
pub const DEFAULT_SETTLE_TIMEOUT: Duration = Duration::from_secs(30);

/// Terminal state of the most recent callback page, `None` until one settled.
pub type CallbackOutcomes = watch::Receiver<Option<CallbackStatus>>;

/// Shared state of the local server.
#[derive(Clone)]
pub struct AppState {
    pub settings: CallbackSettings,
    pub client_id: Option<String>,
    pub jar: CookieJar,
    pub navigator: Navigator,
    pub settle_timeout: Duration,
    /// The callback page currently on screen, replaced (and torn down) by the
    /// next callback load.
    pub page: Arc<Mutex<Option<CallbackPage>>>,
    /// Publishes every callback page's terminal state to the host.
    pub outcome: Arc<watch::Sender<Option<CallbackStatus>>>,
}

impl AppState {
    pub fn new(
        settings: CallbackSettings,
        client_id: Option<String>,
        jar: CookieJar,
        navigator: Navigator,
    ) -> Self {
        Self {
            settings,
            client_id,
            jar,
            navigator,
            settle_timeout: DEFAULT_SETTLE_TIMEOUT,
            page: Arc::new(Mutex::new(None)),
            outcome: Arc::new(watch::channel(None).0),
        }
    }

    /// Subscribes to the terminal states of callback pages served from now on.
    ///
    /// The CLI uses this to stop waiting as soon as a login failed instead of
    /// running into its timeout.
    pub fn outcomes(&self) -> CallbackOutcomes {
        self.outcome.subscribe()
    }

    pub fn from_env(jar: CookieJar, navigator: Navigator) -> Self {
        Self::new(
            CallbackSettings::from_env(),
            config::spotify_client_id(),
            jar,
            navigator,
        )
    }
}

/// Routes of the local server: `/`, `/login`, `/callback` and `/health`.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(api::home))
        .route("/login", get(api::login))
        .route("/callback", get(api::callback))
        .route("/health", get(api::health))
        .layer(Extension(state))
}

/// Serves [`router`] on an already bound listener until the task is dropped.
pub async fn serve(listener: TcpListener, state: AppState) -> Res<()> {
    axum::serve(listener, router(state)).await?;
    Ok(())
}

/// Binds the listener on `SERVER_ADDRESS`.
pub async fn bind() -> Res<TcpListener> {
    let addr = SocketAddr::from_str(&config::server_addr())
        .map_err(|e| format!("Failed to parse server address: {}", e))?;

    Ok(TcpListener::bind(&addr).await?)
}

/// Binds `SERVER_ADDRESS` and serves until the task is dropped.
pub async fn start_api_server(state: AppState) -> Res<()> {
    let listener = bind().await?;
    serve(listener, state).await
}

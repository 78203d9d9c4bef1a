use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use crate::{
    callback::CallbackStatus,
    cli::print_user,
    config, error,
    management::{CookieJar, Session},
    navigation::{Navigations, Navigator, ROOT},
    server::{self, AppState, CallbackOutcomes},
    spotify::{
        auth,
        client::{ApiClient, SessionPolicy},
    },
    success, warning,
};

/// Runs the browser login.
///
/// 1. Builds the consent URL (fails without `SPOTIFY_CLIENT_ID`)
/// 2. Starts the local server that receives the callback
/// 3. Opens the consent screen in the default browser
/// 4. Waits until the callback page navigates to the main view, or stops
///    right away with the page's message when the login failed
/// 5. Confirms the new session by loading the user profile
pub async fn login() {
    let login_url = match auth::login_url_from_env() {
        Ok(url) => url,
        Err(e) => error!("Cannot start login: {}", e),
    };

    let listener = match server::bind().await {
        Ok(l) => l,
        Err(e) => error!("Failed to start callback server: {}", e),
    };

    let jar = CookieJar::open_default();
    let (navigator, navigations) = Navigator::channel();
    let state = AppState::from_env(jar.clone(), navigator.clone());
    let outcomes = state.outcomes();
    let server_task = tokio::spawn(async move { server::serve(listener, state).await });

    if webbrowser::open(&login_url).is_err() {
        warning!(
            "Failed to open browser. Please navigate to the following URL manually:\n{}",
            login_url
        )
    }

    let pb = ProgressBar::new_spinner();
    pb.set_message("Waiting for Spotify login in your browser...");
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} {msg}")
            .unwrap()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );

    let outcome = wait_for_login(navigations, outcomes, config::login_timeout()).await;
    pb.finish_and_clear();
    server_task.abort();

    match outcome {
        LoginOutcome::Connected => {}
        LoginOutcome::Failed(message) => error!("Authentication failed: {}", message),
        LoginOutcome::TimedOut => error!("Authentication timed out."),
    }
    success!("Authentication successful!");

    let session = Session::new(ApiClient::new(
        &config::api_base_url(),
        SessionPolicy::new(jar, navigator),
    ));
    match session.check().await {
        Some(user) => print_user(&user),
        None => warning!("Token stored, but the dashboard backend did not return a profile."),
    }
}

/// How a browser login ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    /// The callback page handed over to the main view.
    Connected,
    /// The callback page settled in its error state with this message.
    Failed(String),
    TimedOut,
}

/// Waits for the end of a browser login.
///
/// # Arguments
///
/// * `navigations` - Navigations requested by the callback page
/// * `outcomes` - Terminal states of callback pages, see [`AppState::outcomes`]
/// * `timeout` - Upper bound for the whole wait
///
/// # Returns
///
/// [`LoginOutcome::Connected`] once the main view is navigated to,
/// [`LoginOutcome::Failed`] as soon as a callback page reports an error and
/// [`LoginOutcome::TimedOut`] when neither happens in time. A successful page
/// alone is not enough: the login ends with its redirect to the main view.
pub async fn wait_for_login(
    mut navigations: Navigations,
    mut outcomes: CallbackOutcomes,
    timeout: Duration,
) -> LoginOutcome {
    let wait = async {
        let mut watching = true;
        loop {
            tokio::select! {
                location = navigations.recv() => match location {
                    Some(location) if location == ROOT => return LoginOutcome::Connected,
                    Some(_) => {}
                    // nothing can navigate anymore
                    None => return LoginOutcome::TimedOut,
                },
                changed = outcomes.changed(), if watching => {
                    if changed.is_err() {
                        watching = false;
                        continue;
                    }
                    let latest = outcomes.borrow_and_update().clone();
                    if let Some(CallbackStatus::Error(message)) = latest {
                        return LoginOutcome::Failed(message);
                    }
                }
            }
        }
    };

    tokio::time::timeout(timeout, wait)
        .await
        .unwrap_or(LoginOutcome::TimedOut)
}

use std::sync::Arc;

use axum::{
    Extension,
    extract::{OriginalUri, Query},
    response::Html,
};

use crate::{
    api::page,
    callback::{CallbackPage, CallbackStatus},
    navigation::ROOT,
    server::AppState,
    types::CallbackParams,
    utils::escape_html,
};

const SPINNER: &str = r#"<div class="spinner"></div>"#;

/// Handles the redirect back from the Spotify consent screen.
///
/// Mounts a fresh [`CallbackPage`], runs it against the query string and
/// answers with the state it settles in. The page is kept alive afterwards so
/// its redirect timer can still fire; the next callback load replaces it.
pub async fn callback(
    OriginalUri(uri): OriginalUri,
    Query(params): Query<CallbackParams>,
    Extension(state): Extension<AppState>,
) -> Html<String> {
    let callback_page = CallbackPage::mount(
        uri.to_string(),
        state.settings.clone(),
        state.jar.clone(),
        state.navigator.clone(),
    );
    callback_page.run(&params);
    report_outcome(&callback_page, &state);

    let status = match tokio::time::timeout(state.settle_timeout, callback_page.settled()).await {
        Ok(status) => status,
        Err(_) => callback_page.status(),
    };

    let html = render(&status, &callback_page.visible_url(), state.settings.redirect_delay.as_secs_f64());
    *state.page.lock().await = Some(callback_page);
    Html(html)
}

/// Forwards the page's terminal state to [`AppState::outcome`] once reached.
///
/// A page torn down before settling never reports.
fn report_outcome(callback_page: &CallbackPage, state: &AppState) {
    let mut status = callback_page.subscribe();
    let outcome = Arc::clone(&state.outcome);

    tokio::spawn(async move {
        if status.wait_for(|s| !s.is_loading()).await.is_err() {
            return;
        }
        let settled = status.borrow().clone();
        outcome.send_replace(Some(settled));
    });
}

/// HTML for a callback state.
///
/// # Arguments
///
/// * `status` - State the page settled in
/// * `visible_url` - URL the address bar is rewritten to
/// * `redirect_secs` - Delay of the meta refresh on success
///
/// # Returns
///
/// A complete HTML document. Every state rewrites the address bar so the
/// authorization code does not stay visible or in the history.
pub fn render(status: &CallbackStatus, visible_url: &str, redirect_secs: f64) -> String {
    let head = format!(
        "<script>history.replaceState(null, \"\", {});</script>",
        script_string(visible_url)
    );

    match status {
        CallbackStatus::Loading => page("Connecting…", &head, SPINNER),
        CallbackStatus::Error(message) => page(
            "Authentication Failed",
            &head,
            &format!(
                r#"<div class="icon error">✕</div>
<h1>Authentication Failed</h1>
<p>{message}</p>
<a class="btn" href="{ROOT}">Try Again</a>"#,
                message = escape_html(message),
            ),
        ),
        CallbackStatus::Success => page(
            "Connected",
            &format!(r#"{head}<meta http-equiv="refresh" content="{redirect_secs};url={ROOT}">"#),
            &format!(
                r#"<div class="icon ok">✓</div>
<h1>Successfully Connected!</h1>
<p>Redirecting to your dashboard...</p>
{SPINNER}
<a class="btn" href="{ROOT}">Go to Dashboard</a>"#
            ),
        ),
    }
}

/// Quotes `text` as a JavaScript string literal that is safe inside `<script>`.
fn script_string(text: &str) -> String {
    serde_json::to_string(text)
        .unwrap_or_else(|_| "\"/\"".to_string())
        .replace("</", "<\\/")
}

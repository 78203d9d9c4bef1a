//! # Callback Page
//!
//! The page the browser lands on after the Spotify consent screen. It turns the
//! `code` or `error` query signal into a stored access token, or into a message
//! telling the user what went wrong.
//!
//! ## States
//!
//! ```text
//! Loading ──┬──> Success ──(redirect delay)──> navigate("/")
//!           └──> Error(message)
//! ```
//!
//! Both `Success` and `Error` are terminal and the first one reached wins.
//!
//! ## Re-entrant runs
//!
//! [`CallbackPage::run`] may be triggered several times for one page, for
//! example when the query string shows up late. A processed flag that is
//! claimed before the first await makes sure at most one exchange is ever sent
//! and at most one terminal state is entered.
//!
//! ## Teardown
//!
//! Dropping the page cancels its grace and redirect timers. An exchange still
//! in flight completes, but its result is discarded.

mod timer;

use std::sync::{
    Arc, Mutex, MutexGuard, PoisonError,
    atomic::{AtomicBool, Ordering},
};

use chrono::Utc;
use tokio::sync::watch;

use crate::{
    config::CallbackSettings,
    error::AuthError,
    management::{ACCESS_TOKEN_COOKIE, CookieJar},
    navigation::{Navigator, ROOT},
    spotify::auth::TokenExchange,
    types::{CallbackParams, Cookie, Credential, SameSite, TokenResponse},
    utils, warning,
};

pub use timer::ScheduledTask;

/// Path of the callback route. The visible URL is reset to it on every run.
pub const CALLBACK_PATH: &str = "/callback";

/// What the callback page currently shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackStatus {
    /// Initial state, shown while the query is read and the code exchanged.
    Loading,
    /// The token is stored and the redirect to the main view is scheduled.
    Success,
    /// Terminal failure with the message shown to the user.
    Error(String),
}

impl CallbackStatus {
    /// True while the page has not reached a terminal state.
    pub fn is_loading(&self) -> bool {
        matches!(self, CallbackStatus::Loading)
    }
}

struct Shared {
    settings: CallbackSettings,
    exchange: TokenExchange,
    jar: CookieJar,
    navigator: Navigator,
    status: watch::Sender<CallbackStatus>,
    processed: AtomicBool,
    torn_down: AtomicBool,
    visible_url: Mutex<String>,
    grace_timer: Mutex<Option<ScheduledTask>>,
    redirect_timer: Mutex<Option<ScheduledTask>>,
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

/// One load of the callback route.
pub struct CallbackPage {
    shared: Arc<Shared>,
}

impl CallbackPage {
    /// Mounts the page for the URL the browser landed on.
    ///
    /// The page starts in [`CallbackStatus::Loading`] and does nothing until
    /// [`CallbackPage::run`] is called.
    ///
    /// # Arguments
    ///
    /// * `location` - The full URL including the query, shown until the first run
    /// * `settings` - Backend URL, redirect URI and timer delays
    /// * `jar` - Where the access token cookie is written
    /// * `navigator` - Receives the navigation to the main view after success
    ///
    /// # Example
    ///
    /// ```
    /// let (navigator, _navigations) = Navigator::channel();
    /// let page = CallbackPage::mount(
    ///     "/callback?code=abc",
    ///     CallbackSettings::from_env(),
    ///     CookieJar::open_default(),
    ///     navigator,
    /// );
    /// page.run(&CallbackParams { code: Some("abc".into()), error: None });
    /// let status = page.settled().await;
    /// ```
    pub fn mount(
        location: impl Into<String>,
        settings: CallbackSettings,
        jar: CookieJar,
        navigator: Navigator,
    ) -> Self {
        let (status, _) = watch::channel(CallbackStatus::Loading);
        let exchange = TokenExchange::new(&settings.api_base_url);

        Self {
            shared: Arc::new(Shared {
                settings,
                exchange,
                jar,
                navigator,
                status,
                processed: AtomicBool::new(false),
                torn_down: AtomicBool::new(false),
                visible_url: Mutex::new(location.into()),
                grace_timer: Mutex::new(None),
                redirect_timer: Mutex::new(None),
            }),
        }
    }

    /// Snapshot of the current state.
    pub fn status(&self) -> CallbackStatus {
        self.shared.status.borrow().clone()
    }

    /// Receiver that observes every state change of this page.
    pub fn subscribe(&self) -> watch::Receiver<CallbackStatus> {
        self.shared.status.subscribe()
    }

    /// Waits until the page left `Loading`.
    pub async fn settled(&self) -> CallbackStatus {
        let mut rx = self.subscribe();
        match rx.wait_for(|s| !s.is_loading()).await {
            Ok(status) => status.clone(),
            Err(_) => self.status(),
        }
    }

    /// URL the address bar should show. Query parameters are stripped once
    /// the page ran.
    pub fn visible_url(&self) -> String {
        lock(&self.shared.visible_url).clone()
    }

    /// Reacts to the query signals of the current URL.
    ///
    /// Priority: an `error` fails right away, a missing `code` arms the grace
    /// timer, a `code` starts the exchange exactly once.
    pub fn run(&self, params: &CallbackParams) {
        let shared = &self.shared;
        if shared.torn_down.load(Ordering::SeqCst) || shared.processed.load(Ordering::SeqCst) {
            return;
        }

        *lock(&shared.visible_url) = CALLBACK_PATH.to_string();

        // a later run supersedes the previous wait for the code
        if let Some(timer) = lock(&shared.grace_timer).take() {
            timer.cancel();
        }

        if let Some(reason) = params.error.as_deref() {
            if shared.claim() {
                shared.fail(AuthError::UserDenied {
                    reason: reason.to_string(),
                });
            }
            return;
        }

        let Some(code) = params.code.clone().filter(|c| !c.is_empty()) else {
            let waiting = Arc::clone(shared);
            let timer = ScheduledTask::after(shared.settings.grace, move || {
                if waiting.claim() {
                    waiting.fail(AuthError::MissingCode);
                }
            });
            *lock(&shared.grace_timer) = Some(timer);
            return;
        };

        if !shared.claim() {
            return;
        }

        let shared = Arc::clone(shared);
        tokio::spawn(async move {
            shared.complete_exchange(code).await;
        });
    }

    /// Cancels pending timers and stops any later state change.
    pub fn teardown(&self) {
        let shared = &self.shared;
        shared.torn_down.store(true, Ordering::SeqCst);

        if let Some(timer) = lock(&shared.grace_timer).take() {
            timer.cancel();
        }
        if let Some(timer) = lock(&shared.redirect_timer).take() {
            timer.cancel();
        }
    }
}

impl Drop for CallbackPage {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl Shared {
    /// Check-and-set of the processed flag, true for the single winner.
    fn claim(&self) -> bool {
        self.processed
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    fn transition(&self, next: CallbackStatus) {
        if self.torn_down.load(Ordering::SeqCst) {
            return;
        }
        self.status.send_if_modified(|current| {
            if current.is_loading() {
                *current = next;
                true
            } else {
                false
            }
        });
    }

    fn fail(&self, err: AuthError) {
        warning!("Login failed: {}", err);
        self.transition(CallbackStatus::Error(err.to_string()));
    }

    async fn complete_exchange(&self, code: String) {
        let result = self
            .exchange
            .exchange(&code, &self.settings.redirect_uri)
            .await;

        if self.torn_down.load(Ordering::SeqCst) {
            return;
        }

        let outcome = match result.and_then(credential_from) {
            Ok(credential) => self.persist(&credential).await,
            Err(e) => Err(e),
        };

        match outcome {
            Ok(()) => {
                self.transition(CallbackStatus::Success);
                self.schedule_redirect();
            }
            Err(e) => self.fail(e),
        }
    }

    /// Writes the token cookie and reads it back.
    async fn persist(&self, credential: &Credential) -> Result<(), AuthError> {
        let days = utils::expiry_days(credential.expires_in_seconds);
        let cookie = Cookie {
            name: ACCESS_TOKEN_COOKIE.to_string(),
            value: credential.access_token.clone(),
            path: "/".to_string(),
            secure: self.settings.secure,
            same_site: SameSite::Lax,
            expires_at: utils::expiry_from_days(Utc::now(), days),
        };

        if let Err(e) = self.jar.set(cookie).await {
            warning!("Failed to write token cookie: {}", e);
            return Err(AuthError::PersistenceFailed);
        }

        match self.jar.get(ACCESS_TOKEN_COOKIE).await {
            Some(stored) if stored == credential.access_token => Ok(()),
            _ => {
                let _ = self.jar.remove(ACCESS_TOKEN_COOKIE).await;
                Err(AuthError::PersistenceFailed)
            }
        }
    }

    fn schedule_redirect(&self) {
        let mut slot = lock(&self.redirect_timer);
        // checked under the lock so teardown either sees the timer or stops us
        if self.torn_down.load(Ordering::SeqCst) {
            return;
        }

        let navigator = self.navigator.clone();
        *slot = Some(ScheduledTask::after(self.settings.redirect_delay, move || {
            navigator.navigate(ROOT);
        }));
    }
}

/// Accepts an exchange answer only when it carries a non-empty token.
pub fn credential_from(res: TokenResponse) -> Result<Credential, AuthError> {
    let access_token = res
        .access_token
        .filter(|t| !t.is_empty())
        .ok_or(AuthError::NoToken)?;

    Ok(Credential {
        access_token,
        expires_in_seconds: res.expires_in,
    })
}

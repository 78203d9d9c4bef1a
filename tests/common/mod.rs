#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use axum::{
    Form, Router,
    http::{StatusCode, header::CONTENT_TYPE},
    routing::post,
};
use spotdash::{config::CallbackSettings, management::CookieJar};
use tempfile::TempDir;
use tokio::net::TcpListener;

pub const REDIRECT_URI: &str = "http://127.0.0.1:3000/callback";

/// Backend double for the code exchange endpoint.
#[derive(Clone)]
pub struct MockBackend {
    pub base_url: String,
    hits: Arc<AtomicUsize>,
    last_form: Arc<Mutex<Option<HashMap<String, String>>>>,
}

impl MockBackend {
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    pub fn last_form(&self) -> Option<HashMap<String, String>> {
        self.last_form.lock().unwrap().clone()
    }
}

/// Serves `body` with `status` on the exchange route after `delay`.
pub async fn spawn_backend_delayed(
    status: StatusCode,
    body: &'static str,
    delay: Duration,
) -> MockBackend {
    let hits = Arc::new(AtomicUsize::new(0));
    let last_form = Arc::new(Mutex::new(None));

    let app = {
        let hits = Arc::clone(&hits);
        let last_form = Arc::clone(&last_form);
        Router::new().route(
            "/api/v1/spotify/auth/callback",
            post(move |Form(form): Form<HashMap<String, String>>| {
                let hits = Arc::clone(&hits);
                let last_form = Arc::clone(&last_form);
                async move {
                    hits.fetch_add(1, Ordering::SeqCst);
                    *last_form.lock().unwrap() = Some(form);
                    tokio::time::sleep(delay).await;
                    (status, [(CONTENT_TYPE, "application/json")], body)
                }
            }),
        )
    };

    let base_url = serve(app).await;
    MockBackend {
        base_url,
        hits,
        last_form,
    }
}

pub async fn spawn_backend(status: StatusCode, body: &'static str) -> MockBackend {
    spawn_backend_delayed(status, body, Duration::ZERO).await
}

/// Serves `app` on an ephemeral port and returns its base URL.
pub async fn serve(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

pub fn settings(api_base_url: &str) -> CallbackSettings {
    CallbackSettings {
        api_base_url: api_base_url.to_string(),
        redirect_uri: REDIRECT_URI.to_string(),
        secure: false,
        grace: Duration::from_millis(100),
        redirect_delay: Duration::from_millis(200),
    }
}

/// Cookie jar in a fresh temporary directory. Keep the `TempDir` alive.
pub fn temp_jar() -> (TempDir, CookieJar) {
    let dir = tempfile::tempdir().unwrap();
    let jar = CookieJar::new(dir.path().join("cookies.json"));
    (dir, jar)
}

use std::{collections::BTreeMap, path::PathBuf, sync::Arc};

use chrono::Utc;
use tokio::sync::Mutex;

use crate::{config, error::StoreError, types::Cookie};

/// Name of the cookie holding the dashboard access token.
pub const ACCESS_TOKEN_COOKIE: &str = "spotify_access_token";

type Cookies = BTreeMap<String, Cookie>;

/// File-backed cookie storage shared by the callback page and the API client.
///
/// The whole jar is rewritten on every change through a temporary file and a
/// rename, so readers see either the old or the new value.
#[derive(Clone)]
pub struct CookieJar {
    path: Arc<PathBuf>,
    lock: Arc<Mutex<()>>,
}

impl CookieJar {
    /// Jar stored at `path`. Nothing is touched on disk until the first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Arc::new(path.into()),
            lock: Arc::new(Mutex::new(())),
        }
    }

    /// Jar at `{data_local_dir}/spotdash/cookies.json`.
    pub fn open_default() -> Self {
        Self::new(config::data_dir().join("cookies.json"))
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Returns the value of a cookie that exists and has not expired.
    pub async fn get(&self, name: &str) -> Option<String> {
        let _guard = self.lock.lock().await;
        let cookies = self.read().await.ok()?;
        cookies
            .get(name)
            .filter(|c| c.expires_at > Utc::now())
            .map(|c| c.value.clone())
    }

    /// Full cookie record, expired or not.
    pub async fn cookie(&self, name: &str) -> Option<Cookie> {
        let _guard = self.lock.lock().await;
        self.read().await.ok()?.remove(name)
    }

    /// Stores `cookie`, replacing any cookie with the same name.
    ///
    /// As in a `Set-Cookie` string, the value ends at the first `;`, so what is
    /// read back may be shorter than what was written. Callers that must keep
    /// the exact value read it back and compare.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] when the jar file or its directory cannot be
    /// written and [`StoreError::Serde`] when the jar cannot be encoded. An
    /// unreadable or corrupt existing jar is replaced.
    pub async fn set(&self, mut cookie: Cookie) -> Result<(), StoreError> {
        if let Some(end) = cookie.value.find(';') {
            cookie.value.truncate(end);
        }

        let _guard = self.lock.lock().await;
        let mut cookies = self.read().await.unwrap_or_default();
        cookies.insert(cookie.name.clone(), cookie);
        self.write(&cookies).await
    }

    /// Deletes a cookie. A missing jar or cookie is not an error.
    pub async fn remove(&self, name: &str) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;
        let mut cookies = match self.read().await {
            Ok(cookies) => cookies,
            Err(StoreError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(e),
        };

        if cookies.remove(name).is_some() {
            self.write(&cookies).await?;
        }
        Ok(())
    }

    /// Shorthand for the [`ACCESS_TOKEN_COOKIE`] value.
    pub async fn access_token(&self) -> Option<String> {
        self.get(ACCESS_TOKEN_COOKIE).await
    }

    async fn read(&self) -> Result<Cookies, StoreError> {
        let content = async_fs::read_to_string(self.path.as_path()).await?;
        Ok(serde_json::from_str(&content)?)
    }

    async fn write(&self, cookies: &Cookies) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            async_fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(cookies)?;
        let tmp = self.path.with_extension("json.tmp");
        async_fs::write(&tmp, json).await?;
        async_fs::rename(&tmp, self.path.as_path()).await?;
        Ok(())
    }
}

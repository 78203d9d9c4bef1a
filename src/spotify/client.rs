use reqwest::{Client, RequestBuilder, StatusCode, header::CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{
    error::{ApiError, StoreError},
    management::{ACCESS_TOKEN_COOKIE, CookieJar},
    navigation::{Navigator, ROOT},
    warning,
};

/// Version prefix of every dashboard API route.
pub const API_VERSION: &str = "/api/v1";

/// What happens when the backend reports an expired session.
///
/// Every [`ApiClient`] built with the same policy reacts the same way: the
/// stored token is dropped and the user is sent back to the main view.
#[derive(Clone)]
pub struct SessionPolicy {
    jar: CookieJar,
    navigator: Navigator,
}

impl SessionPolicy {
    pub fn new(jar: CookieJar, navigator: Navigator) -> Self {
        Self { jar, navigator }
    }

    /// Cookie jar holding the access token.
    pub fn jar(&self) -> &CookieJar {
        &self.jar
    }

    /// Drops the stored token and navigates to the main view.
    pub async fn end_session(&self) -> Result<(), StoreError> {
        let removed = self.jar.remove(ACCESS_TOKEN_COOKIE).await;
        self.navigator.navigate(ROOT);
        removed
    }

    /// Reaction to a 401 answer. Storage failures are only logged.
    pub async fn on_unauthorized(&self) {
        if let Err(e) = self.end_session().await {
            warning!("Failed to drop expired token: {}", e);
        }
    }
}

/// HTTP client for the dashboard backend.
///
/// Attaches `Authorization: Bearer <token>` whenever the cookie jar holds an
/// access token and hands 401 answers to its [`SessionPolicy`].
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    policy: SessionPolicy,
}

impl ApiClient {
    /// Client for the backend at `api_base_url`.
    ///
    /// # Arguments
    ///
    /// * `api_base_url` - Backend origin without the version prefix, for
    ///   example `http://localhost:8080`
    /// * `policy` - Decides what happens on a 401
    ///
    /// # Example
    ///
    /// ```
    /// let (navigator, _navigations) = Navigator::channel();
    /// let api = ApiClient::new(
    ///     "http://localhost:8080",
    ///     SessionPolicy::new(CookieJar::open_default(), navigator),
    /// );
    /// assert_eq!(api.base_url(), "http://localhost:8080/api/v1");
    /// ```
    pub fn new(api_base_url: &str, policy: SessionPolicy) -> Self {
        Self {
            client: Client::new(),
            base_url: format!("{}{}", api_base_url.trim_end_matches('/'), API_VERSION),
            policy,
        }
    }

    pub fn policy(&self) -> &SessionPolicy {
        &self.policy
    }

    /// Base URL including [`API_VERSION`].
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET `endpoint` and decode the whole body.
    pub async fn fetch_one<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        let body = self.get(endpoint, params).await?;
        Ok(serde_json::from_value(body)?)
    }

    /// GET `endpoint` and decode a list.
    ///
    /// Paged answers wrap the list in `items`, others return it directly.
    pub async fn fetch_items<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> Result<Vec<T>, ApiError> {
        let mut body = self.get(endpoint, params).await?;
        let items = match body.get_mut("items") {
            Some(items) => items.take(),
            None => body,
        };

        if items.is_null() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_value(items)?)
    }

    /// Sends a GET to `endpoint` below [`ApiClient::base_url`].
    ///
    /// # Arguments
    ///
    /// * `endpoint` - Path below the versioned base, with or without a leading `/`
    /// * `params` - Query parameters, URL encoded by reqwest
    ///
    /// # Returns
    ///
    /// The decoded JSON body, or `Value::Null` for an empty one.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Unauthorized`] after the policy ended the session on a 401
    /// - [`ApiError::Status`] with the raw body for any other non-2xx answer
    /// - [`ApiError::Http`] when the request fails
    /// - [`ApiError::InvalidResponse`] when a 2xx body is not JSON
    pub async fn get(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<Value, ApiError> {
        let req = self
            .client
            .get(self.url(endpoint))
            .header(CONTENT_TYPE, "application/json")
            .query(params);
        self.send(req).await
    }

    fn url(&self, endpoint: &str) -> String {
        if endpoint.starts_with('/') {
            format!("{}{}", self.base_url, endpoint)
        } else {
            format!("{}/{}", self.base_url, endpoint)
        }
    }

    async fn send(&self, mut req: RequestBuilder) -> Result<Value, ApiError> {
        if let Some(token) = self.policy.jar().access_token().await {
            req = req.bearer_auth(token);
        }

        let res = req.send().await?;
        let status = res.status();

        if status == StatusCode::UNAUTHORIZED {
            self.policy.on_unauthorized().await;
            return Err(ApiError::Unauthorized);
        }

        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(ApiError::Status { status, body });
        }

        let text = res.text().await?;
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text)?)
    }
}

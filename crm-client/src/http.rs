//! HTTP transport for the CRM API
//!
//! The transport classifies responses but takes no action on them: a lost
//! session comes back as [`ClientError::AuthRequired`] and the caller decides
//! whether to redirect (see [`crate::session`]).

use async_trait::async_trait;
use reqwest::{Client, Method, StatusCode, redirect};
use serde::Serialize;
use serde::de::DeserializeOwned;
use shared::RemoteErrorBody;

use crate::{ClientConfig, ClientError, ClientResult};

/// HTTP client trait
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T>;
    async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T>;
    async fn put<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T>;
    async fn delete<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T>;

    /// Server base URL, without a trailing slash
    fn base_url(&self) -> &str;
}

/// Network HTTP client backed by reqwest
///
/// Redirects are never followed: the backend answers unauthenticated calls
/// with a redirect to its login page, which is reported as `AuthRequired`.
#[derive(Debug, Clone)]
pub struct NetworkHttpClient {
    client: Client,
    base_url: String,
    session_cookie: Option<String>,
}

impl NetworkHttpClient {
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .redirect(redirect::Policy::none())
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            session_cookie: config.session_cookie.clone(),
        })
    }

    /// Replace the session cookie
    pub fn with_session_cookie(mut self, cookie: impl Into<String>) -> Self {
        self.session_cookie = Some(cookie.into());
        self
    }

    pub fn session_cookie(&self) -> Option<&str> {
        self.session_cookie.as_deref()
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> ClientResult<T> {
        tracing::debug!(%method, path, "API request");

        let mut req = self.client.request(method.clone(), self.url(path));
        if let Some(cookie) = &self.session_cookie {
            req = req.header(reqwest::header::COOKIE, cookie);
        }
        if let Some(body) = &body {
            req = req.json(body);
        }

        let response = req.send().await.map_err(|e| {
            tracing::warn!(%method, path, "API request failed: {e}");
            ClientError::from(e)
        })?;
        Self::handle_response(&method, path, response).await
    }

    async fn handle_response<T: DeserializeOwned>(
        method: &Method,
        path: &str,
        response: reqwest::Response,
    ) -> ClientResult<T> {
        let status = response.status();
        tracing::debug!(%method, path, status = status.as_u16(), "API response");

        if status == StatusCode::UNAUTHORIZED || status.is_redirection() {
            tracing::warn!(%method, path, status = status.as_u16(), "Session rejected");
            return Err(ClientError::AuthRequired {
                status: status.as_u16(),
            });
        }

        let text = response.text().await?;
        if !status.is_success() {
            let message = RemoteErrorBody::extract(&text);
            tracing::warn!(%method, path, status = status.as_u16(), "API error: {message}");
            return Err(ClientError::Remote {
                status: status.as_u16(),
                message,
            });
        }

        // DELETE and friends may answer with an empty body
        let body = if text.trim().is_empty() { "null" } else { text.as_str() };
        serde_json::from_str(body)
            .map_err(|e| ClientError::InvalidResponse(format!("{method} {path}: {e}")))
    }
}

#[async_trait]
impl HttpClient for NetworkHttpClient {
    async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        self.send(Method::GET, path, None).await
    }

    async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let body = serde_json::to_value(body)?;
        self.send(Method::POST, path, Some(body)).await
    }

    async fn put<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let body = serde_json::to_value(body)?;
        self.send(Method::PUT, path, Some(body)).await
    }

    async fn delete<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        self.send(Method::DELETE, path, None).await
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }
}

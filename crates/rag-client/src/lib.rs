//! # rag-client
//!
//! HTTP client for the Ragdesk backend.
//!
//! [`ApiClient`] is a thin, uniform wrapper: every call targets
//! `{base_url}{path}`, carries `Authorization: Bearer <token>` when a token is
//! supplied, serializes JSON bodies for POST/PUT, collapses every non-success
//! status into [`ApiError::Status`], and unwraps the backend's
//! `{ message, data }` envelope where a reply is used. Deletes and feedback
//! only check the status. Endpoint methods live in per-resource
//! modules; [`RagApi`] is the subset the page controllers depend on.

mod api;
mod chats;
mod documents;
mod error;
mod http;
mod projects;

pub use api::RagApi;
pub use error::ApiError;

use rag_config::ApiConfig;
use reqwest::{Method, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// HTTP client for the backend REST API and presigned storage uploads.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    upload_timeout: std::time::Duration,
}

impl ApiClient {
    /// Build a client from API configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Http`] if the underlying `reqwest::Client` fails to
    /// build (e.g. no TLS backend available).
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("ragdesk/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout())
            .build()?;
        Ok(Self {
            http,
            base_url: config.normalized_base_url().to_string(),
            upload_timeout: config.upload_timeout(),
        })
    }

    /// Client against `base_url` with default timeouts.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::new`].
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, ApiError> {
        Self::new(&ApiConfig {
            base_url: base_url.into(),
            ..ApiConfig::default()
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn request(&self, method: Method, path: &str, token: Option<&str>) -> RequestBuilder {
        tracing::debug!(%method, path, authenticated = token.is_some(), "api request");
        let builder = self.http.request(method, self.url(path));
        match token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn execute(&self, builder: RequestBuilder) -> Result<Vec<u8>, ApiError> {
        let resp = http::check_response(builder.send().await?)?;
        Ok(resp.bytes().await?.to_vec())
    }

    async fn execute_discarding(&self, builder: RequestBuilder) -> Result<(), ApiError> {
        http::check_response(builder.send().await?)?;
        Ok(())
    }

    /// `GET {path}` and unwrap the envelope.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure, non-success status, or an
    /// undecodable body.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        token: Option<&str>,
    ) -> Result<T, ApiError> {
        let body = self.execute(self.request(Method::GET, path, token)).await?;
        http::decode_envelope(&body)
    }

    /// `POST {path}` with a JSON body and unwrap the envelope.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::get`].
    pub async fn post<B, T>(&self, path: &str, body: &B, token: Option<&str>) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = self
            .execute(self.request(Method::POST, path, token).json(body))
            .await?;
        http::decode_envelope(&body)
    }

    /// `PUT {path}` with a JSON body and unwrap the envelope.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::get`].
    pub async fn put<B, T>(&self, path: &str, body: &B, token: Option<&str>) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = self
            .execute(self.request(Method::PUT, path, token).json(body))
            .await?;
        http::decode_envelope(&body)
    }

    /// `POST {path}` with a JSON body; only the status is checked.
    ///
    /// The reply body may be empty or carry no `data`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Http`] on transport failure or
    /// [`ApiError::Status`] on a non-success status.
    pub async fn post_discarding<B>(
        &self,
        path: &str,
        body: &B,
        token: Option<&str>,
    ) -> Result<(), ApiError>
    where
        B: Serialize + ?Sized,
    {
        self.execute_discarding(self.request(Method::POST, path, token).json(body))
            .await
    }

    /// `DELETE {path}`. The reply body is not read.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::post_discarding`].
    pub async fn delete(&self, path: &str, token: Option<&str>) -> Result<(), ApiError> {
        self.execute_discarding(self.request(Method::DELETE, path, token))
            .await
    }

    /// Upload raw bytes to a presigned object-storage URL.
    ///
    /// The URL is absolute and already authorized, so neither the base URL nor
    /// a bearer token is applied, and no envelope is expected back.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Http`] on transport failure or
    /// [`ApiError::Status`] if storage rejects the upload.
    pub async fn upload_to_storage(
        &self,
        upload_url: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), ApiError> {
        tracing::debug!(size = bytes.len(), content_type, "storage upload");
        let resp = self
            .http
            .put(upload_url)
            .timeout(self.upload_timeout)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(bytes)
            .send()
            .await?;
        http::check_response(resp)?;
        Ok(())
    }

    /// `GET /health`. Returned bare, not enveloped.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::get`].
    pub async fn health(&self) -> Result<rag_core::entities::HealthStatus, ApiError> {
        let body = self.execute(self.request(Method::GET, "/health", None)).await?;
        http::decode_bare(&body)
    }
}

//! HTTP client for the storefront backend.

use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;

use crate::config::StorefrontConfig;

/// Authenticated HTTP client shared by every API service.
///
/// All requests go through here so auth, base-URL handling, and error
/// mapping live in one place. The bearer token comes from the injected
/// [`StorefrontConfig`], never from ambient state.
#[derive(Debug, Clone)]
pub struct ApiClient {
    config: StorefrontConfig,
    http: Client,
}

impl ApiClient {
    /// Create a new client from the given configuration.
    #[must_use]
    pub fn new(config: StorefrontConfig) -> Self {
        Self {
            config,
            http: Client::new(),
        }
    }

    /// Session identifier for anonymous cart correlation.
    #[must_use]
    pub fn session_id(&self) -> &str {
        &self.config.session_id
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}/api/v1{path}", self.config.base_url);

        let mut builder = self.http.request(method, url);

        if let Some(token) = &self.config.api_token {
            builder = builder.bearer_auth(token);
        }

        builder
    }

    async fn send_checked(&self, builder: RequestBuilder) -> Result<reqwest::Response, ApiError> {
        let response = builder.send().await?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();

            if status == StatusCode::NOT_FOUND {
                return Err(ApiError::NotFound);
            }

            return Err(ApiError::Status { status, body });
        }

        Ok(response)
    }

    /// `GET` a resource, deserializing the response body.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] for 404, [`ApiError::Status`] for any
    /// other non-2xx response, and [`ApiError::Http`] on transport failure.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        let response = self
            .send_checked(self.request(Method::GET, path).query(query))
            .await?;

        Ok(response.json().await?)
    }

    /// `GET` a resource that may legitimately not exist yet.
    ///
    /// A 404 is normalized to `Ok(None)`; every other failure propagates.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a non-2xx, non-404 status.
    pub async fn get_optional<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<Option<T>, ApiError> {
        match self.get(path, query).await {
            Ok(value) => Ok(Some(value)),
            Err(ApiError::NotFound) => Ok(None),
            Err(other) => Err(other),
        }
    }

    /// `POST` a JSON body and deserialize the response.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a non-2xx status.
    pub async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self
            .send_checked(self.request(Method::POST, path).json(body))
            .await?;

        Ok(response.json().await?)
    }

    /// `POST` a JSON body, discarding whatever the response carries.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a non-2xx status.
    pub async fn post_unit<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<(), ApiError> {
        self.send_checked(self.request(Method::POST, path).json(body))
            .await?;

        Ok(())
    }

    /// `PATCH` a JSON body and deserialize the response.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a non-2xx status.
    pub async fn patch<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self
            .send_checked(self.request(Method::PATCH, path).json(body))
            .await?;

        Ok(response.json().await?)
    }

    /// `DELETE` a resource, discarding any response body.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a non-2xx status.
    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.send_checked(self.request(Method::DELETE, path))
            .await?;

        Ok(())
    }

    /// `DELETE` where a missing resource counts as already done.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a non-2xx, non-404 status.
    pub async fn delete_idempotent(&self, path: &str) -> Result<(), ApiError> {
        match self.delete(path).await {
            Ok(()) | Err(ApiError::NotFound) => Ok(()),
            Err(other) => Err(other),
        }
    }
}

/// Errors that can occur when communicating with the backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// An HTTP transport or deserialization error occurred.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The resource does not exist.
    #[error("resource not found")]
    NotFound,

    /// The backend returned a non-2xx response.
    #[error("request failed with status {status}: {body}")]
    Status {
        /// HTTP status code of the response.
        status: StatusCode,
        /// Response body text, kept for diagnostics.
        body: String,
    },
}

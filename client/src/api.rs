//! HTTP client for the auth endpoints

use crate::error::ClientError;
use college_admin_shared::{AuthResponse, ErrorBody, LoginRequest, MessageResponse, User};
use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Client settings
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API root, e.g. `http://localhost:5000/api`
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000/api".to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

/// Thin typed wrapper over the auth endpoints
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// POST /auth/login
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, ClientError> {
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let response = self.http.post(self.url("/auth/login")).json(&body).send().await?;
        decode(response).await
    }

    /// POST /auth/logout
    pub async fn logout(&self, token: Option<&str>) -> Result<MessageResponse, ClientError> {
        let request = with_token(self.http.post(self.url("/auth/logout")), token);
        decode(request.send().await?).await
    }

    /// GET /auth/me
    pub async fn current_user(&self, token: &str) -> Result<User, ClientError> {
        let request = with_token(self.http.get(self.url("/auth/me")), Some(token));
        decode(request.send().await?).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

fn with_token(request: RequestBuilder, token: Option<&str>) -> RequestBuilder {
    match token {
        Some(token) => request.bearer_auth(token),
        None => request,
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json::<T>().await?);
    }

    let bytes = response.bytes().await?;
    let message = match serde_json::from_slice::<ErrorBody>(&bytes) {
        Ok(body) => body.message,
        Err(_) => status
            .canonical_reason()
            .unwrap_or("Request failed")
            .to_string(),
    };

    Err(ClientError::Api {
        status: status.as_u16(),
        message,
    })
}

//! HTTP client for the two service endpoints.
//!
//! `POST /login` exchanges a password for a session token; `POST
//! /generate` takes the URL-encoded field payload (bearer token
//! attached when present) and answers with the rendered document bytes.
//! Status mapping follows the submission error contract: 401/403 on the
//! generation path means the session expired, anything else non-2xx is
//! a generation failure, and generation-path transport errors fold into
//! the same bucket.

use async_trait::async_trait;
use bidforge_protocol::{ErrorBody, GeneratePayload, LoginRequest, LoginResponse};
use reqwest::StatusCode;
use tracing::debug;

use crate::error::{Error, Result};

const LOGIN_ENDPOINT: &str = "/login";
const GENERATE_ENDPOINT: &str = "/generate";

/// Verifies a credential against the service, yielding a session token.
/// Seam for the auth gate; [`ServiceClient`] is the real implementation.
#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    async fn verify(&self, password: &str) -> Result<String>;
}

/// Client bound to one service base URL.
#[derive(Debug, Clone)]
pub struct ServiceClient {
    client: reqwest::Client,
    base_url: String,
}

impl ServiceClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint_url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Exchange a password for a session token.
    pub async fn login(&self, password: &str) -> Result<String> {
        let url = self.endpoint_url(LOGIN_ENDPOINT);
        let request = LoginRequest {
            password: password.to_string(),
        };

        let response = self.client.post(&url).json(&request).send().await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            let reason = failure_reason(response, "password rejected").await;
            return Err(Error::invalid_credential(reason));
        }
        let response = response.error_for_status()?;

        let body: LoginResponse = response.json().await?;
        if !body.success {
            return Err(Error::invalid_credential("login rejected by service"));
        }
        body.token
            .ok_or_else(|| Error::invalid_credential("service returned success without a token"))
    }

    /// Dispatch one generation request; returns the rendered bytes.
    pub async fn generate(
        &self,
        payload: &GeneratePayload,
        token: Option<&str>,
    ) -> Result<Vec<u8>> {
        let url = self.endpoint_url(GENERATE_ENDPOINT);
        debug!(
            template = payload.template_name().unwrap_or("<unset>"),
            fields = payload.len(),
            "dispatching generation request"
        );

        let mut request = self.client.post(&url).form(payload);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::generation_with_source("request dispatch failed", e))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(Error::AuthorizationExpired);
        }
        if !status.is_success() {
            let reason = failure_reason(response, "service returned an error").await;
            return Err(Error::generation(format!("HTTP {status}: {reason}")));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| Error::generation_with_source("failed to read generated document", e))?;
        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl CredentialVerifier for ServiceClient {
    async fn verify(&self, password: &str) -> Result<String> {
        self.login(password).await
    }
}

/// Best-effort human reason out of a failure body: the service's JSON
/// `{"error": ...}` when it parses, the raw body when non-empty,
/// otherwise `fallback`.
async fn failure_reason(response: reqwest::Response, fallback: &str) -> String {
    let body = response.text().await.unwrap_or_default();
    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(&body) {
        return parsed.error;
    }
    if body.trim().is_empty() {
        fallback.to_string()
    } else {
        body
    }
}

//! Network step of a generation attempt.

use std::fmt;

use async_trait::async_trait;
use url::Url;

use super::types::{GenerateRequest, RawResponse};
use crate::error::TransportError;
use crate::session::Credential;

/// Sends one generation request and returns whatever came back.
///
/// Implementations do not interpret status codes or bodies.
#[async_trait]
pub trait GenerationTransport: Send + Sync + fmt::Debug {
    /// POST `prompt` with `credential` as bearer token.
    async fn send(&self, prompt: &str, credential: &Credential)
    -> Result<RawResponse, TransportError>;
}

/// `reqwest`-backed transport.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
    endpoint: Url,
}

impl HttpTransport {
    /// Create a transport posting to `endpoint`.
    pub fn new(http: reqwest::Client, endpoint: Url) -> Self {
        Self { http, endpoint }
    }

    /// Target URL.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl GenerationTransport for HttpTransport {
    async fn send(
        &self,
        prompt: &str,
        credential: &Credential,
    ) -> Result<RawResponse, TransportError> {
        let response = self
            .http
            .post(self.endpoint.clone())
            .bearer_auth(credential.expose())
            .json(&GenerateRequest { prompt })
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(RawResponse { status, body })
    }
}

//! Single-attempt generation client.

use std::sync::Arc;

use uuid::Uuid;

use super::transport::GenerationTransport;
use super::types::{GenerationResult, interpret_body};
use crate::error::GenerationError;
use crate::session::{Credential, SessionStore};

/// HTTP status the service uses for an expired or invalid credential.
const UNAUTHORIZED: u16 = 401;

/// Issues generation requests and interprets their outcome.
///
/// Every call is exactly one attempt; nothing is retried.
#[derive(Debug, Clone)]
pub struct GenerationClient {
    transport: Arc<dyn GenerationTransport>,
    sessions: SessionStore,
}

impl GenerationClient {
    /// Create a client. `sessions` is cleared when the service answers 401.
    pub fn new(transport: Arc<dyn GenerationTransport>, sessions: SessionStore) -> Self {
        Self {
            transport,
            sessions,
        }
    }

    /// Generate markup and stylesheet for `prompt`.
    ///
    /// # Errors
    ///
    /// - [`GenerationError::EmptyPrompt`] without any network activity
    /// - [`GenerationError::NetworkError`] when no response was obtained
    /// - [`GenerationError::Unauthorized`] on 401, after clearing the session
    /// - [`GenerationError::ServiceError`] when the body carries `error`
    /// - [`GenerationError::MalformedResult`] when `result` does not decode
    pub async fn generate(
        &self,
        prompt: &str,
        credential: &Credential,
    ) -> Result<GenerationResult, GenerationError> {
        if prompt.trim().is_empty() {
            return Err(GenerationError::EmptyPrompt);
        }

        let request_id = Uuid::new_v4().to_string();
        tracing::info!(
            name: "generation.request.sent",
            request_id = %request_id,
            prompt_length = prompt.len(),
            "Sending generation request"
        );

        let raw = match self.transport.send(prompt, credential).await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::error!(
                    name: "generation.request.unreachable",
                    request_id = %request_id,
                    error = %e,
                    "Generation service unreachable"
                );
                return Err(GenerationError::NetworkError(e.0));
            }
        };

        if raw.status == UNAUTHORIZED {
            tracing::warn!(
                name: "generation.request.unauthorized",
                request_id = %request_id,
                "Credential rejected, clearing session"
            );
            if let Err(e) = self.sessions.clear_session() {
                tracing::error!(request_id = %request_id, error = %e, "Failed to clear session");
            }
            return Err(GenerationError::Unauthorized);
        }

        match interpret_body(&raw.body) {
            Ok(result) => {
                tracing::info!(
                    name: "generation.request.succeeded",
                    request_id = %request_id,
                    status = raw.status,
                    html_length = result.markup.len(),
                    css_length = result.stylesheet.len(),
                    "Generation succeeded"
                );
                Ok(result)
            }
            Err(e) => {
                tracing::warn!(
                    name: "generation.request.failed",
                    request_id = %request_id,
                    status = raw.status,
                    error = %e,
                    "Generation failed"
                );
                tracing::trace!(request_id = %request_id, body = %raw.body, "Failed response body");
                Err(e)
            }
        }
    }
}

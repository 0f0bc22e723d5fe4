//! Generation request contract.
//!
//! One POST per user submission, carrying the prompt and the bearer
//! credential. The response is interpreted in a fixed order: transport
//! failure, 401, `error` member, then the double-encoded `result`.
//!
//! - [`GenerationTransport`]: network step, faked in tests
//! - [`GenerationClient`]: validation, session invalidation, interpretation
//! - [`interpret_body`]: response parsing on its own

mod client;
mod transport;
mod types;

pub use client::GenerationClient;
pub use transport::{GenerationTransport, HttpTransport};
pub use types::{GenerateRequest, GenerationResult, RawResponse, interpret_body};

//! Language-model boundary.
//!
//! Providers return an explicit `Result`; the responder matches on it and
//! never lets a provider failure reach the caller.

use async_trait::async_trait;
use thiserror::Error;

use crate::prompt::PromptSpec;

mod openai;

pub use openai::OpenAiCompatibleModel;

#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("model endpoint returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("quota or rate limit exceeded: {0}")]
    Quota(String),

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("model returned an empty response")]
    EmptyResponse,

    #[error("model call timed out")]
    Timeout,
}

#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn complete(&self, prompt: &PromptSpec) -> Result<String, CompletionError>;
}

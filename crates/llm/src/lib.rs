//! Generative answer synthesis
//!
//! Builds grounding and reasoning prompts from ranked fragments and calls
//! the generative backend. Generation failures and timeouts degrade to the
//! best fragment verbatim; the reasoning call never blocks the answer.

pub mod backend;
pub mod prompt;
pub mod synthesizer;

pub use backend::{GeneratorConfig, OllamaGenerator};
pub use prompt::{build_answer_prompt, build_reasoning_prompt, strip_control_tokens};
pub use synthesizer::AnswerSynthesizer;

use thiserror::Error;

/// Generation errors
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("Request error: {0}")]
    Request(String),

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Generation timed out after {0} seconds")]
    Timeout(u64),
}

impl From<LlmError> for portal_assist_core::Error {
    fn from(err: LlmError) -> Self {
        portal_assist_core::Error::Llm(err.to_string())
    }
}

//! Planner trait: the abstraction over the language model.
//!
//! A Planner takes one fully rendered prompt and returns the model's raw
//! text reply. It knows nothing about tools, history or JSON; decoding the
//! reply is the agent codec's job.
//!
//! Implementations: OpenAI-compatible endpoints (OpenAI, OpenRouter, Ollama,
//! vLLM, ...) and scripted planners for tests.

use async_trait::async_trait;

use crate::error::PlannerError;

/// The core Planner trait.
///
/// The orchestration loop calls `plan()` exactly once per round and treats
/// the call as blocking: no other work happens until it returns. Timeouts
/// are the implementation's responsibility.
#[async_trait]
pub trait Planner: Send + Sync {
    /// A human-readable name for this planner (e.g., "ollama", "openrouter").
    fn name(&self) -> &str;

    /// Send a prompt and get the raw response text.
    async fn plan(&self, prompt: &str) -> std::result::Result<String, PlannerError>;

    /// Health check: can we reach the planner?
    async fn health_check(&self) -> std::result::Result<bool, PlannerError> {
        Ok(true)
    }
}

//! # agent-runtime
//!
//! Concrete LLM backends for the prompt agents.
//!
//! ## Providers
//!
//! - **OpenAI-compatible** (default): hosted chat completions, Nebius AI
//!   Studio unless `LLM_BASE_URL` says otherwise
//! - **Ollama**: local inference via Ollama (feature `ollama`)
//! - **Mock**: scripted replies, no network
//!
//! ## Usage
//!
//! ```rust,ignore
//! let provider = agent_runtime::provider_from_env()?;
//! let completion = agent.run(provider.as_ref(), "I am 35 and earn $6,000").await?;
//! ```

use std::sync::Arc;

pub mod openai;

#[cfg(feature = "ollama")]
pub mod ollama;

#[cfg(feature = "ollama")]
pub use ollama::OllamaProvider;
pub use openai::{OpenAiCompatProvider, OpenAiConfig};

// Re-export core types for convenience
pub use agent_core::{
    AgentError, Completion, GenerationOptions, LlmProvider, Message, MockProvider, PromptAgent,
    Result, Role,
};

/// Build the provider selected by `LLM_PROVIDER`
pub fn provider_from_env() -> Result<Arc<dyn LlmProvider>> {
    provider_from_lookup(|key| std::env::var(key).ok())
}

/// Provider selection from an arbitrary key lookup
///
/// `openai` (default), `nebius`, `ollama` or `mock`.
pub fn provider_from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Arc<dyn LlmProvider>> {
    let kind = lookup("LLM_PROVIDER")
        .unwrap_or_else(|| "openai".into())
        .to_lowercase();

    let provider: Arc<dyn LlmProvider> = match kind.as_str() {
        "openai" | "nebius" => Arc::new(OpenAiCompatProvider::from_config(
            OpenAiConfig::from_lookup(&lookup)?,
        )?),
        #[cfg(feature = "ollama")]
        "ollama" => Arc::new(OllamaProvider::from_config(
            ollama::OllamaConfig::from_lookup(&lookup),
        )),
        "mock" => Arc::new(MockProvider::failing("mock provider has no script")),
        other => {
            return Err(AgentError::Config(format!("unknown LLM_PROVIDER '{other}'")));
        }
    };

    tracing::info!(provider = provider.name(), "LLM provider selected");
    Ok(provider)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selects_openai_by_default() {
        let provider = provider_from_lookup(|key| (key == "LLM_API_KEY").then(|| "k".into())).unwrap();
        assert_eq!(provider.name(), "OpenAI-compatible");
    }

    #[test]
    fn missing_key_is_a_config_error() {
        let err = provider_from_lookup(|_| None).err().unwrap();
        assert!(matches!(err, AgentError::Config(_)));
    }

    #[test]
    fn unknown_provider_is_rejected() {
        let err = provider_from_lookup(|key| (key == "LLM_PROVIDER").then(|| "gpt-hal".into()))
            .err()
            .unwrap();
        assert!(matches!(err, AgentError::Config(msg) if msg.contains("gpt-hal")));
    }

    #[test]
    fn mock_provider_needs_no_credentials() {
        let provider = provider_from_lookup(|key| (key == "LLM_PROVIDER").then(|| "mock".into())).unwrap();
        assert_eq!(provider.name(), "Mock");
    }
}

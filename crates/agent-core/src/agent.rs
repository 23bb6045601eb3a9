//! Prompt Agents
//!
//! An agent is a system prompt plus exactly one completion call. There is no
//! loop and no tool dispatch: callers chain agents by passing one agent's
//! output into the next agent's input.

use serde::de::DeserializeOwned;

use crate::error::{AgentError, Result};
use crate::json::extract_json;
use crate::message::Message;
use crate::provider::{Completion, GenerationOptions, LlmProvider};

/// A named prompt template dispatched to an LLM
#[derive(Clone, Debug)]
pub struct PromptAgent {
    name: String,
    description: String,
    system_prompt: String,
    options: GenerationOptions,
}

impl PromptAgent {
    pub fn new(name: impl Into<String>, system_prompt: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            system_prompt: system_prompt.into(),
            options: GenerationOptions::default(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_options(mut self, options: GenerationOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.options.model = model.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    pub const fn options(&self) -> &GenerationOptions {
        &self.options
    }

    /// Messages sent for a given input
    pub fn messages(&self, input: &str) -> Vec<Message> {
        vec![Message::system(&self.system_prompt), Message::user(input)]
    }

    /// Run the agent once and return the raw completion
    pub async fn run(&self, provider: &dyn LlmProvider, input: &str) -> Result<Completion> {
        let messages = self.messages(input);
        tracing::debug!(
            agent = %self.name,
            provider = provider.name(),
            model = %self.options.model,
            prompt_tokens = crate::message::estimate_tokens(&messages),
            "dispatching agent"
        );

        let completion = provider.complete(&messages, &self.options).await?;

        if completion.content.trim().is_empty() {
            return Err(AgentError::EmptyCompletion(self.name.clone()));
        }
        if completion.truncated() {
            tracing::warn!(agent = %self.name, "completion truncated at max_tokens");
        }

        Ok(completion)
    }

    /// Run the agent and deserialize the JSON object contained in its reply
    pub async fn run_json<T: DeserializeOwned>(
        &self,
        provider: &dyn LlmProvider,
        input: &str,
    ) -> Result<T> {
        let completion = self.run(provider, input).await?;
        parse_json_reply(&self.name, &completion.content)
    }
}

/// Deserialize the JSON object embedded in an agent reply
pub fn parse_json_reply<T: DeserializeOwned>(agent: &str, content: &str) -> Result<T> {
    let json = extract_json(content).ok_or_else(|| {
        AgentError::Parse(format!("{agent} did not return a JSON object"))
    })?;
    serde_json::from_str(json)
        .map_err(|e| AgentError::Parse(format!("{agent} returned malformed JSON: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Role;
    use crate::mock::MockProvider;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Level {
        literacy_level: String,
    }

    #[tokio::test]
    async fn run_sends_system_then_user() {
        let provider = MockProvider::replying("ok");
        let agent = PromptAgent::new("Echo", "You echo.").with_model("test-model");

        let completion = agent.run(&provider, "hello").await.unwrap();
        assert_eq!(completion.content, "ok");

        let calls = provider.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].messages[0].role, Role::System);
        assert_eq!(calls[0].messages[0].content, "You echo.");
        assert_eq!(calls[0].messages[1].content, "hello");
        assert_eq!(calls[0].model, "test-model");
    }

    #[tokio::test]
    async fn run_json_extracts_object_from_prose() {
        let provider =
            MockProvider::replying("Sure!\n```json\n{\"literacy_level\": \"beginner\"}\n```");
        let agent = PromptAgent::new("Literacy", "Classify.");

        let level: Level = agent.run_json(&provider, "I earn 6k").await.unwrap();
        assert_eq!(level.literacy_level, "beginner");
    }

    #[tokio::test]
    async fn empty_reply_is_an_error() {
        let provider = MockProvider::replying("   ");
        let agent = PromptAgent::new("Blank", "Say nothing.");
        let err = agent.run(&provider, "x").await.unwrap_err();
        assert!(matches!(err, AgentError::EmptyCompletion(name) if name == "Blank"));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = parse_json_reply::<Level>("Literacy", "{\"literacy_level\": }").unwrap_err();
        assert!(matches!(err, AgentError::Parse(_)));
    }
}

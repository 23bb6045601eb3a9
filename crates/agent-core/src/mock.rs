//! Mock Provider
//!
//! Scripted replies for tests and offline demos.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{AgentError, Result};
use crate::message::Message;
use crate::provider::{
    Completion, FinishReason, GenerationOptions, LlmProvider, ModelInfo, TokenUsage,
};

/// A recorded `complete` call
#[derive(Clone, Debug)]
pub struct RecordedCall {
    pub model: String,
    pub messages: Vec<Message>,
}

/// Provider that answers from a script
///
/// Scripted replies are consumed in order; once exhausted the last reply
/// (or failure) repeats.
pub struct MockProvider {
    script: Mutex<VecDeque<std::result::Result<String, String>>>,
    last: Mutex<Option<std::result::Result<String, String>>>,
    calls: Mutex<Vec<RecordedCall>>,
    healthy: bool,
}

impl MockProvider {
    pub fn scripted(replies: Vec<std::result::Result<String, String>>) -> Self {
        Self {
            script: Mutex::new(replies.into()),
            last: Mutex::new(None),
            calls: Mutex::new(Vec::new()),
            healthy: true,
        }
    }

    /// Always reply with the same text
    pub fn replying(text: impl Into<String>) -> Self {
        Self::scripted(vec![Ok(text.into())])
    }

    /// Always fail as if the service were down
    pub fn failing(reason: impl Into<String>) -> Self {
        let mut provider = Self::scripted(vec![Err(reason.into())]);
        provider.healthy = false;
        provider
    }

    /// Calls received so far
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    fn next_reply(&self) -> std::result::Result<String, String> {
        let mut script = self.script.lock().map_err(|e| e.to_string())?;
        let mut last = self.last.lock().map_err(|e| e.to_string())?;
        if let Some(reply) = script.pop_front() {
            *last = Some(reply.clone());
            return reply;
        }
        last.clone()
            .unwrap_or_else(|| Err("mock script is empty".into()))
    }
}

#[async_trait]
impl LlmProvider for MockProvider {
    fn name(&self) -> &str {
        "Mock"
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(self.healthy)
    }

    async fn complete(
        &self,
        messages: &[Message],
        options: &GenerationOptions,
    ) -> Result<Completion> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(RecordedCall {
                model: options.model.clone(),
                messages: messages.to_vec(),
            });
        }

        let content = self.next_reply().map_err(AgentError::ProviderUnavailable)?;
        let prompt_tokens = crate::message::estimate_tokens(messages);
        let completion_tokens = self.estimate_tokens(&content);

        Ok(Completion {
            content,
            model: options.model.clone(),
            usage: Some(TokenUsage {
                prompt_tokens,
                completion_tokens,
                total_tokens: prompt_tokens + completion_tokens,
            }),
            finish_reason: Some(FinishReason::Stop),
        })
    }

    async fn list_models(&self) -> Result<Vec<ModelInfo>> {
        Ok(vec![ModelInfo {
            id: "mock".into(),
            owned_by: None,
        }])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn script_is_consumed_then_last_repeats() {
        let provider = MockProvider::scripted(vec![Ok("one".into()), Ok("two".into())]);
        let opts = GenerationOptions::default();
        let msgs = [Message::user("hi")];

        assert_eq!(provider.complete(&msgs, &opts).await.unwrap().content, "one");
        assert_eq!(provider.complete(&msgs, &opts).await.unwrap().content, "two");
        assert_eq!(provider.complete(&msgs, &opts).await.unwrap().content, "two");
        assert_eq!(provider.calls().len(), 3);
    }

    #[tokio::test]
    async fn failing_provider_reports_unavailable() {
        let provider = MockProvider::failing("offline");
        assert!(!provider.health_check().await.unwrap());
        let err = provider
            .complete(&[Message::user("hi")], &GenerationOptions::default())
            .await
            .unwrap_err();
        assert!(err.is_retryable());
    }
}

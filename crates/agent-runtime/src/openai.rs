//! OpenAI-compatible LLM Provider
//!
//! Chat-completions client for any endpoint speaking the OpenAI wire format.
//! Nebius AI Studio is the default; vLLM, LM Studio and OpenAI itself work by
//! pointing `LLM_BASE_URL` elsewhere.

use std::time::Duration;

use agent_core::{
    error::{AgentError, Result},
    message::Message,
    provider::{
        Completion, DEFAULT_MODEL, FinishReason, GenerationOptions, LlmProvider, ModelInfo,
        TokenUsage,
    },
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

const DEFAULT_BASE_URL: &str = "https://api.studio.nebius.com/v1";
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// OpenAI-compatible provider configuration
#[derive(Clone, Debug)]
pub struct OpenAiConfig {
    /// API root, without the trailing `/chat/completions`
    pub base_url: String,

    /// Bearer token
    pub api_key: String,

    /// Model used when agents keep the default
    pub default_model: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl OpenAiConfig {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            default_model: DEFAULT_MODEL.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup
    ///
    /// `LLM_API_KEY` wins over `NEBIUS_API_KEY`; one of them is required.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let api_key = lookup("LLM_API_KEY")
            .or_else(|| lookup("NEBIUS_API_KEY"))
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| AgentError::Config("LLM_API_KEY (or NEBIUS_API_KEY) is not set".into()))?;

        let base_url = lookup("LLM_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.into());
        let default_model = lookup("LLM_MODEL").unwrap_or_else(|| DEFAULT_MODEL.into());
        let timeout_secs = lookup("LLM_TIMEOUT_SECS")
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Ok(Self {
            base_url,
            api_key,
            default_model,
            timeout_secs,
        })
    }
}

/// OpenAI-compatible LLM provider
pub struct OpenAiCompatProvider {
    http: reqwest::Client,
    config: OpenAiConfig,
}

impl OpenAiCompatProvider {
    pub fn from_config(config: OpenAiConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AgentError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { http, config })
    }

    pub fn from_env() -> Result<Self> {
        Self::from_config(OpenAiConfig::from_env()?)
    }

    pub const fn config(&self) -> &OpenAiConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.config.base_url.trim_end_matches('/'))
    }

    /// Agents built with the library default pick up the configured model
    fn resolve_model<'a>(&'a self, options: &'a GenerationOptions) -> &'a str {
        if options.model == DEFAULT_MODEL {
            &self.config.default_model
        } else {
            &options.model
        }
    }

    fn map_send_error(&self, err: &reqwest::Error) -> AgentError {
        if err.is_timeout() {
            AgentError::Timeout(self.config.timeout_secs)
        } else {
            AgentError::ProviderUnavailable(err.to_string())
        }
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<String> {
        let res = request
            .bearer_auth(&self.config.api_key)
            .send()
            .await
            .map_err(|e| self.map_send_error(&e))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|e| AgentError::Provider(format!("failed to read response body: {e}")))?;

        if !status.is_success() {
            return Err(AgentError::from_status(status.as_u16(), body));
        }
        Ok(body)
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
    top_p: f32,
    #[serde(skip_serializing_if = "<[String]>::is_empty")]
    stop: &'a [String],
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
    #[serde(default)]
    total_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ModelList {
    #[serde(default)]
    data: Vec<ModelEntry>,
}

#[derive(Debug, Deserialize)]
struct ModelEntry {
    id: String,
    #[serde(default)]
    owned_by: Option<String>,
}

/// Decode a `/chat/completions` body
fn parse_chat_response(body: &str, requested_model: &str) -> Result<Completion> {
    let parsed: ChatResponse = serde_json::from_str(body)
        .map_err(|e| AgentError::Parse(format!("unexpected chat completion payload: {e}")))?;

    let choice = parsed
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| AgentError::Parse("chat completion had no choices".into()))?;

    Ok(Completion {
        content: choice.message.content.unwrap_or_default(),
        model: parsed.model.unwrap_or_else(|| requested_model.to_string()),
        usage: parsed.usage.map(|u| TokenUsage {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: u.completion_tokens,
            total_tokens: u.total_tokens,
        }),
        finish_reason: choice.finish_reason.as_deref().map(FinishReason::parse),
    })
}

fn parse_model_list(body: &str) -> Result<Vec<ModelInfo>> {
    let parsed: ModelList = serde_json::from_str(body)
        .map_err(|e| AgentError::Parse(format!("unexpected model list payload: {e}")))?;
    Ok(parsed
        .data
        .into_iter()
        .map(|m| ModelInfo {
            id: m.id,
            owned_by: m.owned_by,
        })
        .collect())
}

#[async_trait]
impl LlmProvider for OpenAiCompatProvider {
    fn name(&self) -> &str {
        "OpenAI-compatible"
    }

    async fn health_check(&self) -> Result<bool> {
        match self.list_models().await {
            Ok(_) => Ok(true),
            Err(e) => {
                tracing::warn!(base_url = %self.config.base_url, "LLM health check failed: {e}");
                Ok(false)
            }
        }
    }

    async fn complete(
        &self,
        messages: &[Message],
        options: &GenerationOptions,
    ) -> Result<Completion> {
        let model = self.resolve_model(options);
        let request = ChatRequest {
            model,
            messages: messages
                .iter()
                .map(|m| ChatMessage {
                    role: m.role.as_str(),
                    content: &m.content,
                })
                .collect(),
            temperature: options.temperature,
            max_tokens: options.max_tokens,
            top_p: options.top_p,
            stop: &options.stop_sequences,
        };

        let started = std::time::Instant::now();
        let body = self
            .send(self.http.post(self.url("chat/completions")).json(&request))
            .await?;
        let completion = parse_chat_response(&body, model)?;

        tracing::info!(
            model = %completion.model,
            elapsed_ms = started.elapsed().as_millis(),
            tokens = completion.usage.map(|u| u.total_tokens),
            "chat completion received"
        );
        Ok(completion)
    }

    async fn list_models(&self) -> Result<Vec<ModelInfo>> {
        let body = self.send(self.http.get(self.url("models"))).await?;
        parse_model_list(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Json, Router, http::StatusCode, routing::{get, post}};
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}/v1")
    }

    #[test]
    fn config_requires_a_key() {
        let err = OpenAiConfig::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, AgentError::Config(_)));
    }

    #[test]
    fn config_falls_back_to_nebius_key_and_defaults() {
        let config = OpenAiConfig::from_lookup(lookup(&[("NEBIUS_API_KEY", "nb-123")])).unwrap();
        assert_eq!(config.api_key, "nb-123");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.default_model, DEFAULT_MODEL);
        assert_eq!(config.timeout_secs, 120);
    }

    #[test]
    fn config_prefers_generic_key() {
        let config = OpenAiConfig::from_lookup(lookup(&[
            ("NEBIUS_API_KEY", "nb"),
            ("LLM_API_KEY", "generic"),
            ("LLM_TIMEOUT_SECS", "30"),
        ]))
        .unwrap();
        assert_eq!(config.api_key, "generic");
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn parses_chat_response() {
        let body = r#"{
            "id": "x", "model": "llama",
            "choices": [{"index": 0, "message": {"role": "assistant", "content": "hi"}, "finish_reason": "length"}],
            "usage": {"prompt_tokens": 5, "completion_tokens": 2, "total_tokens": 7}
        }"#;
        let completion = parse_chat_response(body, "fallback").unwrap();
        assert_eq!(completion.content, "hi");
        assert_eq!(completion.model, "llama");
        assert!(completion.truncated());
        assert_eq!(completion.usage.unwrap().total_tokens, 7);
    }

    #[test]
    fn empty_choices_is_a_parse_error() {
        let err = parse_chat_response(r#"{"choices": []}"#, "m").unwrap_err();
        assert!(matches!(err, AgentError::Parse(_)));
    }

    #[tokio::test]
    async fn completes_against_stub_server() {
        let router = Router::new()
            .route(
                "/v1/chat/completions",
                post(|Json(body): Json<serde_json::Value>| async move {
                    let model = body["model"].as_str().unwrap_or_default().to_string();
                    let last = body["messages"][1]["content"].as_str().unwrap_or_default().to_string();
                    Json(serde_json::json!({
                        "model": model,
                        "choices": [{"message": {"content": format!("echo: {last}")}, "finish_reason": "stop"}]
                    }))
                }),
            )
            .route(
                "/v1/models",
                get(|| async { Json(serde_json::json!({"data": [{"id": "llama", "owned_by": "meta"}]})) }),
            );
        let base = serve(router).await;

        let mut config = OpenAiConfig::new(base, "key");
        config.default_model = "configured-model".into();
        let provider = OpenAiCompatProvider::from_config(config).unwrap();

        let messages = [Message::system("sys"), Message::user("ping")];
        let completion = provider
            .complete(&messages, &GenerationOptions::default())
            .await
            .unwrap();
        assert_eq!(completion.content, "echo: ping");
        assert_eq!(completion.model, "configured-model");

        let models = provider.list_models().await.unwrap();
        assert_eq!(models[0].id, "llama");
        assert!(provider.health_check().await.unwrap());
    }

    #[tokio::test]
    async fn maps_http_errors() {
        let router = Router::new().route(
            "/v1/chat/completions",
            post(|| async { (StatusCode::UNAUTHORIZED, "bad key") }),
        );
        let base = serve(router).await;
        let provider = OpenAiCompatProvider::from_config(OpenAiConfig::new(base, "key")).unwrap();

        let err = provider
            .complete(&[Message::user("x")], &GenerationOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AgentError::Auth(body) if body == "bad key"));
        assert!(!provider.health_check().await.unwrap());
    }
}

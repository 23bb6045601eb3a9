//! # agent-core
//!
//! Provider-agnostic LLM abstraction and single-call prompt agents.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     PromptAgent                              │
//! │  ┌─────────────┐  ┌─────────────┐  ┌─────────────────────┐  │
//! │  │   System    │  │    JSON     │  │   LlmProvider       │  │
//! │  │   Prompt    │──│  Extraction │──│   (Strategy)        │  │
//! │  └─────────────┘  └─────────────┘  └─────────────────────┘  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! The `LlmProvider` trait lets a hosted OpenAI-compatible endpoint, a local
//! Ollama instance or a scripted mock answer the same agents.

pub mod agent;
pub mod error;
pub mod json;
pub mod message;
pub mod mock;
pub mod provider;

pub use agent::PromptAgent;
pub use error::{AgentError, Result};
pub use message::{Message, Role};
pub use mock::MockProvider;
pub use provider::{Completion, GenerationOptions, LlmProvider};

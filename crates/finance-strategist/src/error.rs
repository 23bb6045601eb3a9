//! Error Types for the Strategist

use agent_core::AgentError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, StrategistError>;

#[derive(Error, Debug)]
pub enum StrategistError {
    /// Profile failed hard validation; each entry is one problem
    #[error("Invalid profile: {}", .0.join("; "))]
    Validation(Vec<String>),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Country not supported: {0}")]
    UnsupportedCountry(String),

    #[error("{source_name} has no data for {what}")]
    NoData { source_name: String, what: String },

    #[error("{source_name} returned HTTP {status}")]
    UpstreamStatus { source_name: String, status: u16 },

    #[error("Unexpected payload from {source_name}: {detail}")]
    Payload { source_name: String, detail: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Agent error: {0}")]
    Agent(#[from] AgentError),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StrategistError {
    pub fn no_data(source_name: impl Into<String>, what: impl Into<String>) -> Self {
        Self::NoData {
            source_name: source_name.into(),
            what: what.into(),
        }
    }

    pub fn payload(source_name: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::Payload {
            source_name: source_name.into(),
            detail: detail.into(),
        }
    }

    /// Whether the caller sent something unusable, as opposed to a backend failure
    pub const fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::Validation(_) | Self::InvalidInput(_) | Self::UnsupportedCountry(_)
        )
    }

    /// Text safe to show an end user
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(problems) => problems.join(" "),
            Self::InvalidInput(msg) => msg.clone(),
            Self::UnsupportedCountry(country) => {
                format!("Detailed tax information is not available for {country}.")
            }
            Self::Agent(err) => err.user_message(),
            Self::NoData { .. } | Self::UpstreamStatus { .. } | Self::Payload { .. } | Self::Network(_) => {
                "Market or economic data is temporarily unavailable.".into()
            }
            Self::Config(_) | Self::Serialization(_) => "An unexpected error occurred.".into(),
        }
    }
}

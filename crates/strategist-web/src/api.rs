//! API Client

use serde::{Deserialize, Serialize};

/// The parts of a strategy report the UI shows
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StrategyView {
    pub request_id: String,
    pub strategy_html: String,
    pub status: String,
    pub processing_time_secs: f64,
    #[serde(default)]
    pub warnings: Vec<String>,
    #[serde(default)]
    pub literacy_level: Option<String>,
    pub economic_data_included: bool,
    pub bullish_analysis_included: bool,
    #[serde(default)]
    pub gdp_growth_rate: Option<f64>,
}

impl StrategyView {
    pub fn ai_generated(&self) -> bool {
        self.status == "success"
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServiceHealth {
    pub status: String,
    pub version: String,
    pub llm_provider: String,
    pub llm_connected: bool,
    #[serde(default)]
    pub features: Vec<String>,
}

/// Absolute URL for an API path; reqwest in the browser needs one
pub fn join_url(origin: &str, path: &str) -> String {
    format!("{}/{}", origin.trim_end_matches('/'), path.trim_start_matches('/'))
}

fn endpoint(path: &str) -> String {
    let origin = web_sys::window()
        .and_then(|w| w.location().origin().ok())
        .unwrap_or_else(|| "http://localhost:3000".into());
    join_url(&origin, path)
}

async fn read<T: for<'de> Deserialize<'de>>(response: reqwest::Response) -> Result<T, String> {
    if response.status().is_success() {
        response.json().await.map_err(|e| e.to_string())
    } else {
        let status = response.status();
        let data: serde_json::Value = response.json().await.unwrap_or_default();
        Err(data["error"]
            .as_str()
            .map_or_else(|| format!("Request failed ({status})"), str::to_string))
    }
}

/// Strategy from questionnaire answers
pub async fn request_strategy(payload: &serde_json::Value) -> Result<StrategyView, String> {
    let response = reqwest::Client::new()
        .post(endpoint("/strategy"))
        .json(payload)
        .send()
        .await
        .map_err(|e| e.to_string())?;
    read(response).await
}

/// Strategy from a free-text description
pub async fn request_strategy_from_text(text: &str) -> Result<StrategyView, String> {
    let response = reqwest::Client::new()
        .post(endpoint("/strategy/text"))
        .json(&serde_json::json!({ "text": text }))
        .send()
        .await
        .map_err(|e| e.to_string())?;
    read(response).await
}

/// `GET /test`, returning the server's message
pub async fn test_service() -> Result<String, String> {
    let response = reqwest::get(endpoint("/test")).await.map_err(|e| e.to_string())?;
    let data: serde_json::Value = read(response).await?;
    Ok(data["message"].as_str().unwrap_or("Service is running").to_string())
}

pub async fn health() -> Result<ServiceHealth, String> {
    let response = reqwest::get(endpoint("/health")).await.map_err(|e| e.to_string())?;
    read(response).await
}

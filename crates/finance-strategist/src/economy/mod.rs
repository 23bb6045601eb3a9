//! Economic Data
//!
//! Indicator sources (World Bank, FRED, OECD, a static policy-rate table),
//! Yahoo Finance market data, and the analysts that combine them.
//!
//! ```text
//! inflation      World Bank ─▶ FRED (US) ─▶ OECD ─▶ Unavailable
//! interest rate  FRED (US) ─▶ OECD ─▶ policy-rate table ─▶ Unavailable
//! GDP growth     World Bank ─▶ FRED (US) ─▶ Unavailable
//! sentiment      Yahoo benchmark index ─▶ Unavailable
//! ```

mod analyst;
mod fred;
mod indicator;
mod market;
mod mock;
mod oecd;
mod policy_rates;
mod worldbank;
mod yahoo;

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::country::Country;
use crate::error::{Result, StrategistError};

pub use analyst::EconomicAnalyst;
pub use fred::FredSource;
pub use indicator::{Indicator, IndicatorBundle, MarketTrend, Provenance, UNAVAILABLE};
pub use market::{IndexQuote, MarketAnalyst, MarketOverview, SectorPerformance, StockMomentum};
pub use mock::{MockIndicatorSource, MockMarketData};
pub use oecd::OecdSource;
pub use policy_rates::{PolicyRate, PolicyRateTable};
pub use worldbank::WorldBankSource;
pub use yahoo::{HistoryRange, PriceHistory, YahooFinance, is_ticker};

/// Macroeconomic series the analyst asks for
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndicatorKind {
    Inflation,
    InterestRate,
    GdpGrowth,
}

impl IndicatorKind {
    /// Key used in the bundle's provenance map
    pub const fn field(self) -> &'static str {
        match self {
            Self::Inflation => "inflation_rate",
            Self::InterestRate => "interest_rate",
            Self::GdpGrowth => "gdp_growth",
        }
    }
}

impl fmt::Display for IndicatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Inflation => "inflation",
            Self::InterestRate => "interest rate",
            Self::GdpGrowth => "GDP growth",
        })
    }
}

/// One value returned by a source
#[derive(Clone, Debug, PartialEq)]
pub struct Observation {
    pub value: f64,
    pub period: Option<String>,
    pub source: String,
}

/// A statistics provider able to answer some indicators for some countries
#[async_trait]
pub trait IndicatorSource: Send + Sync {
    fn name(&self) -> &str;

    /// Whether asking this source is worthwhile at all
    fn supports(&self, kind: IndicatorKind, country: Country) -> bool;

    async fn fetch(&self, kind: IndicatorKind, country: Country) -> Result<Observation>;
}

/// Price history provider
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    fn name(&self) -> &str;

    async fn history(&self, symbol: &str, range: HistoryRange) -> Result<PriceHistory>;
}

const DEFAULT_WORLD_BANK_URL: &str = "https://api.worldbank.org/v2";
const DEFAULT_FRED_URL: &str = "https://api.stlouisfed.org/fred";
const DEFAULT_OECD_URL: &str = "https://sdmx.oecd.org/public/rest";
const DEFAULT_YAHOO_URL: &str = "https://query1.finance.yahoo.com";
const DEFAULT_DATA_TIMEOUT_SECS: u64 = 10;

/// Endpoints and credentials for the public data APIs
#[derive(Clone, Debug)]
pub struct DataSourceConfig {
    pub world_bank_base_url: String,
    pub fred_base_url: String,
    pub fred_api_key: Option<String>,
    pub oecd_base_url: String,
    pub yahoo_base_url: String,
    pub timeout_secs: u64,
}

impl Default for DataSourceConfig {
    fn default() -> Self {
        Self {
            world_bank_base_url: DEFAULT_WORLD_BANK_URL.into(),
            fred_base_url: DEFAULT_FRED_URL.into(),
            fred_api_key: None,
            oecd_base_url: DEFAULT_OECD_URL.into(),
            yahoo_base_url: DEFAULT_YAHOO_URL.into(),
            timeout_secs: DEFAULT_DATA_TIMEOUT_SECS,
        }
    }
}

impl DataSourceConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            world_bank_base_url: lookup("WORLD_BANK_BASE_URL").unwrap_or(defaults.world_bank_base_url),
            fred_base_url: lookup("FRED_BASE_URL").unwrap_or(defaults.fred_base_url),
            fred_api_key: lookup("FRED_API_KEY").filter(|k| !k.trim().is_empty()),
            oecd_base_url: lookup("OECD_BASE_URL").unwrap_or(defaults.oecd_base_url),
            yahoo_base_url: lookup("YAHOO_BASE_URL").unwrap_or(defaults.yahoo_base_url),
            timeout_secs: lookup("DATA_TIMEOUT_SECS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.timeout_secs),
        }
    }

    /// Shared client: short timeout and a browser-like User-Agent (Yahoo rejects bare clients)
    pub fn http_client(&self) -> Result<reqwest::Client> {
        reqwest::Client::builder()
            .timeout(Duration::from_secs(self.timeout_secs))
            .user_agent(concat!(
                "Mozilla/5.0 (compatible; finance-strategist/",
                env!("CARGO_PKG_VERSION"),
                ")"
            ))
            .build()
            .map_err(|e| StrategistError::Config(format!("failed to build HTTP client: {e}")))
    }
}

/// GET a URL and decode JSON, turning non-2xx into an error
pub(crate) async fn get_json(
    source_name: &str,
    request: reqwest::RequestBuilder,
) -> Result<serde_json::Value> {
    let res = request.send().await?;
    let status = res.status();
    if !status.is_success() {
        return Err(StrategistError::UpstreamStatus {
            source_name: source_name.to_string(),
            status: status.as_u16(),
        });
    }
    let text = res.text().await?;
    serde_json::from_str(&text)
        .map_err(|e| StrategistError::payload(source_name, format!("invalid JSON: {e}")))
}

/// Read a JSON number or numeric string
pub(crate) fn json_number(value: &serde_json::Value) -> Option<f64> {
    match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use axum::Router;

    /// Serve a router on an ephemeral port and return its base URL
    pub async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults_without_env() {
        let config = DataSourceConfig::from_lookup(|_| None);
        assert_eq!(config.timeout_secs, 10);
        assert!(config.fred_api_key.is_none());
        assert_eq!(config.world_bank_base_url, DEFAULT_WORLD_BANK_URL);
    }

    #[test]
    fn blank_fred_key_is_ignored() {
        let config = DataSourceConfig::from_lookup(|key| match key {
            "FRED_API_KEY" => Some("  ".into()),
            "DATA_TIMEOUT_SECS" => Some("3".into()),
            _ => None,
        });
        assert!(config.fred_api_key.is_none());
        assert_eq!(config.timeout_secs, 3);
    }

    #[test]
    fn json_numbers_from_strings() {
        assert_eq!(json_number(&serde_json::json!("4.33")), Some(4.33));
        assert_eq!(json_number(&serde_json::json!(2)), Some(2.0));
        assert_eq!(json_number(&serde_json::json!(".")), None);
        assert_eq!(json_number(&serde_json::Value::Null), None);
    }
}

//! Yahoo Finance chart API
//!
//! `GET {base}/v8/finance/chart/{symbol}?range=6mo&interval=1d`

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{MarketDataSource, get_json};
use crate::error::{Result, StrategistError};

const NAME: &str = "Yahoo Finance";

/// Look-back window for a price history
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HistoryRange {
    #[serde(rename = "5d")]
    FiveDays,
    #[default]
    #[serde(rename = "1mo")]
    OneMonth,
    #[serde(rename = "3mo")]
    ThreeMonths,
    #[serde(rename = "6mo")]
    SixMonths,
    #[serde(rename = "1y")]
    OneYear,
}

impl HistoryRange {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FiveDays => "5d",
            Self::OneMonth => "1mo",
            Self::ThreeMonths => "3mo",
            Self::SixMonths => "6mo",
            Self::OneYear => "1y",
        }
    }
}

impl fmt::Display for HistoryRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HistoryRange {
    type Err = StrategistError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "5d" => Ok(Self::FiveDays),
            "1mo" => Ok(Self::OneMonth),
            "3mo" => Ok(Self::ThreeMonths),
            "6mo" => Ok(Self::SixMonths),
            "1y" => Ok(Self::OneYear),
            other => Err(StrategistError::InvalidInput(format!(
                "range must be one of 5d, 1mo, 3mo, 6mo, 1y; got '{other}'"
            ))),
        }
    }
}

/// Daily closes for one symbol, oldest first
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PriceHistory {
    pub symbol: String,
    pub name: Option<String>,
    pub currency: Option<String>,
    pub timestamps: Vec<i64>,
    pub closes: Vec<f64>,
}

impl PriceHistory {
    pub fn latest(&self) -> Option<f64> {
        self.closes.last().copied()
    }

    /// Percent change from the first to the last close
    pub fn change_percent(&self) -> Option<f64> {
        let first = *self.closes.first()?;
        let last = *self.closes.last()?;
        (self.closes.len() > 1 && first != 0.0).then(|| (last - first) / first * 100.0)
    }

    /// Percent change over the most recent session
    pub fn last_change_percent(&self) -> Option<f64> {
        let n = self.closes.len();
        if n < 2 {
            return None;
        }
        let prev = self.closes[n - 2];
        (prev != 0.0).then(|| (self.closes[n - 1] - prev) / prev * 100.0)
    }
}

/// Decode a chart response, dropping sessions without a close
fn parse_chart(symbol: &str, body: &serde_json::Value) -> Result<PriceHistory> {
    let chart = body
        .get("chart")
        .ok_or_else(|| StrategistError::payload(NAME, "missing chart"))?;

    if let Some(description) = chart.pointer("/error/description").and_then(serde_json::Value::as_str) {
        return Err(StrategistError::no_data(NAME, format!("{symbol}: {description}")));
    }

    let result = chart
        .pointer("/result/0")
        .ok_or_else(|| StrategistError::no_data(NAME, symbol.to_string()))?;

    let meta = result.get("meta");
    let text = |key: &str| {
        meta.and_then(|m| m.get(key))
            .and_then(serde_json::Value::as_str)
            .map(str::to_string)
    };

    let raw_timestamps = result
        .get("timestamp")
        .and_then(serde_json::Value::as_array)
        .cloned()
        .unwrap_or_default();
    let raw_closes = result
        .pointer("/indicators/quote/0/close")
        .and_then(serde_json::Value::as_array)
        .cloned()
        .unwrap_or_default();

    let (timestamps, closes): (Vec<i64>, Vec<f64>) = raw_timestamps
        .iter()
        .zip(raw_closes.iter())
        .filter_map(|(t, c)| Some((t.as_i64()?, c.as_f64()?)))
        .unzip();

    if closes.is_empty() {
        return Err(StrategistError::no_data(NAME, format!("{symbol}: no closes")));
    }

    Ok(PriceHistory {
        symbol: text("symbol").unwrap_or_else(|| symbol.to_string()),
        name: text("longName").or_else(|| text("shortName")),
        currency: text("currency"),
        timestamps,
        closes,
    })
}

pub struct YahooFinance {
    http: reqwest::Client,
    base_url: String,
}

impl YahooFinance {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }
}

/// Tickers, index codes (`^GSPC`), share classes (`BRK.B`, `BRK-B`) and
/// futures or FX codes (`GC=F`); nothing that could alter the request URL
pub fn is_ticker(symbol: &str) -> bool {
    !symbol.is_empty()
        && symbol.len() <= 20
        && symbol
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '^' | '.' | '-' | '=' | '_'))
}

#[async_trait]
impl MarketDataSource for YahooFinance {
    fn name(&self) -> &str {
        NAME
    }

    async fn history(&self, symbol: &str, range: HistoryRange) -> Result<PriceHistory> {
        if !is_ticker(symbol) {
            return Err(StrategistError::InvalidInput(format!("'{symbol}' is not a ticker symbol")));
        }
        let url = format!(
            "{}/v8/finance/chart/{symbol}",
            self.base_url.trim_end_matches('/')
        );
        let request = self
            .http
            .get(url)
            .query(&[("range", range.as_str()), ("interval", "1d")]);

        let body = match get_json(NAME, request).await {
            Err(StrategistError::UpstreamStatus { status: 404, .. }) => {
                return Err(StrategistError::no_data(NAME, symbol.to_string()));
            }
            other => other?,
        };
        parse_chart(symbol, &body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::economy::test_support::serve;
    use axum::{Json, Router, extract::Path, http::StatusCode, routing::get};
    use serde_json::json;

    fn chart(symbol: &str, closes: &[serde_json::Value]) -> serde_json::Value {
        let timestamps: Vec<i64> = (0..closes.len() as i64).map(|i| 1_700_000_000 + i * 86_400).collect();
        json!({"chart": {"result": [{
            "meta": {"symbol": symbol, "currency": "USD", "longName": "Test Corp"},
            "timestamp": timestamps,
            "indicators": {"quote": [{"close": closes}]}
        }], "error": null}})
    }

    #[test]
    fn drops_null_closes() {
        let body = chart("TST", &[json!(100.0), json!(null), json!(110.0)]);
        let history = parse_chart("TST", &body).unwrap();
        assert_eq!(history.closes, vec![100.0, 110.0]);
        assert_eq!(history.timestamps.len(), 2);
        assert_eq!(history.name.as_deref(), Some("Test Corp"));
        assert!((history.change_percent().unwrap() - 10.0).abs() < 1e-9);
        assert!((history.last_change_percent().unwrap() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn single_close_has_no_change() {
        let history = parse_chart("TST", &chart("TST", &[json!(5.0)])).unwrap();
        assert_eq!(history.latest(), Some(5.0));
        assert!(history.change_percent().is_none());
    }

    #[test]
    fn error_envelope_is_no_data() {
        let body = json!({"chart": {"result": null, "error": {"code": "Not Found", "description": "No data found"}}});
        assert!(matches!(parse_chart("BAD", &body), Err(StrategistError::NoData { .. })));
    }

    #[test]
    fn range_parsing() {
        assert_eq!("6MO".parse::<HistoryRange>().unwrap(), HistoryRange::SixMonths);
        assert!("2w".parse::<HistoryRange>().is_err());
    }

    #[tokio::test]
    async fn fetches_history_from_stub() {
        let router = Router::new().route(
            "/v8/finance/chart/{symbol}",
            get(|Path(symbol): Path<String>| async move {
                if symbol == "MISSING" {
                    return (StatusCode::NOT_FOUND, Json(json!({"chart": {"result": null}})));
                }
                (StatusCode::OK, Json(chart(&symbol, &[json!(50.0), json!(55.0)])))
            }),
        );
        let base = serve(router).await;
        let yahoo = YahooFinance::new(reqwest::Client::new(), base);

        let history = yahoo.history("^GSPC", HistoryRange::SixMonths).await.unwrap();
        assert_eq!(history.symbol, "^GSPC");
        assert_eq!(history.latest(), Some(55.0));

        let err = yahoo.history("MISSING", HistoryRange::OneMonth).await.unwrap_err();
        assert!(matches!(err, StrategistError::NoData { .. }));

        for symbol in ["AAPL?range=max", "../v7/quote", "AAPL#x", ""] {
            let err = yahoo.history(symbol, HistoryRange::OneMonth).await.unwrap_err();
            assert!(matches!(err, StrategistError::InvalidInput(_)), "{symbol}");
        }
    }

    #[test]
    fn ticker_shapes() {
        for ok in ["AAPL", "^GSPC", "BRK.B", "BRK-B", "GC=F", "RELIANCE.NS"] {
            assert!(is_ticker(ok), "{ok}");
        }
        for bad in ["AA PL", "A/B", "A?B", "A#B", "A%2F", "ÅAPL"] {
            assert!(!is_ticker(bad), "{bad}");
        }
    }
}

//! FRED (Federal Reserve Economic Data)
//!
//! United States only, and only when an API key is configured.

use async_trait::async_trait;

use super::{IndicatorKind, IndicatorSource, Observation, get_json, json_number};
use crate::country::Country;
use crate::error::{Result, StrategistError};

const NAME: &str = "FRED";

pub struct FredSource {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl FredSource {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            api_key,
        }
    }

    pub const fn series_id(kind: IndicatorKind) -> &'static str {
        match kind {
            IndicatorKind::InterestRate => "FEDFUNDS",
            IndicatorKind::Inflation => "FPCPITOTLZGUSA",
            IndicatorKind::GdpGrowth => "A191RL1Q225SBEA",
        }
    }
}

/// Newest real observation; FRED marks missing values with "."
fn parse_observations(body: &serde_json::Value) -> Result<(f64, Option<String>)> {
    let observations = body
        .get("observations")
        .and_then(serde_json::Value::as_array)
        .ok_or_else(|| {
            let detail = body
                .get("error_message")
                .and_then(serde_json::Value::as_str)
                .unwrap_or("missing observations");
            StrategistError::payload(NAME, detail)
        })?;

    observations
        .iter()
        .find_map(|obs| {
            let value = json_number(obs.get("value")?)?;
            let date = obs.get("date").and_then(serde_json::Value::as_str).map(str::to_string);
            Some((value, date))
        })
        .ok_or_else(|| StrategistError::no_data(NAME, "series"))
}

#[async_trait]
impl IndicatorSource for FredSource {
    fn name(&self) -> &str {
        NAME
    }

    fn supports(&self, _kind: IndicatorKind, country: Country) -> bool {
        country == Country::UnitedStates && self.api_key.is_some()
    }

    async fn fetch(&self, kind: IndicatorKind, country: Country) -> Result<Observation> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| StrategistError::Config("FRED_API_KEY is not set".into()))?;
        if country != Country::UnitedStates {
            return Err(StrategistError::no_data(NAME, format!("{kind} in {country}")));
        }

        let url = format!("{}/series/observations", self.base_url.trim_end_matches('/'));
        let request = self.http.get(url).query(&[
            ("series_id", Self::series_id(kind)),
            ("api_key", api_key),
            ("file_type", "json"),
            ("sort_order", "desc"),
            ("limit", "10"),
        ]);

        let body = get_json(NAME, request).await?;
        let (value, period) = parse_observations(&body)?;

        tracing::debug!(%kind, series = Self::series_id(kind), value, "FRED observation");
        Ok(Observation {
            value,
            period,
            source: NAME.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::economy::test_support::serve;
    use axum::{Json, Router, extract::Query, routing::get};
    use serde_json::json;
    use std::collections::HashMap;

    #[test]
    fn skips_placeholder_values() {
        let body = json!({"observations": [
            {"date": "2025-05-01", "value": "."},
            {"date": "2025-04-01", "value": "4.33"}
        ]});
        let (value, date) = parse_observations(&body).unwrap();
        assert!((value - 4.33).abs() < f64::EPSILON);
        assert_eq!(date.as_deref(), Some("2025-04-01"));
    }

    #[test]
    fn only_us_with_key() {
        let keyed = FredSource::new(reqwest::Client::new(), "http://x", Some("k".into()));
        let keyless = FredSource::new(reqwest::Client::new(), "http://x", None);
        assert!(keyed.supports(IndicatorKind::InterestRate, Country::UnitedStates));
        assert!(!keyed.supports(IndicatorKind::InterestRate, Country::Canada));
        assert!(!keyless.supports(IndicatorKind::InterestRate, Country::UnitedStates));
    }

    #[tokio::test]
    async fn fetches_series_with_key() {
        let router = Router::new().route(
            "/fred/series/observations",
            get(|Query(params): Query<HashMap<String, String>>| async move {
                let ok = params.get("series_id").map(String::as_str) == Some("FEDFUNDS")
                    && params.get("api_key").map(String::as_str) == Some("secret");
                if ok {
                    Json(json!({"observations": [{"date": "2025-04-01", "value": "4.33"}]}))
                } else {
                    Json(json!({"error_message": "bad request"}))
                }
            }),
        );
        let base = serve(router).await;
        let source = FredSource::new(reqwest::Client::new(), format!("{base}/fred"), Some("secret".into()));

        let obs = source
            .fetch(IndicatorKind::InterestRate, Country::UnitedStates)
            .await
            .unwrap();
        assert!((obs.value - 4.33).abs() < f64::EPSILON);
        assert_eq!(obs.period.as_deref(), Some("2025-04-01"));
    }
}

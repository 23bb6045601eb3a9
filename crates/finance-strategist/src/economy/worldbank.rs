//! World Bank indicators API
//!
//! `GET {base}/country/{iso2}/indicator/{code}?format=json&mrnev=1` answers
//! `[ {paging}, [ {"date": "2023", "value": 4.1, ...} ] ]`.

use async_trait::async_trait;

use super::{IndicatorKind, IndicatorSource, Observation, get_json, json_number};
use crate::country::Country;
use crate::error::{Result, StrategistError};

const NAME: &str = "World Bank";

pub struct WorldBankSource {
    http: reqwest::Client,
    base_url: String,
}

impl WorldBankSource {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    const fn indicator_code(kind: IndicatorKind) -> Option<&'static str> {
        match kind {
            IndicatorKind::Inflation => Some("FP.CPI.TOTL.ZG"),
            IndicatorKind::GdpGrowth => Some("NY.GDP.MKTP.KD.ZG"),
            IndicatorKind::InterestRate => None,
        }
    }
}

/// Most recent non-null value from a World Bank response
fn parse_response(body: &serde_json::Value) -> Result<(f64, Option<String>)> {
    let rows = body
        .get(1)
        .and_then(serde_json::Value::as_array)
        .ok_or_else(|| {
            // errors come back as `[{"message": [...]}]`
            let detail = body
                .pointer("/0/message/0/value")
                .and_then(serde_json::Value::as_str)
                .unwrap_or("missing data page");
            StrategistError::payload(NAME, detail)
        })?;

    rows.iter()
        .find_map(|row| {
            let value = json_number(row.get("value")?)?;
            let period = row.get("date").and_then(serde_json::Value::as_str).map(str::to_string);
            Some((value, period))
        })
        .ok_or_else(|| StrategistError::no_data(NAME, "requested indicator"))
}

#[async_trait]
impl IndicatorSource for WorldBankSource {
    fn name(&self) -> &str {
        NAME
    }

    fn supports(&self, kind: IndicatorKind, _country: Country) -> bool {
        Self::indicator_code(kind).is_some()
    }

    async fn fetch(&self, kind: IndicatorKind, country: Country) -> Result<Observation> {
        let code = Self::indicator_code(kind)
            .ok_or_else(|| StrategistError::no_data(NAME, kind.to_string()))?;
        let url = format!(
            "{}/country/{}/indicator/{code}",
            self.base_url.trim_end_matches('/'),
            country.iso2()
        );
        let request = self
            .http
            .get(url)
            .query(&[("format", "json"), ("mrnev", "1")]);

        let body = get_json(NAME, request).await?;
        let (value, period) = parse_response(&body)
            .map_err(|e| match e {
                StrategistError::NoData { .. } => {
                    StrategistError::no_data(NAME, format!("{kind} in {country}"))
                }
                other => other,
            })?;

        tracing::debug!(%kind, %country, value, "World Bank observation");
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
    use axum::{Json, Router, extract::Path, routing::get};
    use serde_json::json;

    #[test]
    fn skips_null_rows() {
        let body = json!([
            {"page": 1},
            [
                {"date": "2024", "value": null},
                {"date": "2023", "value": 4.116}
            ]
        ]);
        let (value, period) = parse_response(&body).unwrap();
        assert!((value - 4.116).abs() < f64::EPSILON);
        assert_eq!(period.as_deref(), Some("2023"));
    }

    #[test]
    fn error_envelope_is_a_payload_error() {
        let body = json!([{"message": [{"id": "120", "value": "Invalid value"}]}]);
        let err = parse_response(&body).unwrap_err();
        assert!(matches!(err, StrategistError::Payload { detail, .. } if detail == "Invalid value"));
    }

    #[test]
    fn interest_rate_is_not_offered() {
        let source = WorldBankSource::new(reqwest::Client::new(), "http://unused");
        assert!(!source.supports(IndicatorKind::InterestRate, Country::India));
        assert!(source.supports(IndicatorKind::GdpGrowth, Country::India));
    }

    #[tokio::test]
    async fn fetches_from_stub_api() {
        let router = Router::new().route(
            "/v2/country/{iso}/indicator/{code}",
            get(|Path((iso, code)): Path<(String, String)>| async move {
                assert_eq!(iso, "IN");
                assert_eq!(code, "FP.CPI.TOTL.ZG");
                Json(json!([{"page": 1}, [{"date": "2023", "value": 5.65}]]))
            }),
        );
        let base = serve(router).await;
        let source = WorldBankSource::new(reqwest::Client::new(), format!("{base}/v2"));

        let obs = source.fetch(IndicatorKind::Inflation, Country::India).await.unwrap();
        assert!((obs.value - 5.65).abs() < f64::EPSILON);
        assert_eq!(obs.source, "World Bank");
    }
}

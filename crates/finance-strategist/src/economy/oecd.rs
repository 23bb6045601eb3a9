//! OECD SDMX REST API
//!
//! Short-term interest rates and CPI growth as SDMX-JSON. Observations are
//! keyed by dimension indices; the time dimension's values carry the period.

use async_trait::async_trait;

use super::{IndicatorKind, IndicatorSource, Observation, get_json, json_number};
use crate::country::Country;
use crate::error::{Result, StrategistError};

const NAME: &str = "OECD";
const SDMX_JSON: &str = "application/vnd.sdmx.data+json; charset=utf-8; version=2.0";

pub struct OecdSource {
    http: reqwest::Client,
    base_url: String,
}

impl OecdSource {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    /// Dataflow and series key for an indicator
    fn query(kind: IndicatorKind, country: Country) -> Option<(&'static str, String)> {
        let iso3 = country.iso3();
        match kind {
            IndicatorKind::InterestRate => Some((
                "OECD.SDD.STES,DSD_STES@DF_FINMARK,4.0",
                format!("{iso3}.M.IR3TIB.PA......"),
            )),
            IndicatorKind::Inflation => Some((
                "OECD.SDD.TPS,DSD_PRICES@DF_PRICES_ALL,1.0",
                format!("{iso3}.M.N.CPI.PA._T.N.GY"),
            )),
            IndicatorKind::GdpGrowth => None,
        }
    }
}

/// Latest observation in an SDMX-JSON message
///
/// Handles both the flat `observations` layout and the `series` layout.
fn parse_sdmx(body: &serde_json::Value) -> Result<(f64, Option<String>)> {
    let data = body.get("data").unwrap_or(body);
    let data_set = data
        .pointer("/dataSets/0")
        .ok_or_else(|| StrategistError::payload(NAME, "no dataSets"))?;

    // (time index, value) pairs
    let mut points: Vec<(usize, f64)> = Vec::new();
    let mut collect = |observations: &serde_json::Map<String, serde_json::Value>| {
        for (key, obs) in observations {
            let time_index = key.rsplit(':').next().and_then(|i| i.parse().ok());
            let value = obs.get(0).and_then(json_number);
            if let (Some(t), Some(v)) = (time_index, value) {
                points.push((t, v));
            }
        }
    };

    if let Some(flat) = data_set.get("observations").and_then(serde_json::Value::as_object) {
        collect(flat);
    }
    if let Some(series) = data_set.get("series").and_then(serde_json::Value::as_object) {
        for entry in series.values() {
            if let Some(obs) = entry.get("observations").and_then(serde_json::Value::as_object) {
                collect(obs);
            }
        }
    }

    let (time_index, value) = points
        .into_iter()
        .max_by_key(|(t, _)| *t)
        .ok_or_else(|| StrategistError::no_data(NAME, "series"))?;

    let structure = data
        .pointer("/structures/0")
        .or_else(|| data.get("structure"))
        .or_else(|| body.get("structure"));
    let period = structure
        .and_then(|s| s.pointer("/dimensions/observation"))
        .and_then(serde_json::Value::as_array)
        .and_then(|dims| {
            dims.iter()
                .find(|d| d.get("id").and_then(serde_json::Value::as_str) == Some("TIME_PERIOD"))
        })
        .and_then(|d| d.get("values")?.get(time_index)?.get("id")?.as_str())
        .map(str::to_string);

    Ok((value, period))
}

#[async_trait]
impl IndicatorSource for OecdSource {
    fn name(&self) -> &str {
        NAME
    }

    fn supports(&self, kind: IndicatorKind, _country: Country) -> bool {
        kind != IndicatorKind::GdpGrowth
    }

    async fn fetch(&self, kind: IndicatorKind, country: Country) -> Result<Observation> {
        let (dataflow, key) = Self::query(kind, country)
            .ok_or_else(|| StrategistError::no_data(NAME, kind.to_string()))?;
        let url = format!("{}/data/{dataflow}/{key}", self.base_url.trim_end_matches('/'));
        let request = self
            .http
            .get(url)
            .header(reqwest::header::ACCEPT, SDMX_JSON)
            .query(&[("lastNObservations", "1"), ("dimensionAtObservation", "AllDimensions")]);

        let body = get_json(NAME, request).await?;
        let (value, period) = parse_sdmx(&body)?;

        tracing::debug!(%kind, %country, value, ?period, "OECD observation");
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
    use axum::{Json, Router, routing::get};
    use serde_json::json;

    fn flat_message() -> serde_json::Value {
        json!({
            "data": {
                "dataSets": [{
                    "observations": {
                        "0:0:0:0:0:0:0:0:0:0": [3.21],
                        "0:0:0:0:0:0:0:0:0:1": ["3.05"]
                    }
                }],
                "structures": [{
                    "dimensions": {
                        "observation": [
                            {"id": "REF_AREA", "values": [{"id": "GBR"}]},
                            {"id": "TIME_PERIOD", "values": [{"id": "2025-03"}, {"id": "2025-04"}]}
                        ]
                    }
                }]
            }
        })
    }

    #[test]
    fn picks_latest_flat_observation() {
        let (value, period) = parse_sdmx(&flat_message()).unwrap();
        assert!((value - 3.05).abs() < f64::EPSILON);
        assert_eq!(period.as_deref(), Some("2025-04"));
    }

    #[test]
    fn reads_series_layout() {
        let body = json!({
            "data": {
                "dataSets": [{"series": {"0:0:0": {"observations": {"0": [2.4]}}}}],
                "structures": [{"dimensions": {"observation": [
                    {"id": "TIME_PERIOD", "values": [{"id": "2025-02"}]}
                ]}}]
            }
        });
        let (value, period) = parse_sdmx(&body).unwrap();
        assert!((value - 2.4).abs() < f64::EPSILON);
        assert_eq!(period.as_deref(), Some("2025-02"));
    }

    #[test]
    fn empty_dataset_is_no_data() {
        let body = json!({"data": {"dataSets": [{"observations": {}}]}});
        assert!(matches!(parse_sdmx(&body), Err(StrategistError::NoData { .. })));
    }

    #[tokio::test]
    async fn fetches_interest_rate_from_stub() {
        let router = Router::new().route(
            "/public/rest/data/{flow}/{key}",
            get(|| async { Json(flat_message()) }),
        );
        let base = serve(router).await;
        let source = OecdSource::new(reqwest::Client::new(), format!("{base}/public/rest"));

        let obs = source
            .fetch(IndicatorKind::InterestRate, Country::UnitedKingdom)
            .await
            .unwrap();
        assert_eq!(obs.source, "OECD");
        assert_eq!(obs.period.as_deref(), Some("2025-04"));
    }
}

//! Mock Data Sources
//!
//! For tests and offline demos. Canned indicator values and synthetic price
//! series; anything not configured fails like an unreachable API.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use super::{
    HistoryRange, IndicatorKind, IndicatorSource, MarketDataSource, Observation, PriceHistory,
};
use crate::country::Country;
use crate::error::{Result, StrategistError};

/// Indicator source answering from a fixed table
pub struct MockIndicatorSource {
    name: String,
    values: HashMap<(IndicatorKind, Country), f64>,
    calls: Mutex<Vec<(IndicatorKind, Country)>>,
}

impl MockIndicatorSource {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: HashMap::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_value(mut self, kind: IndicatorKind, country: Country, value: f64) -> Self {
        self.values.insert((kind, country), value);
        self
    }

    /// Requests received so far
    pub fn calls(&self) -> Vec<(IndicatorKind, Country)> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl IndicatorSource for MockIndicatorSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn supports(&self, _kind: IndicatorKind, _country: Country) -> bool {
        true
    }

    async fn fetch(&self, kind: IndicatorKind, country: Country) -> Result<Observation> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push((kind, country));
        }
        self.values
            .get(&(kind, country))
            .map(|&value| Observation {
                value,
                period: Some("2024".into()),
                source: self.name.clone(),
            })
            .ok_or_else(|| StrategistError::UpstreamStatus {
                source_name: self.name.clone(),
                status: 503,
            })
    }
}

/// Market data with linear synthetic histories
#[derive(Default)]
pub struct MockMarketData {
    /// symbol -> (start, end) price over the requested range
    series: HashMap<String, (f64, f64)>,
    names: HashMap<String, String>,
}

impl MockMarketData {
    pub fn new() -> Self {
        Self::default()
    }

    /// A symbol moving from `start` to `end`
    pub fn with_series(mut self, symbol: &str, start: f64, end: f64) -> Self {
        self.series.insert(symbol.to_string(), (start, end));
        self
    }

    pub fn with_name(mut self, symbol: &str, name: &str) -> Self {
        self.names.insert(symbol.to_string(), name.to_string());
        self
    }
}

#[async_trait]
impl MarketDataSource for MockMarketData {
    fn name(&self) -> &str {
        "MockMarket"
    }

    async fn history(&self, symbol: &str, _range: HistoryRange) -> Result<PriceHistory> {
        let &(start, end) = self
            .series
            .get(symbol)
            .ok_or_else(|| StrategistError::no_data("MockMarket", symbol.to_string()))?;

        let steps: i32 = 5;
        let closes: Vec<f64> = (0..=steps)
            .map(|i| start + (end - start) * f64::from(i) / f64::from(steps))
            .collect();
        let timestamps = (0..=i64::from(steps)).map(|i| 1_700_000_000 + i * 86_400).collect();

        Ok(PriceHistory {
            symbol: symbol.to_string(),
            name: self.names.get(symbol).cloned(),
            currency: Some("USD".into()),
            timestamps,
            closes,
        })
    }
}

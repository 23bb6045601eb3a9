//! Central-bank policy rates
//!
//! Last resort for the interest-rate chain. Values are hand-maintained and
//! carry the month they were last checked.

use async_trait::async_trait;
use serde::Serialize;

use super::{IndicatorKind, IndicatorSource, Observation};
use crate::country::Country;
use crate::error::{Result, StrategistError};

const NAME: &str = "Central bank policy rate";

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct PolicyRate {
    pub rate_percent: f64,
    pub as_of: &'static str,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct PolicyRateTable;

impl PolicyRateTable {
    pub const fn lookup(country: Country) -> Option<PolicyRate> {
        let (rate_percent, as_of) = match country {
            Country::UnitedStates => (4.5, "May 2025"),
            Country::Canada => (2.75, "April 2025"),
            Country::UnitedKingdom => (4.25, "May 2025"),
            Country::France => (3.5, "May 2025"),
            Country::Germany => (3.3, "May 2025"),
            Country::Italy => (4.0, "May 2025"),
            Country::Japan => (0.5, "May 2025"),
            Country::India => (6.0, "April 2025"),
            _ => return None,
        };
        Some(PolicyRate { rate_percent, as_of })
    }
}

#[async_trait]
impl IndicatorSource for PolicyRateTable {
    fn name(&self) -> &str {
        NAME
    }

    fn supports(&self, kind: IndicatorKind, country: Country) -> bool {
        kind == IndicatorKind::InterestRate && Self::lookup(country).is_some()
    }

    async fn fetch(&self, kind: IndicatorKind, country: Country) -> Result<Observation> {
        match (kind, Self::lookup(country)) {
            (IndicatorKind::InterestRate, Some(rate)) => Ok(Observation {
                value: rate.rate_percent,
                period: Some(rate.as_of.to_string()),
                source: NAME.to_string(),
            }),
            _ => Err(StrategistError::no_data(NAME, format!("{kind} in {country}"))),
        }
    }
}

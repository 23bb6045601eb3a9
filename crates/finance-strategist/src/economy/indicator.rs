//! Indicator values and the per-country bundle

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};

/// Sentinel shown wherever a figure could not be fetched
pub const UNAVAILABLE: &str = "Unavailable";

/// A figure that is either known or explicitly unavailable
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Indicator {
    Value(f64),
    #[default]
    Unavailable,
}

impl Indicator {
    /// Round to two decimals; non-finite inputs become unavailable
    pub fn rounded(value: f64) -> Self {
        if value.is_finite() {
            Self::Value((value * 100.0).round() / 100.0)
        } else {
            Self::Unavailable
        }
    }

    pub const fn value(self) -> Option<f64> {
        match self {
            Self::Value(v) => Some(v),
            Self::Unavailable => None,
        }
    }

    pub const fn is_available(self) -> bool {
        matches!(self, Self::Value(_))
    }

    /// Display with a unit suffix, e.g. `3.25%`
    pub fn with_unit(self, unit: &str) -> String {
        match self {
            Self::Value(v) => format!("{v:.2}{unit}"),
            Self::Unavailable => UNAVAILABLE.to_string(),
        }
    }
}

impl fmt::Display for Indicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(v) => write!(f, "{v:.2}"),
            Self::Unavailable => f.write_str(UNAVAILABLE),
        }
    }
}

impl From<Option<f64>> for Indicator {
    fn from(value: Option<f64>) -> Self {
        value.map_or(Self::Unavailable, Self::rounded)
    }
}

impl Serialize for Indicator {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Value(v) => serializer.serialize_f64(*v),
            Self::Unavailable => serializer.serialize_str(UNAVAILABLE),
        }
    }
}

impl<'de> Deserialize<'de> for Indicator {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct IndicatorVisitor;

        impl Visitor<'_> for IndicatorVisitor {
            type Value = Indicator;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a number, a numeric string, null or \"Unavailable\"")
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Indicator, E> {
                Ok(Indicator::rounded(v))
            }

            #[allow(clippy::cast_precision_loss)]
            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Indicator, E> {
                Ok(Indicator::rounded(v as f64))
            }

            #[allow(clippy::cast_precision_loss)]
            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Indicator, E> {
                Ok(Indicator::rounded(v as f64))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Indicator, E> {
                let trimmed = v.trim().trim_end_matches('%');
                if trimmed.eq_ignore_ascii_case(UNAVAILABLE) || trimmed.is_empty() {
                    return Ok(Indicator::Unavailable);
                }
                trimmed
                    .parse::<f64>()
                    .map(Indicator::rounded)
                    .map_err(|_| E::invalid_value(de::Unexpected::Str(v), &self))
            }

            fn visit_unit<E: de::Error>(self) -> Result<Indicator, E> {
                Ok(Indicator::Unavailable)
            }

            fn visit_none<E: de::Error>(self) -> Result<Indicator, E> {
                Ok(Indicator::Unavailable)
            }
        }

        deserializer.deserialize_any(IndicatorVisitor)
    }
}

/// Direction of the local equity market
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketTrend {
    Bullish,
    Neutral,
    Bearish,
    Unknown,
}

impl MarketTrend {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bullish => "bullish",
            Self::Neutral => "neutral",
            Self::Bearish => "bearish",
            Self::Unknown => "unknown",
        }
    }

    /// Classify a six-month benchmark change in percent
    pub fn from_sentiment(sentiment: Indicator) -> Self {
        match sentiment.value() {
            Some(v) if v > 5.0 => Self::Bullish,
            Some(v) if v < -5.0 => Self::Bearish,
            Some(_) => Self::Neutral,
            None => Self::Unknown,
        }
    }
}

/// Where one indicator value came from
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provenance {
    pub source: String,
    pub period: Option<String>,
}

/// Inflation, interest rate, GDP growth and sentiment for one country
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct IndicatorBundle {
    pub country: String,
    pub country_code: Option<String>,
    /// Consumer price inflation, percent per year
    pub inflation_rate: Indicator,
    /// Policy or short-term interest rate, percent
    pub interest_rate: Indicator,
    /// Real GDP growth, percent per year
    pub gdp_growth: Indicator,
    /// Six-month change of the benchmark index, percent
    pub market_sentiment: Indicator,
    pub market_trend: MarketTrend,
    #[serde(default)]
    pub provenance: BTreeMap<String, Provenance>,
    pub fetched_at: DateTime<Utc>,
}

impl IndicatorBundle {
    /// Everything unavailable, e.g. for a country we cannot resolve
    pub fn unavailable(country: impl Into<String>) -> Self {
        Self {
            country: country.into(),
            country_code: None,
            inflation_rate: Indicator::Unavailable,
            interest_rate: Indicator::Unavailable,
            gdp_growth: Indicator::Unavailable,
            market_sentiment: Indicator::Unavailable,
            market_trend: MarketTrend::Unknown,
            provenance: BTreeMap::new(),
            fetched_at: Utc::now(),
        }
    }

    pub fn available_count(&self) -> usize {
        [
            self.inflation_rate,
            self.interest_rate,
            self.gdp_growth,
            self.market_sentiment,
        ]
        .into_iter()
        .filter(|i| i.is_available())
        .count()
    }

    pub fn any_available(&self) -> bool {
        self.available_count() > 0
    }

    /// Markdown lines for prompts and the fallback document
    pub fn to_markdown(&self) -> String {
        let source = |key: &str| {
            self.provenance.get(key).map_or(String::new(), |p| match &p.period {
                Some(period) => format!(" ({}, {period})", p.source),
                None => format!(" ({})", p.source),
            })
        };

        let gdp_outlook = match self.gdp_growth.value() {
            Some(g) if g > 2.0 => " - positive growth",
            Some(g) if g > 0.0 => " - moderate growth",
            Some(_) => " - economic challenges",
            None => "",
        };

        format!(
            "- Inflation Rate: {}{}\n- Interest Rate: {}{}\n- GDP Growth: {}{}{}\n- Market Sentiment (6-month benchmark change): {}{}\n- Market Trend: {}\n",
            self.inflation_rate.with_unit("%"),
            source("inflation_rate"),
            self.interest_rate.with_unit("%"),
            source("interest_rate"),
            self.gdp_growth.with_unit("%"),
            source("gdp_growth"),
            gdp_outlook,
            self.market_sentiment.with_unit("%"),
            source("market_sentiment"),
            self.market_trend.as_str(),
        )
    }
}

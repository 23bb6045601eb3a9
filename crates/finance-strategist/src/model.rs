//! Domain Models
//!
//! The questionnaire profile, the metrics derived from it and the report
//! returned to callers. Uses `rust_decimal` for all monetary values.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal_macros::dec;
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::economy::IndicatorBundle;
use crate::error::{Result, StrategistError};

/// Age group collected by the questionnaire
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawAge")]
pub enum AgeBand {
    #[serde(rename = "20s")]
    Twenties,
    #[serde(rename = "30s")]
    Thirties,
    #[serde(rename = "40s")]
    Forties,
    #[serde(rename = "50s+")]
    FiftiesPlus,
}

impl AgeBand {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Twenties => "20s",
            Self::Thirties => "30s",
            Self::Forties => "40s",
            Self::FiftiesPlus => "50s+",
        }
    }

    /// Band containing a given age; anyone under 20 lands in the first band
    pub const fn from_age(age: u32) -> Self {
        match age {
            0..30 => Self::Twenties,
            30..40 => Self::Thirties,
            40..50 => Self::Forties,
            _ => Self::FiftiesPlus,
        }
    }

    pub const fn life_stage(self) -> LifeStage {
        match self {
            Self::Twenties => LifeStage::EarlyCareer,
            Self::Thirties => LifeStage::Establishing,
            Self::Forties => LifeStage::PeakEarning,
            Self::FiftiesPlus => LifeStage::PreRetirement,
        }
    }
}

impl fmt::Display for AgeBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for AgeBand {
    type Err = StrategistError;

    /// Accepts decade labels ("30s", "50s+", "60s") and bare ages ("35")
    fn from_str(s: &str) -> Result<Self> {
        let cleaned = s.trim().trim_end_matches('+').to_lowercase();
        let digits: String = cleaned.chars().take_while(char::is_ascii_digit).collect();
        digits
            .parse::<u32>()
            .map(Self::from_age)
            .map_err(|_| StrategistError::InvalidInput(format!("unrecognised age group '{s}'")))
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawAge {
    Age(u32),
    Label(String),
}

impl TryFrom<RawAge> for AgeBand {
    type Error = StrategistError;

    fn try_from(raw: RawAge) -> Result<Self> {
        match raw {
            RawAge::Age(age) => Ok(Self::from_age(age)),
            RawAge::Label(label) => label.parse(),
        }
    }
}

/// Self-reported appetite for risk
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum RiskTolerance {
    Conservative,
    Moderate,
    Aggressive,
}

impl RiskTolerance {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Conservative => "Conservative",
            Self::Moderate => "Moderate",
            Self::Aggressive => "Aggressive",
        }
    }
}

impl fmt::Display for RiskTolerance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for RiskTolerance {
    type Err = StrategistError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "conservative" | "low" => Ok(Self::Conservative),
            "moderate" | "medium" | "balanced" => Ok(Self::Moderate),
            "aggressive" | "high" => Ok(Self::Aggressive),
            _ => Err(StrategistError::InvalidInput(format!(
                "risk profile must be Conservative, Moderate or Aggressive, got '{s}'"
            ))),
        }
    }
}

impl TryFrom<String> for RiskTolerance {
    type Error = StrategistError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

/// Questionnaire answers
///
/// Every field is optional. Income and expenses are monthly figures.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UserProfile {
    pub age_group: Option<AgeBand>,

    #[serde(alias = "income_monthly", deserialize_with = "deserialize_money")]
    pub income: Option<Decimal>,

    #[serde(alias = "expenses_monthly", deserialize_with = "deserialize_money")]
    pub expenses: Option<Decimal>,

    #[serde(deserialize_with = "deserialize_money")]
    pub current_assets: Option<Decimal>,

    #[serde(deserialize_with = "deserialize_money")]
    pub current_liabilities: Option<Decimal>,

    #[serde(alias = "risk_tolerance")]
    pub risk_profile: Option<RiskTolerance>,

    pub goal: Option<String>,

    #[serde(alias = "goal_timeframe", alias = "horizon")]
    pub timeframe: Option<String>,

    pub country: Option<String>,
}

/// Largest monetary amount accepted anywhere in a profile or tax query
pub const MAX_AMOUNT: Decimal = dec!(1000000000000);

impl UserProfile {
    /// Check the profile, returning soft warnings on success
    pub fn validate(&self) -> Result<Vec<String>> {
        let mut problems = Vec::new();
        let mut warnings = Vec::new();

        if let Some(income) = self.income {
            if income <= Decimal::ZERO {
                problems.push("Monthly income must be greater than zero.".to_string());
            }
        } else {
            warnings.push("Monthly income was not provided; cash-flow figures are omitted.".to_string());
        }

        for (label, value) in [
            ("Monthly expenses", self.expenses),
            ("Current assets", self.current_assets),
            ("Current liabilities", self.current_liabilities),
        ] {
            if value.is_some_and(|v| v < Decimal::ZERO) {
                problems.push(format!("{label} cannot be negative."));
            }
        }

        for (label, value) in [
            ("Monthly income", self.income),
            ("Monthly expenses", self.expenses),
            ("Current assets", self.current_assets),
            ("Current liabilities", self.current_liabilities),
        ] {
            if value.is_some_and(|v| v > MAX_AMOUNT) {
                problems.push(format!(
                    "{label} is above the supported maximum of {}.",
                    format_money(MAX_AMOUNT, "")
                ));
            }
        }

        if !problems.is_empty() {
            return Err(StrategistError::Validation(problems));
        }

        if let (Some(income), Some(expenses)) = (self.income, self.expenses) {
            if expenses >= income {
                warnings.push(
                    "Monthly expenses meet or exceed income; focus on budgeting before investing."
                        .to_string(),
                );
            }
        }

        Ok(warnings)
    }

    /// Fill gaps in `self` from `other`
    pub fn merge_missing(&mut self, other: Self) {
        self.age_group = self.age_group.or(other.age_group);
        self.income = self.income.or(other.income);
        self.expenses = self.expenses.or(other.expenses);
        self.current_assets = self.current_assets.or(other.current_assets);
        self.current_liabilities = self.current_liabilities.or(other.current_liabilities);
        self.risk_profile = self.risk_profile.or(other.risk_profile);
        if self.goal.is_none() {
            self.goal = other.goal;
        }
        if self.timeframe.is_none() {
            self.timeframe = other.timeframe;
        }
        if self.country.is_none() {
            self.country = other.country;
        }
    }
}

/// Parse a money amount such as `6000`, `"$6,000"`, `"72k"` or `"₹1,20,000"`
pub fn parse_money(text: &str) -> Result<Decimal> {
    let compact: String = text
        .trim()
        .chars()
        .filter(|c| !matches!(c, ',' | ' ' | '_'))
        .collect();
    // drop currency symbols and codes in front of the number
    let compact = compact.trim_start_matches(|c: char| !(c.is_ascii_digit() || c == '-' || c == '.'));

    let (number, multiplier) = match compact.chars().last() {
        Some('k' | 'K') => (&compact[..compact.len() - 1], dec!(1000)),
        Some('m' | 'M') => (&compact[..compact.len() - 1], dec!(1000000)),
        _ => (compact, Decimal::ONE),
    };

    let amount = Decimal::from_str(number)
        .map_err(|_| StrategistError::InvalidInput(format!("'{text}' is not an amount")))?;
    amount
        .checked_mul(multiplier)
        .filter(|a| a.abs() <= MAX_AMOUNT)
        .ok_or_else(|| {
            StrategistError::InvalidInput(format!(
                "'{text}' is above the supported maximum of {}",
                format_money(MAX_AMOUNT, "")
            ))
        })
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawMoney {
    Number(f64),
    Text(String),
}

fn deserialize_money<'de, D>(deserializer: D) -> std::result::Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match Option::<RawMoney>::deserialize(deserializer)? {
        None => Ok(None),
        Some(RawMoney::Number(n)) => Decimal::from_f64(n)
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("{n} is not a representable amount"))),
        Some(RawMoney::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(RawMoney::Text(s)) => parse_money(&s).map(Some).map_err(D::Error::custom),
    }
}

/// Format an amount with thousands separators and no decimals
pub fn format_money(amount: Decimal, symbol: &str) -> String {
    let rounded = amount.round();
    let digits = rounded.abs().trunc().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };
    format!("{sign}{symbol}{grouped}")
}

/// Broad phase of life inferred from age
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifeStage {
    EarlyCareer,
    Establishing,
    PeakEarning,
    PreRetirement,
}

impl LifeStage {
    pub const fn description(self) -> &'static str {
        match self {
            Self::EarlyCareer => "early career: long runway, income growth ahead",
            Self::Establishing => "establishing: family, housing and career commitments",
            Self::PeakEarning => "peak earning: highest capacity to save",
            Self::PreRetirement => "pre-retirement: protecting accumulated wealth",
        }
    }
}

/// How far away the goal is
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanningHorizon {
    /// Under three years
    Short,
    /// Three to seven years
    Medium,
    /// Beyond seven years
    Long,
}

impl PlanningHorizon {
    pub const fn from_years(years: f64) -> Self {
        if years < 3.0 {
            Self::Short
        } else if years <= 7.0 {
            Self::Medium
        } else {
            Self::Long
        }
    }

    /// Interpret free text like "5 years", "18 months", "3-5 yrs" or "retirement"
    pub fn parse(text: &str) -> Option<Self> {
        let lower = text.to_lowercase();

        let numbers: Vec<f64> = lower
            .split(|c: char| !(c.is_ascii_digit() || c == '.'))
            .filter_map(|part| part.parse().ok())
            .collect();

        if let Some(max) = numbers.into_iter().reduce(f64::max) {
            let years = if lower.contains("month") { max / 12.0 } else { max };
            return Some(Self::from_years(years));
        }

        if lower.contains("short") {
            Some(Self::Short)
        } else if lower.contains("medium") || lower.contains("mid") {
            Some(Self::Medium)
        } else if lower.contains("long") || lower.contains("retire") {
            Some(Self::Long)
        } else {
            None
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Short => "short term (under 3 years)",
            Self::Medium => "medium term (3-7 years)",
            Self::Long => "long term (over 7 years)",
        }
    }
}

/// How much of the portfolio must stay readily available
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LiquidityNeed {
    High,
    Moderate,
    Low,
}

/// Deterministic metrics derived from a profile
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FinancialSnapshot {
    pub life_stage: Option<LifeStage>,
    pub monthly_surplus: Option<Decimal>,
    /// Percent of income left after expenses
    pub savings_rate: Option<Decimal>,
    pub suggested_monthly_investment: Option<Decimal>,
    pub net_worth: Decimal,
    pub horizon: Option<PlanningHorizon>,
    pub liquidity_need: LiquidityNeed,
    /// Months of expenses covered by net worth
    pub emergency_months: Option<Decimal>,
}

/// Reader sophistication, used to pitch the advice
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LiteracyLevel {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

impl LiteracyLevel {
    pub const fn guidance(self) -> &'static str {
        match self {
            Self::Beginner => "Explain every term in plain language and keep steps concrete.",
            Self::Intermediate => "Assume familiarity with funds and accounts; focus on optimisation.",
            Self::Advanced => "Be concise and technical; discuss tax brackets and asset-class trade-offs.",
        }
    }
}

/// Whether the strategy came from the LLM or the rule-based fallback
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyStatus {
    Success,
    Basic,
}

/// Final document returned to callers
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StrategyReport {
    pub request_id: Uuid,
    /// Markdown document including the footer
    pub strategy: String,
    pub strategy_html: String,
    pub status: StrategyStatus,
    pub processing_time_secs: f64,
    pub profile: UserProfile,
    pub snapshot: FinancialSnapshot,
    pub literacy_level: Option<LiteracyLevel>,
    pub indicators: IndicatorBundle,
    pub economic_data_included: bool,
    pub bullish_analysis_included: bool,
    pub gdp_growth_rate: Option<f64>,
    pub warnings: Vec<String>,
    pub generated_at: DateTime<Utc>,
}

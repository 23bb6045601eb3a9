//! Questionnaire Form
//!
//! Raw field values and the checks run before anything is sent.

use serde_json::{Value, json};

pub const AGE_GROUPS: [&str; 4] = ["20s", "30s", "40s", "50s+"];
pub const RISK_PROFILES: [&str; 3] = ["Conservative", "Moderate", "Aggressive"];
pub const COUNTRIES: [&str; 16] = [
    "United States",
    "Canada",
    "United Kingdom",
    "France",
    "Germany",
    "Italy",
    "Japan",
    "India",
    "China",
    "Brazil",
    "Australia",
    "South Korea",
    "Mexico",
    "Netherlands",
    "Spain",
    "Switzerland",
];

#[derive(Clone, Debug, Default, PartialEq)]
pub struct QuestionnaireForm {
    pub age_group: String,
    pub country: String,
    pub income: String,
    pub expenses: String,
    pub assets: String,
    pub liabilities: String,
    pub risk_profile: String,
    pub goal: String,
    pub timeframe: String,
}

/// Outcome of the client-side checks
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FormCheck {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl FormCheck {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Read an amount typed as `6000`, `$6,000`, `6 000` or `6k`
pub fn parse_amount(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    let (number, multiplier) = match trimmed.chars().last() {
        Some('k' | 'K') => (&trimmed[..trimmed.len() - 1], 1_000.0),
        Some('m' | 'M') => (&trimmed[..trimmed.len() - 1], 1_000_000.0),
        _ => (trimmed, 1.0),
    };
    let cleaned: String = number
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '.' | '-'))
        .collect();
    cleaned
        .parse::<f64>()
        .ok()
        .map(|v| v * multiplier)
        .filter(|v| v.is_finite())
}

impl QuestionnaireForm {
    pub fn check(&self) -> FormCheck {
        let mut check = FormCheck::default();

        let required = [
            ("age group", &self.age_group),
            ("country", &self.country),
            ("monthly income", &self.income),
            ("monthly expenses", &self.expenses),
            ("risk tolerance", &self.risk_profile),
            ("investment goal", &self.goal),
            ("timeframe", &self.timeframe),
        ];
        let missing: Vec<&str> = required
            .iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(label, _)| *label)
            .collect();
        if !missing.is_empty() {
            check
                .errors
                .push(format!("Please fill in: {}.", missing.join(", ")));
        }

        let income = parse_amount(&self.income);
        let expenses = parse_amount(&self.expenses);

        if !self.income.trim().is_empty() && !income.is_some_and(|i| i > 0.0) {
            check.errors.push("Monthly income must be a number greater than zero.".into());
        }
        if !self.expenses.trim().is_empty() && !expenses.is_some_and(|e| e >= 0.0) {
            check.errors.push("Monthly expenses must be zero or more.".into());
        }
        for (label, value) in [("Current assets", &self.assets), ("Current liabilities", &self.liabilities)] {
            if !value.trim().is_empty() && !parse_amount(value).is_some_and(|v| v >= 0.0) {
                check.errors.push(format!("{label} must be zero or more."));
            }
        }

        if let (Some(i), Some(e)) = (income, expenses) {
            if i > 0.0 && e >= i {
                check.warnings.push(
                    "Your expenses meet or exceed your income. The strategy will focus on budgeting first."
                        .into(),
                );
            }
        }

        check
    }

    /// Request body for `POST /strategy`
    pub fn to_payload(&self) -> Value {
        let amount = |text: &str| parse_amount(text).map_or(Value::Null, Value::from);
        let text = |value: &str| {
            let value = value.trim();
            if value.is_empty() { Value::Null } else { Value::from(value) }
        };

        json!({
            "profile": {
                "age_group": text(&self.age_group),
                "country": text(&self.country),
                "income": amount(&self.income),
                "expenses": amount(&self.expenses),
                "current_assets": amount(&self.assets),
                "current_liabilities": amount(&self.liabilities),
                "risk_profile": text(&self.risk_profile),
                "goal": text(&self.goal),
                "timeframe": text(&self.timeframe),
            }
        })
    }
}

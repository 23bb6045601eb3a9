//! Investment Strategy
//!
//! Everything between a validated profile and the final document: derived
//! metrics, tax context, the LLM prompts, the rule-based fallback and the
//! markdown/HTML rendering.

mod allocation;
mod document;
mod profiler;
mod prompts;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

pub use allocation::{AssetAllocation, RuleBasedStrategy};
pub use document::{append_footer, render_html, strategy_markdown};
pub use profiler::Profiler;
pub use prompts::{LiteracyAssessment, StrategyAgents, lenient_profile, strategy_request};

use crate::country::CountryRef;
use crate::economy::{IndicatorBundle, MarketOverview};
use crate::model::{FinancialSnapshot, LiteracyLevel, UserProfile, format_money};
use crate::tax::{TaxEstimate, estimate_tax, financial_info_text, tax_strategies};

/// Realised gains assumed for the tax estimate, as a share of annual surplus
const ASSUMED_GAINS_SHARE: Decimal = dec!(0.1);

/// Country tax notes plus an estimate for this profile
#[derive(Clone, Debug)]
pub struct TaxContext {
    /// Markdown bullets, or a limited-information note
    pub info: String,
    pub strategies: Vec<String>,
    pub estimate: Option<TaxEstimate>,
}

impl TaxContext {
    pub fn build(country: &CountryRef, profile: &UserProfile, snapshot: &FinancialSnapshot) -> Self {
        let strategies = country
            .known()
            .map(|c| tax_strategies(c).iter().map(|s| (*s).to_string()).collect())
            .unwrap_or_default();

        let estimate = country
            .known()
            .filter(|c| c.has_tax_rules())
            .zip(profile.income.and_then(|income| income.checked_mul(dec!(12))))
            .and_then(|(c, annual_income)| {
                let gains = snapshot
                    .annual_surplus()
                    .map_or(Decimal::ZERO, |s| (s * ASSUMED_GAINS_SHARE).max(Decimal::ZERO));
                estimate_tax(c, annual_income, gains)
                    .inspect_err(|e| tracing::warn!(country = %c, "tax estimate failed: {e}"))
                    .ok()
            });

        Self {
            info: financial_info_text(country),
            strategies,
            estimate,
        }
    }

    pub fn to_markdown(&self) -> String {
        let mut out = self.info.clone();
        if !self.strategies.is_empty() {
            out.push_str("\nTax-efficient strategies:\n");
            for s in &self.strategies {
                out.push_str(&format!("- {s}\n"));
            }
        }
        if let Some(est) = &self.estimate {
            let symbol = est.country.currency_symbol();
            out.push_str(&format!(
                "\nEstimated annual tax: {} income tax + {} on gains = {} total ({}% effective rate)\n",
                format_money(est.income_tax, symbol),
                format_money(est.capital_gains_tax, symbol),
                format_money(est.total_tax, symbol),
                est.effective_rate.round_dp(1),
            ));
        }
        out
    }
}

/// All the inputs gathered for one strategy document
#[derive(Clone, Debug)]
pub struct StrategyContext {
    pub profile: UserProfile,
    pub country: CountryRef,
    pub snapshot: FinancialSnapshot,
    pub literacy: Option<LiteracyLevel>,
    pub indicators: IndicatorBundle,
    pub market: MarketOverview,
    pub tax: TaxContext,
    pub warnings: Vec<String>,
}

impl StrategyContext {
    /// Questionnaire answers as markdown bullets
    pub fn profile_markdown(&self) -> String {
        let p = &self.profile;
        let symbol = self.country.currency_symbol();
        let money = |v: Option<Decimal>| v.map_or("not provided".to_string(), |v| format_money(v, symbol));
        let text = |v: Option<&str>| v.filter(|s| !s.trim().is_empty()).unwrap_or("not provided").to_string();

        let mut out = format!(
            "- Age group: {}\n- Country: {}\n- Monthly income: {}\n- Monthly expenses: {}\n",
            p.age_group.map_or("not provided", |a| a.label()),
            self.country.name(),
            money(p.income),
            money(p.expenses),
        );
        if p.current_assets.is_some() || p.current_liabilities.is_some() {
            out.push_str(&format!(
                "- Current assets: {}\n- Current liabilities: {}\n",
                money(p.current_assets),
                money(p.current_liabilities)
            ));
        }
        out.push_str(&format!(
            "- Risk tolerance: {}\n- Goal: {}\n- Timeframe: {}\n",
            p.risk_profile.map_or("not provided", |r| r.label()),
            text(p.goal.as_deref()),
            text(p.timeframe.as_deref()),
        ));
        out
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::country::Country;
    use crate::economy::{Indicator, MarketTrend};
    use crate::model::{AgeBand, RiskTolerance};
    use crate::strategy::Profiler;
    use chrono::Utc;

    pub fn profile() -> UserProfile {
        UserProfile {
            age_group: Some(AgeBand::Thirties),
            income: Some(dec!(6000)),
            expenses: Some(dec!(4000)),
            risk_profile: Some(RiskTolerance::Moderate),
            goal: Some("Retirement".into()),
            timeframe: Some("20 years".into()),
            country: Some("United States".into()),
            ..UserProfile::default()
        }
    }

    pub fn context() -> StrategyContext {
        let profile = profile();
        let country = CountryRef::Known(Country::UnitedStates);
        let snapshot = Profiler::snapshot(&profile);
        let mut indicators = IndicatorBundle::unavailable("United States");
        indicators.inflation_rate = Indicator::Value(2.9);
        indicators.market_sentiment = Indicator::Value(7.5);
        indicators.market_trend = MarketTrend::Bullish;
        let tax = TaxContext::build(&country, &profile, &snapshot);
        StrategyContext {
            profile,
            country,
            snapshot,
            literacy: None,
            indicators,
            market: MarketOverview {
                country: Some(Country::UnitedStates),
                indices: Vec::new(),
                sectors: Vec::new(),
                bullish_sectors: Vec::new(),
                bullish_stocks: Vec::new(),
                fetched_at: Utc::now(),
            },
            tax,
            warnings: Vec::new(),
        }
    }
}

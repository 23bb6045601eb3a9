//! Financial Profiler
//!
//! Deterministic metrics derived from the questionnaire: life stage, cash
//! flow, net worth, horizon and liquidity need.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::model::{FinancialSnapshot, LiquidityNeed, PlanningHorizon, UserProfile, format_money};

/// Share of the monthly surplus suggested for investing
const INVESTABLE_SHARE: Decimal = dec!(0.6);
/// Below this many months of expenses in assets, cash comes first
const EMERGENCY_FUND_MONTHS: Decimal = dec!(3);

pub struct Profiler;

impl Profiler {
    pub fn snapshot(profile: &UserProfile) -> FinancialSnapshot {
        let expenses = profile.expenses.unwrap_or(Decimal::ZERO);

        let monthly_surplus = profile.income.and_then(|income| income.checked_sub(expenses));
        let savings_rate = profile
            .income
            .zip(monthly_surplus)
            .filter(|(income, _)| *income > Decimal::ZERO)
            .and_then(|(income, surplus)| surplus.checked_div(income))
            .and_then(|ratio| ratio.checked_mul(dec!(100)))
            .map(|pct| pct.round_dp(1));
        let suggested_monthly_investment =
            monthly_surplus.map(|s| (s.max(Decimal::ZERO) * INVESTABLE_SHARE).round_dp(2));

        let net_worth = profile
            .current_assets
            .unwrap_or(Decimal::ZERO)
            .saturating_sub(profile.current_liabilities.unwrap_or(Decimal::ZERO));

        let emergency_months = profile
            .current_assets
            .filter(|_| expenses > Decimal::ZERO)
            .and_then(|assets| assets.checked_div(expenses))
            .map(|months| months.round_dp(1));

        let horizon = profile.timeframe.as_deref().and_then(PlanningHorizon::parse);

        let liquidity_need = match (horizon, emergency_months) {
            (Some(PlanningHorizon::Short), _) => LiquidityNeed::High,
            (_, Some(months)) if months < EMERGENCY_FUND_MONTHS => LiquidityNeed::High,
            (Some(PlanningHorizon::Long), _) => LiquidityNeed::Low,
            _ => LiquidityNeed::Moderate,
        };

        FinancialSnapshot {
            life_stage: profile.age_group.map(|a| a.life_stage()),
            monthly_surplus,
            savings_rate,
            suggested_monthly_investment,
            net_worth,
            horizon,
            liquidity_need,
            emergency_months,
        }
    }
}

impl LiquidityNeed {
    pub const fn label(self) -> &'static str {
        match self {
            Self::High => "high: keep a large cash buffer",
            Self::Moderate => "moderate",
            Self::Low => "low: money can stay invested through downturns",
        }
    }
}

impl FinancialSnapshot {
    /// Annual surplus, if income is known and the product fits
    pub fn annual_surplus(&self) -> Option<Decimal> {
        self.monthly_surplus.and_then(|s| s.checked_mul(dec!(12)))
    }

    /// Markdown bullet list in the given currency
    pub fn to_markdown(&self, symbol: &str) -> String {
        let mut lines = Vec::new();
        if let Some(stage) = self.life_stage {
            lines.push(format!("- Life stage: {}", stage.description()));
        }
        if let Some(surplus) = self.monthly_surplus {
            lines.push(format!("- Monthly surplus: {}", format_money(surplus, symbol)));
        }
        if let Some(rate) = self.savings_rate {
            lines.push(format!("- Savings rate: {rate}%"));
        }
        if let Some(invest) = self.suggested_monthly_investment {
            lines.push(format!(
                "- Suggested monthly investment: {}",
                format_money(invest, symbol)
            ));
        }
        lines.push(format!("- Net worth: {}", format_money(self.net_worth, symbol)));
        if let Some(months) = self.emergency_months {
            lines.push(format!("- Assets cover {months} months of expenses"));
        }
        if let Some(horizon) = self.horizon {
            lines.push(format!("- Planning horizon: {}", horizon.label()));
        }
        lines.push(format!("- Liquidity need: {}", self.liquidity_need.label()));
        lines.join("\n") + "\n"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AgeBand, LifeStage};

    fn profile() -> UserProfile {
        UserProfile {
            age_group: Some(AgeBand::Thirties),
            income: Some(dec!(6000)),
            expenses: Some(dec!(4000)),
            current_assets: Some(dec!(30000)),
            current_liabilities: Some(dec!(10000)),
            timeframe: Some("10 years".into()),
            ..UserProfile::default()
        }
    }

    #[test]
    fn derives_cash_flow_metrics() {
        let snapshot = Profiler::snapshot(&profile());
        assert_eq!(snapshot.life_stage, Some(LifeStage::Establishing));
        assert_eq!(snapshot.monthly_surplus, Some(dec!(2000)));
        assert_eq!(snapshot.savings_rate, Some(dec!(33.3)));
        assert_eq!(snapshot.suggested_monthly_investment, Some(dec!(1200)));
        assert_eq!(snapshot.net_worth, dec!(20000));
        assert_eq!(snapshot.emergency_months, Some(dec!(7.5)));
        assert_eq!(snapshot.horizon, Some(PlanningHorizon::Long));
        assert_eq!(snapshot.liquidity_need, LiquidityNeed::Low);
        assert_eq!(snapshot.annual_surplus(), Some(dec!(24000)));
    }

    #[test]
    fn deficit_suggests_nothing() {
        let snapshot = Profiler::snapshot(&UserProfile {
            expenses: Some(dec!(7000)),
            ..profile()
        });
        assert_eq!(snapshot.monthly_surplus, Some(dec!(-1000)));
        assert_eq!(snapshot.suggested_monthly_investment, Some(dec!(0)));
    }

    #[test]
    fn thin_buffer_means_high_liquidity_need() {
        let snapshot = Profiler::snapshot(&UserProfile {
            current_assets: Some(dec!(5000)),
            ..profile()
        });
        assert_eq!(snapshot.liquidity_need, LiquidityNeed::High);
    }

    #[test]
    fn extreme_ratios_do_not_overflow() {
        let snapshot = Profiler::snapshot(&UserProfile {
            income: Some(Decimal::new(1, 28)),
            expenses: Some(Decimal::new(1, 28)),
            current_assets: Some(Decimal::MAX),
            current_liabilities: None,
            ..profile()
        });
        assert_eq!(snapshot.monthly_surplus, Some(Decimal::ZERO));
        assert!(snapshot.emergency_months.is_none());
        assert_eq!(snapshot.net_worth, Decimal::MAX);
    }

    #[test]
    fn empty_profile_has_only_net_worth() {
        let snapshot = Profiler::snapshot(&UserProfile::default());
        assert!(snapshot.monthly_surplus.is_none());
        assert!(snapshot.savings_rate.is_none());
        assert!(snapshot.life_stage.is_none());
        assert_eq!(snapshot.net_worth, Decimal::ZERO);
        assert_eq!(snapshot.liquidity_need, LiquidityNeed::Moderate);
        assert!(snapshot.to_markdown("$").contains("- Net worth: $0"));
    }
}

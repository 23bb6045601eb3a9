//! Rule-Based Strategy
//!
//! Deterministic document used when the LLM cannot be reached. The
//! allocation depends only on risk tolerance.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::StrategyContext;
use crate::model::{RiskTolerance, format_money};

/// Percent split across asset classes
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetAllocation {
    pub equities: Decimal,
    pub bonds: Decimal,
    pub cash: Decimal,
}

impl AssetAllocation {
    /// Conservative or unknown tolerance gets the defensive split
    pub fn for_risk(risk: Option<RiskTolerance>) -> Self {
        let (equities, bonds) = match risk {
            Some(RiskTolerance::Aggressive) => (dec!(70), dec!(20)),
            Some(RiskTolerance::Moderate) => (dec!(60), dec!(30)),
            Some(RiskTolerance::Conservative) | None => (dec!(40), dec!(50)),
        };
        Self {
            equities,
            bonds,
            cash: dec!(10),
        }
    }

    /// Split a monthly amount by this allocation
    pub fn split(&self, amount: Decimal) -> [(&'static str, Decimal, Decimal); 3] {
        let part = |pct: Decimal| (amount.saturating_mul(pct) / dec!(100)).round_dp(2);
        [
            ("Equities", self.equities, part(self.equities)),
            ("Bonds", self.bonds, part(self.bonds)),
            ("Cash / money market", self.cash, part(self.cash)),
        ]
    }
}

pub struct RuleBasedStrategy;

impl RuleBasedStrategy {
    pub fn document(ctx: &StrategyContext) -> String {
        let symbol = ctx.country.currency_symbol();
        let allocation = AssetAllocation::for_risk(ctx.profile.risk_profile);
        let mut s = String::new();

        s.push_str("# Your Investment Strategy\n\n");
        s.push_str(
            "*This plan was generated from standard allocation rules because the AI advisor \
             was unavailable. It is a sound starting point; request an AI strategy later for \
             more tailored advice.*\n\n",
        );

        s.push_str("## Your Profile\n\n");
        s.push_str(&ctx.profile_markdown());
        s.push('\n');

        s.push_str("## Financial Snapshot\n\n");
        s.push_str(&ctx.snapshot.to_markdown(symbol));
        s.push('\n');

        if !ctx.warnings.is_empty() {
            s.push_str("## Points of Attention\n\n");
            for w in &ctx.warnings {
                s.push_str(&format!("- {w}\n"));
            }
            s.push('\n');
        }

        s.push_str(&format!("## Economic Context: {}\n\n", ctx.indicators.country));
        s.push_str(&ctx.indicators.to_markdown());
        s.push('\n');

        if ctx.market.has_bullish_data() {
            s.push_str("## Market Opportunities\n\n");
            s.push_str(&ctx.market.to_markdown());
            s.push('\n');
        }

        s.push_str("## Recommended Asset Allocation\n\n");
        let monthly = ctx.snapshot.suggested_monthly_investment.filter(|m| *m > Decimal::ZERO);
        for (class, pct, amount) in allocation.split(monthly.unwrap_or(Decimal::ZERO)) {
            match monthly {
                Some(_) => s.push_str(&format!(
                    "- **{class}**: {pct}% ({} per month)\n",
                    format_money(amount, symbol)
                )),
                None => s.push_str(&format!("- **{class}**: {pct}%\n")),
            }
        }
        s.push('\n');

        s.push_str("## Tax Considerations\n\n");
        s.push_str(&ctx.tax.to_markdown());
        s.push('\n');

        s.push_str("## Action Plan\n\n");
        s.push_str("1. **Emergency fund**: keep 3-6 months of expenses in a high-yield savings account.\n");
        s.push_str("2. **Tax-advantaged accounts**: fill the accounts listed above before taxable investing.\n");
        s.push_str(&format!(
            "3. **Core holdings**: put 70% of the equity portion ({}% of the portfolio) in broad, low-cost index funds.\n",
            (allocation.equities * dec!(0.7)).round_dp(0)
        ));
        s.push_str("4. **Opportunities**: up to 20% of the equity portion in the bullish sectors above, reviewed monthly.\n");
        s.push_str(&format!(
            "5. **Stability**: hold {}% in bonds and rebalance back to target every 6-12 months.\n",
            allocation.bonds
        ));
        s.push_str("6. **Dollar-cost averaging**: invest new money in equal monthly amounts over 3-6 months rather than all at once.\n");

        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::test_support;

    #[test]
    fn allocation_by_risk() {
        let aggressive = AssetAllocation::for_risk(Some(RiskTolerance::Aggressive));
        assert_eq!((aggressive.equities, aggressive.bonds, aggressive.cash), (dec!(70), dec!(20), dec!(10)));

        let moderate = AssetAllocation::for_risk(Some(RiskTolerance::Moderate));
        assert_eq!((moderate.equities, moderate.bonds), (dec!(60), dec!(30)));

        assert_eq!(
            AssetAllocation::for_risk(None),
            AssetAllocation::for_risk(Some(RiskTolerance::Conservative))
        );
    }

    #[test]
    fn split_sums_to_amount() {
        let parts = AssetAllocation::for_risk(Some(RiskTolerance::Moderate)).split(dec!(1200));
        let total: Decimal = parts.iter().map(|(_, _, amount)| *amount).sum();
        assert_eq!(total, dec!(1200));
        assert_eq!(parts[0].2, dec!(720));
    }

    #[test]
    fn document_covers_every_section() {
        let mut ctx = test_support::context();
        ctx.warnings.push("Monthly expenses are high.".into());
        let doc = RuleBasedStrategy::document(&ctx);

        for heading in [
            "## Your Profile",
            "## Financial Snapshot",
            "## Points of Attention",
            "## Economic Context: United States",
            "## Recommended Asset Allocation",
            "## Tax Considerations",
            "## Action Plan",
        ] {
            assert!(doc.contains(heading), "missing {heading}");
        }
        assert!(doc.contains("- **Equities**: 60% ($720 per month)"));
        // no bullish data in the fixture
        assert!(!doc.contains("## Market Opportunities"));
    }

    #[test]
    fn deficit_omits_monthly_amounts() {
        let mut ctx = test_support::context();
        ctx.snapshot.suggested_monthly_investment = Some(Decimal::ZERO);
        let doc = RuleBasedStrategy::document(&ctx);
        assert!(doc.contains("- **Bonds**: 30%\n"));
    }
}

//! Tax Database
//!
//! Progressive income brackets, capital-gains rules, account types and
//! tax-efficient strategies for the eight countries with full coverage.
//! Figures are annual and in local currency.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::country::{Country, CountryRef};
use crate::error::{Result, StrategistError};
use crate::model::format_money;

/// Largest annual income or gain accepted: twelve months at the profile maximum
const ANNUAL_LIMIT: Decimal = dec!(12000000000000);

/// How realised gains are taxed
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CapitalGainsRule {
    /// Gains above a yearly allowance taxed at one rate
    Allowance { allowance: Decimal, rate: Decimal },
    /// Part of the gain is included and taxed at an average rate
    Inclusion { inclusion: Decimal, rate: Decimal },
    /// Long-term holding rate
    LongTerm { rate: Decimal },
    /// Flat rate on all gains
    Flat { rate: Decimal },
}

impl CapitalGainsRule {
    pub fn tax_on(self, gains: Decimal) -> Decimal {
        if gains <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        match self {
            Self::Allowance { allowance, rate } => (gains - allowance).max(Decimal::ZERO) * rate,
            Self::Inclusion { inclusion, rate } => gains * inclusion * rate,
            Self::LongTerm { rate } | Self::Flat { rate } => gains * rate,
        }
    }
}

/// One country's tax rules
#[derive(Clone, Debug, Serialize)]
pub struct TaxRules {
    pub country: Country,
    /// Lower bound of each income band
    pub thresholds: Vec<Decimal>,
    /// Marginal rate of each band, as a fraction
    pub rates: Vec<Decimal>,
    pub capital_gains: CapitalGainsRule,
    pub currency: &'static str,
}

impl TaxRules {
    pub fn for_country(country: Country) -> Option<Self> {
        let (thresholds, rates, capital_gains): (Vec<Decimal>, Vec<Decimal>, CapitalGainsRule) =
            match country {
                Country::UnitedStates => (
                    vec![dec!(0), dec!(10475), dec!(41885), dec!(89405), dec!(174050), dec!(214200), dec!(539900)],
                    vec![dec!(0.10), dec!(0.12), dec!(0.22), dec!(0.24), dec!(0.32), dec!(0.35), dec!(0.37)],
                    CapitalGainsRule::LongTerm { rate: dec!(0.20) },
                ),
                Country::India => (
                    vec![dec!(0), dec!(400000), dec!(800000), dec!(1200000), dec!(1600000), dec!(2000000), dec!(2400000)],
                    vec![dec!(0), dec!(0.05), dec!(0.10), dec!(0.15), dec!(0.20), dec!(0.25), dec!(0.30)],
                    CapitalGainsRule::LongTerm { rate: dec!(0.125) },
                ),
                Country::UnitedKingdom => (
                    vec![dec!(0), dec!(12570), dec!(50270), dec!(125140)],
                    vec![dec!(0), dec!(0.20), dec!(0.40), dec!(0.45)],
                    CapitalGainsRule::Allowance { allowance: dec!(6000), rate: dec!(0.10) },
                ),
                Country::Canada => (
                    vec![dec!(0), dec!(53359), dec!(106717), dec!(165430), dec!(235675)],
                    vec![dec!(0.15), dec!(0.205), dec!(0.26), dec!(0.29), dec!(0.33)],
                    CapitalGainsRule::Inclusion { inclusion: dec!(0.5), rate: dec!(0.21) },
                ),
                Country::France => (
                    vec![dec!(0), dec!(11094), dec!(28218), dec!(80297), dec!(170000)],
                    vec![dec!(0), dec!(0.11), dec!(0.30), dec!(0.41), dec!(0.45)],
                    CapitalGainsRule::Flat { rate: dec!(0.30) },
                ),
                Country::Germany => (
                    vec![dec!(0), dec!(11604), dec!(63469), dec!(277825)],
                    vec![dec!(0), dec!(0.14), dec!(0.42), dec!(0.45)],
                    CapitalGainsRule::Flat { rate: dec!(0.26375) },
                ),
                Country::Italy => (
                    vec![dec!(0), dec!(15000), dec!(28000), dec!(50000), dec!(75000), dec!(120000), dec!(150000)],
                    vec![dec!(0.23), dec!(0.25), dec!(0.35), dec!(0.43), dec!(0.45), dec!(0.47), dec!(0.47)],
                    CapitalGainsRule::Flat { rate: dec!(0.26) },
                ),
                Country::Japan => (
                    vec![dec!(0), dec!(1950000), dec!(3300000), dec!(6950000), dec!(9000000), dec!(18000000), dec!(40000000)],
                    vec![dec!(0.05), dec!(0.10), dec!(0.20), dec!(0.23), dec!(0.33), dec!(0.40), dec!(0.45)],
                    CapitalGainsRule::Flat { rate: dec!(0.20315) },
                ),
                _ => return None,
            };

        Some(Self {
            country,
            thresholds,
            rates,
            capital_gains,
            currency: country.currency(),
        })
    }

    /// Progressive tax: each band's slice of income at that band's rate
    pub fn income_tax(&self, income: Decimal) -> Decimal {
        self.thresholds
            .iter()
            .zip(&self.rates)
            .enumerate()
            .map(|(i, (&lower, &rate))| {
                let upper = self.thresholds.get(i + 1).copied().unwrap_or(Decimal::MAX);
                let slice = income.min(upper) - lower;
                if slice > Decimal::ZERO { slice * rate } else { Decimal::ZERO }
            })
            .sum()
    }
}

/// Estimated annual tax bill
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct TaxEstimate {
    pub country: Country,
    pub currency: &'static str,
    pub annual_income: Decimal,
    pub capital_gains: Decimal,
    pub income_tax: Decimal,
    pub capital_gains_tax: Decimal,
    pub total_tax: Decimal,
    /// Percent of income plus gains
    pub effective_rate: Decimal,
}

/// Estimate income and capital-gains tax for one year
pub fn estimate_tax(country: Country, annual_income: Decimal, capital_gains: Decimal) -> Result<TaxEstimate> {
    if annual_income < Decimal::ZERO || capital_gains < Decimal::ZERO {
        return Err(StrategistError::InvalidInput(
            "income and gains must not be negative".into(),
        ));
    }
    if annual_income > ANNUAL_LIMIT || capital_gains > ANNUAL_LIMIT {
        return Err(StrategistError::InvalidInput(format!(
            "income and gains must not exceed {}",
            format_money(ANNUAL_LIMIT, "")
        )));
    }
    let rules = TaxRules::for_country(country)
        .ok_or_else(|| StrategistError::UnsupportedCountry(country.name().to_string()))?;

    let overflow = || StrategistError::InvalidInput("amounts too large to tax".into());
    let income_tax = rules.income_tax(annual_income).round_dp(2);
    let capital_gains_tax = rules.capital_gains.tax_on(capital_gains).round_dp(2);
    let total_tax = income_tax.checked_add(capital_gains_tax).ok_or_else(overflow)?;
    let base = annual_income.checked_add(capital_gains).ok_or_else(overflow)?;
    let effective_rate = if base > Decimal::ZERO {
        total_tax
            .checked_div(base)
            .and_then(|r| r.checked_mul(dec!(100)))
            .ok_or_else(overflow)?
            .round_dp(2)
    } else {
        Decimal::ZERO
    };

    Ok(TaxEstimate {
        country,
        currency: rules.currency,
        annual_income,
        capital_gains,
        income_tax,
        capital_gains_tax,
        total_tax,
        effective_rate,
    })
}

/// Descriptive tax and investment facts
#[derive(Clone, Debug, Serialize)]
pub struct FinancialInfo {
    pub capital_gains_tax: &'static str,
    pub income_tax_rate: &'static str,
    pub tax_accounts: &'static str,
    pub investment_options: &'static str,
    pub currency: &'static str,
}

pub fn financial_info(country: Country) -> Option<FinancialInfo> {
    let (capital_gains_tax, income_tax_rate, tax_accounts, investment_options) = match country {
        Country::UnitedStates => (
            "0% (long-term), 15-20% (high earners)",
            "10-37% (federal)",
            "401(k), IRA, Roth IRA, HSA",
            "US stocks, bonds, REITs, international funds",
        ),
        Country::Canada => (
            "50% of capital gains taxed as income",
            "15-33% (federal) + provincial",
            "RRSP, TFSA, RESP",
            "Canadian stocks, bonds, GICs, international funds",
        ),
        Country::UnitedKingdom => (
            "10-20% (above £6,000 allowance)",
            "20-45%",
            "ISA, SIPP, workplace pensions",
            "UK stocks, bonds, funds, ETFs",
        ),
        Country::Germany => (
            "26.375% (withholding tax)",
            "14-45%",
            "Private pension schemes, company pensions",
            "German stocks, EU bonds, funds, ETFs",
        ),
        Country::France => (
            "30% flat tax or progressive income tax",
            "0-45%",
            "PEA, Assurance Vie, company savings plans",
            "French stocks, EU bonds, funds, ETFs",
        ),
        Country::Italy => (
            "26% on financial assets",
            "23-43%",
            "Private pension funds, TFR",
            "Italian stocks, EU bonds, funds, ETFs",
        ),
        Country::Japan => (
            "20.315% (separate taxation)",
            "5-45%",
            "iDeCo, NISA, company pensions",
            "Japanese stocks, bonds, funds, international assets",
        ),
        Country::India => (
            "12.5% (long-term equity), 15% (short-term)",
            "5-30% (new regime)",
            "EPF, PPF, ELSS, NPS, SCSS",
            "Indian stocks, bonds, mutual funds, gold, FDs",
        ),
        _ => return None,
    };

    Some(FinancialInfo {
        capital_gains_tax,
        income_tax_rate,
        tax_accounts,
        investment_options,
        currency: country.currency(),
    })
}

/// Markdown bullet summary, or a note that little is known
pub fn financial_info_text(country: &CountryRef) -> String {
    match country.known().and_then(financial_info) {
        Some(info) => format!(
            "- Capital Gains Tax: {}\n- Income Tax Rate: {}\n- Tax-Advantaged Accounts: {}\n- Common Investment Options: {}\n- Currency: {}\n",
            info.capital_gains_tax,
            info.income_tax_rate,
            info.tax_accounts,
            info.investment_options,
            info.currency
        ),
        None => format!(
            "Limited tax information available for {}. Consider consulting local financial advisors.\n",
            country.name()
        ),
    }
}

pub fn tax_strategies(country: Country) -> &'static [&'static str] {
    match country {
        Country::UnitedStates => &[
            "Maximize 401(k) contributions before taxable investing",
            "Use a Roth IRA for tax-free growth",
            "Hold investments more than one year for long-term capital gains rates",
            "Harvest tax losses against realised gains",
            "Use an HSA as a retirement account (triple tax advantage)",
        ],
        Country::Canada => &[
            "Fill TFSA room first for tax-free growth",
            "Use the RRSP for deductions in high-income years",
            "Hold Canadian eligible dividends for the dividend tax credit",
            "Compare capital gains and dividend treatment before rebalancing",
            "Use an RESP for children's education and government grants",
        ],
        Country::UnitedKingdom => &[
            "Use the annual ISA allowance for tax-free returns",
            "Maximize pension contributions within the annual allowance",
            "Realise gains up to the capital gains allowance each year",
            "Use the dividend allowance for income holdings",
            "Use bed-and-ISA transfers to move holdings into wrappers",
        ],
        Country::Germany => &[
            "Use the Sparerpauschbetrag exemption on investment income",
            "Consider Riester or Rürup pensions for tax relief",
            "Use company pension schemes (bAV)",
            "Prefer accumulating ETFs for deferral",
            "Hold real estate more than ten years for tax-free sale",
        ],
        Country::India => &[
            "Use ELSS funds for the Section 80C deduction",
            "Use PPF for long-term tax-free growth",
            "Contribute to NPS for additional deductions",
            "Hold equity more than one year for LTCG treatment",
            "Invest through SIPs for rupee cost averaging",
        ],
        Country::France => &[
            "Fill the PEA; gains are exempt from income tax after five years",
            "Use Assurance Vie for tax-efficient growth",
            "Use company savings plans (PEE/PERCO)",
            "Hold Assurance Vie more than eight years for reduced rates",
            "Use life insurance for estate planning",
        ],
        Country::Italy => &[
            "Use PIR plans for tax-exempt returns",
            "Contribute to pension funds for deductions",
            "Direct TFR into a pension fund",
            "Hold government bonds taxed at the reduced 12.5% rate",
            "Use life insurance policies for tax-efficient savings",
        ],
        Country::Japan => &[
            "Maximize iDeCo contributions for deductions",
            "Use NISA for tax-free investment growth",
            "Use company pension schemes",
            "Hold for the long term to limit realised gains",
            "Use life insurance deductions for savings",
        ],
        _ => &["Consult a local tax advisor for country-specific strategies"],
    }
}

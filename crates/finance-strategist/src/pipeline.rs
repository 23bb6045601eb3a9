//! Strategy Pipeline
//!
//! Runs the stages in order: input analysis (free text only), validation,
//! profiling, economic and market analysis, tax context, strategy advice,
//! footer. Only validation can fail the request; an unreachable LLM yields
//! the rule-based document with status `basic`.

use std::sync::Arc;
use std::time::Instant;

use agent_core::LlmProvider;
use chrono::Utc;
use serde_json::Value;
use uuid::Uuid;

use crate::country::CountryRef;
use crate::economy::{EconomicAnalyst, MarketAnalyst};
use crate::error::{Result, StrategistError};
use crate::model::{LiteracyLevel, StrategyReport, StrategyStatus, UserProfile};
use crate::strategy::{
    LiteracyAssessment, Profiler, RuleBasedStrategy, StrategyAgents, StrategyContext, TaxContext,
    append_footer, lenient_profile, render_html, strategy_markdown, strategy_request,
};

pub struct StrategyPipeline {
    provider: Arc<dyn LlmProvider>,
    agents: StrategyAgents,
    economy: Arc<EconomicAnalyst>,
    market: Arc<MarketAnalyst>,
}

impl StrategyPipeline {
    pub fn new(provider: Arc<dyn LlmProvider>, economy: EconomicAnalyst) -> Self {
        let market = MarketAnalyst::new(economy.market_source());
        Self {
            provider,
            agents: StrategyAgents::default(),
            economy: Arc::new(economy),
            market: Arc::new(market),
        }
    }

    pub fn with_agents(mut self, agents: StrategyAgents) -> Self {
        self.agents = agents;
        self
    }

    pub fn provider(&self) -> &dyn LlmProvider {
        self.provider.as_ref()
    }

    pub fn economy(&self) -> &EconomicAnalyst {
        &self.economy
    }

    pub fn market(&self) -> &MarketAnalyst {
        &self.market
    }

    /// Strategy for questionnaire answers
    pub async fn run_from_profile(&self, profile: UserProfile) -> Result<StrategyReport> {
        self.run(profile, None, Vec::new()).await
    }

    /// Strategy for a free-text description of the user's situation
    pub async fn run_from_text(&self, text: &str) -> Result<StrategyReport> {
        let text = text.trim();
        if text.is_empty() {
            return Err(StrategistError::InvalidInput(
                "Please describe your financial situation.".into(),
            ));
        }

        let provider = self.provider.as_ref();
        let (analysis, literacy) = tokio::join!(
            self.agents.input_analyzer.run_json::<Value>(provider, text),
            self.agents.literacy_detector.run_json::<LiteracyAssessment>(provider, text),
        );

        let mut warnings = Vec::new();
        let profile = match analysis {
            Ok(value) => lenient_profile(value),
            Err(e) => {
                tracing::warn!("input analysis failed: {e}");
                warnings.push(
                    "We could not extract details from your description; the strategy uses defaults."
                        .to_string(),
                );
                UserProfile::default()
            }
        };

        let literacy = match literacy {
            Ok(assessment) => assessment.level(),
            Err(e) => {
                tracing::warn!("literacy detection failed: {e}");
                None
            }
        };

        self.run(profile, literacy, warnings).await
    }

    async fn run(
        &self,
        profile: UserProfile,
        literacy: Option<LiteracyLevel>,
        mut warnings: Vec<String>,
    ) -> Result<StrategyReport> {
        let started = Instant::now();
        let request_id = Uuid::new_v4();

        warnings.extend(profile.validate()?);

        let country = CountryRef::resolve(profile.country.as_deref());
        if let CountryRef::Unknown(name) = &country {
            warnings.push(format!(
                "'{name}' is not a recognised country; economic data and tax rules are limited."
            ));
        }
        tracing::info!(%request_id, country = country.name(), "strategy requested");

        let snapshot = Profiler::snapshot(&profile);
        let (indicators, market) = tokio::join!(
            self.economy.analyze(&country),
            self.market.overview(country.known()),
        );
        let tax = TaxContext::build(&country, &profile, &snapshot);

        let ctx = StrategyContext {
            profile,
            country,
            snapshot,
            literacy,
            indicators,
            market,
            tax,
            warnings,
        };

        let request = strategy_request(&ctx);
        let (body, status) = match self.agents.strategy_advisor.run(self.provider.as_ref(), &request).await {
            Ok(completion) => (strategy_markdown(&completion.content), StrategyStatus::Success),
            Err(e) => {
                tracing::warn!(%request_id, provider = self.provider.name(), "strategy advisor failed, using rule-based plan: {e}");
                (RuleBasedStrategy::document(&ctx), StrategyStatus::Basic)
            }
        };

        let generated_at = Utc::now();
        let strategy = append_footer(&body, &ctx, generated_at);
        let strategy_html = render_html(&strategy);
        let processing_time_secs = started.elapsed().as_secs_f64();

        tracing::info!(%request_id, ?status, processing_time_secs, "strategy generated");

        Ok(StrategyReport {
            request_id,
            strategy,
            strategy_html,
            status,
            processing_time_secs,
            economic_data_included: ctx.indicators.any_available(),
            bullish_analysis_included: ctx.market.has_bullish_data(),
            gdp_growth_rate: ctx.indicators.gdp_growth.value(),
            profile: ctx.profile,
            snapshot: ctx.snapshot,
            literacy_level: ctx.literacy,
            indicators: ctx.indicators,
            warnings: ctx.warnings,
            generated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::country::Country;
    use crate::economy::{IndicatorKind, IndicatorSource, MockIndicatorSource, MockMarketData};
    use crate::strategy::test_support;
    use agent_core::MockProvider;
    use agent_core::message::Role;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn economy() -> EconomicAnalyst {
        let stats: Arc<dyn IndicatorSource> = Arc::new(
            MockIndicatorSource::new("Stats")
                .with_value(IndicatorKind::Inflation, Country::UnitedStates, 2.9)
                .with_value(IndicatorKind::GdpGrowth, Country::UnitedStates, 2.8),
        );
        let market = MockMarketData::new()
            .with_series("^GSPC", 5000.0, 5400.0)
            .with_series("XLK", 100.0, 106.0)
            .with_series("NVDA", 100.0, 112.0);
        EconomicAnalyst::new(vec![stats.clone()], vec![], vec![stats], Arc::new(market))
    }

    fn pipeline(provider: MockProvider) -> (Arc<MockProvider>, StrategyPipeline) {
        let provider = Arc::new(provider);
        let pipeline = StrategyPipeline::new(provider.clone(), economy());
        (provider, pipeline)
    }

    #[tokio::test]
    async fn profile_run_uses_advisor_reply() {
        let (provider, pipeline) = pipeline(MockProvider::replying("# Your Plan\n\nBuy index funds."));
        let report = pipeline.run_from_profile(test_support::profile()).await.unwrap();

        assert_eq!(report.status, StrategyStatus::Success);
        assert!(report.strategy.starts_with("# Your Plan"));
        assert!(report.strategy.contains("## Important Disclaimers"));
        assert!(report.strategy_html.contains("<h1>Your Plan</h1>"));
        assert!(report.economic_data_included);
        assert!(report.bullish_analysis_included);
        assert_eq!(report.gdp_growth_rate, Some(2.8));
        assert!(report.warnings.is_empty());

        let calls = provider.calls();
        assert_eq!(calls.len(), 1);
        let user = &calls[0].messages[1];
        assert_eq!(user.role, Role::User);
        assert!(user.content.contains("- Inflation Rate: 2.90%"));
        assert!(user.content.contains("Technology (XLK)"));
    }

    #[tokio::test]
    async fn llm_failure_falls_back_to_rule_based() {
        let (_, pipeline) = pipeline(MockProvider::failing("connection refused"));
        let report = pipeline.run_from_profile(test_support::profile()).await.unwrap();

        assert_eq!(report.status, StrategyStatus::Basic);
        assert!(report.strategy.contains("## Recommended Asset Allocation"));
        assert!(report.strategy.contains("## Real-Time Data Integration"));
    }

    #[tokio::test]
    async fn invalid_profile_is_rejected_before_any_call() {
        let (provider, pipeline) = pipeline(MockProvider::replying("unused"));
        let profile = UserProfile {
            income: Some(dec!(0)),
            ..test_support::profile()
        };
        let err = pipeline.run_from_profile(profile).await.unwrap_err();
        assert!(matches!(err, StrategistError::Validation(_)));
        assert!(provider.calls().is_empty());
    }

    #[tokio::test]
    async fn oversized_income_is_a_validation_error() {
        let (provider, pipeline) = pipeline(MockProvider::replying("unused"));
        let profile = UserProfile {
            income: Some(Decimal::MAX),
            ..test_support::profile()
        };
        let err = pipeline.run_from_profile(profile).await.unwrap_err();
        assert!(matches!(err, StrategistError::Validation(_)));
        assert!(provider.calls().is_empty());
    }

    #[tokio::test]
    async fn unknown_country_still_produces_a_plan() {
        let (_, pipeline) = pipeline(MockProvider::replying("Plan"));
        let profile = UserProfile {
            country: Some("Atlantis".into()),
            ..test_support::profile()
        };
        let report = pipeline.run_from_profile(profile).await.unwrap();
        assert!(!report.economic_data_included);
        assert_eq!(report.indicators.country, "Atlantis");
        assert!(report.warnings.iter().any(|w| w.contains("Atlantis")));
    }

    #[tokio::test]
    async fn text_run_chains_three_agents() {
        let provider = MockProvider::scripted(vec![
            Ok(r#"{"age_group": "30s", "income_monthly": 6000, "expenses_monthly": 4000, "risk_profile": "Moderate", "country": "USA"}"#.into()),
            Ok(r#"{"literacy_level": "intermediate", "notes": "knows ETFs"}"#.into()),
            Ok("## Strategy\n\nInvest monthly.".into()),
        ]);
        let (provider, pipeline) = pipeline(provider);
        let report = pipeline
            .run_from_text("I'm 34, earn $6k a month, spend 4k, and hold a few ETFs.")
            .await
            .unwrap();

        assert_eq!(report.status, StrategyStatus::Success);
        assert_eq!(report.profile.income, Some(dec!(6000)));
        assert_eq!(report.literacy_level, Some(LiteracyLevel::Intermediate));
        assert_eq!(provider.calls().len(), 3);
    }

    #[tokio::test]
    async fn text_run_survives_a_dead_llm() {
        let (_, pipeline) = pipeline(MockProvider::failing("down"));
        let report = pipeline.run_from_text("I want to save for a house").await.unwrap();
        assert_eq!(report.status, StrategyStatus::Basic);
        assert!(report.literacy_level.is_none());
        assert!(report.warnings.iter().any(|w| w.contains("could not extract")));
    }

    #[tokio::test]
    async fn empty_text_is_invalid() {
        let (_, pipeline) = pipeline(MockProvider::replying("unused"));
        assert!(matches!(
            pipeline.run_from_text("   ").await,
            Err(StrategistError::InvalidInput(_))
        ));
    }
}

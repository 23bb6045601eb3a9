//! Prompt Agents
//!
//! The three LLM agents of the pipeline and the prompt text they receive.

use agent_core::{GenerationOptions, PromptAgent};
use serde::Deserialize;
use serde_json::{Map, Value};

use super::StrategyContext;
use crate::model::{LiteracyLevel, UserProfile};

const INPUT_ANALYZER_PROMPT: &str = r#"You extract structured financial details from a person's description of their situation.

Reply with a single JSON object and nothing else. Use these keys, and null for anything not mentioned:

{
  "age_group": "20s" | "30s" | "40s" | "50s+",
  "income_monthly": number,
  "expenses_monthly": number,
  "current_assets": number,
  "current_liabilities": number,
  "risk_profile": "Conservative" | "Moderate" | "Aggressive",
  "goal": string,
  "goal_timeframe": string,
  "country": string
}

Convert yearly figures to monthly ones. Do not guess numbers that are not stated."#;

const LITERACY_DETECTOR_PROMPT: &str = r#"You judge how familiar a person is with personal finance from the way they write.

- beginner: everyday language, unsure about basic terms
- intermediate: mentions funds, accounts or allocation correctly
- advanced: discusses tax treatment, asset classes or portfolio construction in detail

Reply with a single JSON object: {"literacy_level": "beginner" | "intermediate" | "advanced", "notes": string}"#;

const STRATEGY_ADVISOR_PROMPT: &str = r#"You are a fiduciary-minded personal finance strategist.

Write a personalized investment strategy in markdown for the person described. Ground every recommendation in the figures you are given: their cash flow, the economic indicators, the market data and their country's tax rules. Where a figure is marked Unavailable, say so rather than inventing one.

Cover, with a heading for each:

1. Asset allocation with percentages that fit their risk tolerance and horizon
2. Opportunities in the bullish sectors and stocks listed, sized sensibly
3. Tax optimization using the accounts and strategies of their country
4. A step-by-step implementation plan with monthly amounts
5. Risk management, including the emergency fund
6. Market timing considerations given the current trend

Be specific and practical. Use the local currency."#;

/// Reply shape of the literacy detector
#[derive(Clone, Debug, Deserialize)]
pub struct LiteracyAssessment {
    pub literacy_level: String,
    #[serde(default)]
    pub notes: Option<String>,
}

impl LiteracyAssessment {
    pub fn level(&self) -> Option<LiteracyLevel> {
        match self.literacy_level.trim().to_lowercase().as_str() {
            "beginner" | "novice" | "basic" => Some(LiteracyLevel::Beginner),
            "intermediate" => Some(LiteracyLevel::Intermediate),
            "advanced" | "expert" => Some(LiteracyLevel::Advanced),
            _ => None,
        }
    }
}

/// The agents used by the pipeline
#[derive(Clone, Debug)]
pub struct StrategyAgents {
    pub input_analyzer: PromptAgent,
    pub literacy_detector: PromptAgent,
    pub strategy_advisor: PromptAgent,
}

impl StrategyAgents {
    pub fn new(model: &str) -> Self {
        let analysis = GenerationOptions::default()
            .with_model(model)
            .with_temperature(0.1)
            .with_max_tokens(512);
        let writing = GenerationOptions::default()
            .with_model(model)
            .with_temperature(0.7)
            .with_max_tokens(2000);

        Self {
            input_analyzer: PromptAgent::new("Input Analyzer", INPUT_ANALYZER_PROMPT)
                .with_description("Turns a free-text description into a profile")
                .with_options(analysis.clone()),
            literacy_detector: PromptAgent::new("Literacy Detector", LITERACY_DETECTOR_PROMPT)
                .with_description("Classifies the reader's financial literacy")
                .with_options(analysis),
            strategy_advisor: PromptAgent::new("Strategy Advisor", STRATEGY_ADVISOR_PROMPT)
                .with_description("Writes the personalized strategy document")
                .with_options(writing),
        }
    }
}

impl Default for StrategyAgents {
    fn default() -> Self {
        Self::new(agent_core::provider::DEFAULT_MODEL)
    }
}

/// Build a profile from analyzer output, keeping every field that parses
pub fn lenient_profile(value: Value) -> UserProfile {
    let Value::Object(fields) = value else {
        return UserProfile::default();
    };

    let mut profile = UserProfile::default();
    for (key, field) in fields {
        if field.is_null() {
            continue;
        }
        let single = Value::Object(Map::from_iter([(key.clone(), field)]));
        match serde_json::from_value::<UserProfile>(single) {
            Ok(partial) => profile.merge_missing(partial),
            Err(e) => tracing::debug!(field = %key, "ignoring extracted field: {e}"),
        }
    }
    profile
}

/// User message for the strategy advisor
pub fn strategy_request(ctx: &StrategyContext) -> String {
    let symbol = ctx.country.currency_symbol();
    let mut prompt = String::new();

    prompt.push_str("## Client Profile\n");
    prompt.push_str(&ctx.profile_markdown());

    prompt.push_str("\n## Financial Snapshot\n");
    prompt.push_str(&ctx.snapshot.to_markdown(symbol));

    if !ctx.warnings.is_empty() {
        prompt.push_str("\n## Concerns\n");
        for w in &ctx.warnings {
            prompt.push_str(&format!("- {w}\n"));
        }
    }

    prompt.push_str(&format!("\n## Economic Indicators ({})\n", ctx.indicators.country));
    prompt.push_str(&ctx.indicators.to_markdown());

    prompt.push_str("\n## Market Analysis\n");
    prompt.push_str(&ctx.market.to_markdown());

    prompt.push_str(&format!("\n## Tax Context ({})\n", ctx.country.name()));
    prompt.push_str(&ctx.tax.to_markdown());

    if let Some(level) = ctx.literacy {
        prompt.push_str("\n## Audience\n");
        prompt.push_str(level.guidance());
        prompt.push('\n');
    }

    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AgeBand, RiskTolerance};
    use crate::strategy::test_support;
    use agent_core::MockProvider;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn agents_use_their_own_sampling() {
        let agents = StrategyAgents::new("test-model");
        assert_eq!(agents.strategy_advisor.options().max_tokens, 2000);
        assert!((agents.input_analyzer.options().temperature - 0.1).abs() < f32::EPSILON);
        assert_eq!(agents.literacy_detector.options().model, "test-model");
    }

    #[test]
    fn lenient_profile_skips_bad_fields() {
        let profile = lenient_profile(json!({
            "age_group": "30s",
            "income_monthly": "$6,000",
            "expenses_monthly": 4000,
            "risk_profile": "somewhat adventurous",
            "goal": "buy a house",
            "goal_timeframe": null,
            "country": "India"
        }));
        assert_eq!(profile.age_group, Some(AgeBand::Thirties));
        assert_eq!(profile.income, Some(dec!(6000)));
        assert_eq!(profile.expenses, Some(dec!(4000)));
        assert_eq!(profile.risk_profile, None);
        assert_eq!(profile.goal.as_deref(), Some("buy a house"));
        assert!(profile.timeframe.is_none());
        assert_eq!(profile.country.as_deref(), Some("India"));
    }

    #[test]
    fn non_object_reply_gives_empty_profile() {
        assert!(lenient_profile(json!(["nope"])).income.is_none());
    }

    #[test]
    fn literacy_levels_are_case_insensitive() {
        let a = LiteracyAssessment {
            literacy_level: "Advanced".into(),
            notes: None,
        };
        assert_eq!(a.level(), Some(LiteracyLevel::Advanced));
    }

    #[tokio::test]
    async fn analyzer_reply_round_trips_through_agent() {
        let provider = MockProvider::replying(
            "Here you go:\n```json\n{\"age_group\": \"40s\", \"risk_profile\": \"aggressive\"}\n```",
        );
        let agents = StrategyAgents::default();
        let value: Value = agents
            .input_analyzer
            .run_json(&provider, "I'm 45 and like risk")
            .await
            .unwrap();
        let profile = lenient_profile(value);
        assert_eq!(profile.age_group, Some(AgeBand::Forties));
        assert_eq!(profile.risk_profile, Some(RiskTolerance::Aggressive));
    }

    #[test]
    fn request_includes_every_context_block() {
        let mut ctx = test_support::context();
        ctx.literacy = Some(LiteracyLevel::Beginner);
        let prompt = strategy_request(&ctx);
        assert!(prompt.contains("- Monthly income: $6,000"));
        assert!(prompt.contains("- Inflation Rate: 2.90%"));
        assert!(prompt.contains("- Interest Rate: Unavailable"));
        assert!(prompt.contains("## Tax Context (United States)"));
        assert!(prompt.contains(LiteracyLevel::Beginner.guidance()));
    }
}

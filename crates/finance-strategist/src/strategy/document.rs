//! Strategy Document
//!
//! Normalises the advisor's reply to markdown, appends the footer and
//! renders HTML.

use agent_core::json::{extract_json, looks_like_json};
use chrono::{DateTime, Utc};
use pulldown_cmark::{Options, Parser, html};
use serde_json::Value;

use super::StrategyContext;

const EMPTY_STRATEGY: &str = "No strategy generated.";

const DISCLAIMERS: [&str; 5] = [
    "This strategy is for educational purposes only and is not financial advice.",
    "Past performance does not guarantee future results; all investments carry risk.",
    "Economic and market data may be delayed or incomplete.",
    "Tax figures are estimates; confirm them with a qualified tax professional.",
    "Review your plan regularly and consult a licensed advisor before acting on it.",
];

/// Markdown for an advisor reply; JSON replies become headed sections
pub fn strategy_markdown(reply: &str) -> String {
    let reply = reply.trim();
    if reply.is_empty() {
        return EMPTY_STRATEGY.to_string();
    }
    if looks_like_json(reply) {
        let parsed = extract_json(reply).and_then(|json| serde_json::from_str::<Value>(json).ok());
        if let Some(Value::Object(sections)) = parsed {
            let mut out = String::new();
            for (key, value) in sections {
                out.push_str(&format!("## {}\n\n", title_case(&key)));
                render_value(&value, 0, &mut out);
                out.push('\n');
            }
            return out;
        }
        tracing::debug!("reply looked like JSON but did not parse; keeping it verbatim");
    }
    reply.to_string()
}

fn title_case(key: &str) -> String {
    key.split(['_', '-', ' '])
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars).collect()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "n/a".to_string(),
        other => other.to_string(),
    }
}

fn render_value(value: &Value, depth: usize, out: &mut String) {
    let indent = "  ".repeat(depth);
    match value {
        Value::Array(items) => {
            for item in items {
                match item {
                    Value::Object(_) | Value::Array(_) => {
                        out.push_str(&format!("{indent}-\n"));
                        render_value(item, depth + 1, out);
                    }
                    _ => out.push_str(&format!("{indent}- {}\n", scalar(item))),
                }
            }
        }
        Value::Object(fields) => {
            for (key, field) in fields {
                match field {
                    Value::Object(_) | Value::Array(_) => {
                        out.push_str(&format!("{indent}- **{}**:\n", title_case(key)));
                        render_value(field, depth + 1, out);
                    }
                    _ => out.push_str(&format!("{indent}- **{}**: {}\n", title_case(key), scalar(field))),
                }
            }
        }
        _ if depth == 0 => out.push_str(&format!("{}\n", scalar(value))),
        _ => out.push_str(&format!("{indent}- {}\n", scalar(value))),
    }
}

/// Data-integration summary, disclaimers and timestamp
pub fn append_footer(markdown: &str, ctx: &StrategyContext, generated_at: DateTime<Utc>) -> String {
    let yes_no = |b: bool| if b { "included" } else { "unavailable" };
    let indicators = &ctx.indicators;

    let mut out = markdown.trim_end().to_string();
    out.push_str("\n\n---\n\n## Real-Time Data Integration\n\n");
    out.push_str(&format!(
        "- Economic indicators for {}: {} ({} of 4 available)\n",
        indicators.country,
        yes_no(indicators.any_available()),
        indicators.available_count()
    ));
    if let Some(gdp) = indicators.gdp_growth.value() {
        out.push_str(&format!("- GDP growth: {gdp:.2}%\n"));
    }
    out.push_str(&format!("- Market trend: {}\n", indicators.market_trend.as_str()));
    out.push_str(&format!(
        "- Bullish sector and stock analysis: {}\n",
        yes_no(ctx.market.has_bullish_data())
    ));
    out.push_str(&format!(
        "- Country tax rules: {}\n",
        yes_no(ctx.country.known().is_some_and(|c| c.has_tax_rules()))
    ));
    for (field, p) in &indicators.provenance {
        match &p.period {
            Some(period) => out.push_str(&format!("- Source for {field}: {} ({period})\n", p.source)),
            None => out.push_str(&format!("- Source for {field}: {}\n", p.source)),
        }
    }

    out.push_str("\n## Important Disclaimers\n\n");
    for d in DISCLAIMERS {
        out.push_str(&format!("- {d}\n"));
    }

    out.push_str(&format!(
        "\n*Generated: {}*\n",
        generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    out
}

pub fn render_html(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let parser = Parser::new_ext(markdown, options);
    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

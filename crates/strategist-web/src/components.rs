//! UI Components

use leptos::prelude::*;

use crate::api::StrategyView;

/// Tells the reader whether the LLM wrote the strategy
#[component]
pub fn StrategyBanner(ai_generated: bool, processing_time_secs: f64) -> impl IntoView {
    let (class, label) = if ai_generated {
        ("banner banner-ai", "AI-powered strategy")
    } else {
        ("banner banner-basic", "Rule-based strategy (AI advisor unavailable)")
    };

    view! {
        <div class=class>
            <strong>{label}</strong>
            <span class="timing">{format!("Generated in {processing_time_secs:.1}s")}</span>
        </div>
    }
}

#[component]
pub fn WarningList(warnings: Vec<String>) -> impl IntoView {
    (!warnings.is_empty()).then(|| {
        view! {
            <ul class="warnings">
                {warnings.into_iter().map(|w| view! { <li>{w}</li> }).collect_view()}
            </ul>
        }
    })
}

/// Rendered strategy document with its banner and warnings
#[component]
pub fn StrategyResult(report: StrategyView) -> impl IntoView {
    let literacy = report
        .literacy_level
        .clone()
        .map(|level| format!("Written for a {level} reader"));

    view! {
        <section class="strategy">
            <StrategyBanner
                ai_generated=report.ai_generated()
                processing_time_secs=report.processing_time_secs
            />
            <WarningList warnings=report.warnings.clone() />
            {literacy.map(|text| view! { <p class="literacy">{text}</p> })}
            <article class="strategy-body" inner_html=report.strategy_html.clone()></article>
            <p class="data-flags">
                {if report.economic_data_included { "Live economic data included. " } else { "Economic data unavailable. " }}
                {if report.bullish_analysis_included { "Market opportunities included." } else { "" }}
            </p>
        </section>
    }
}

/// Error and warning messages from the client-side checks
#[component]
pub fn MessageList(kind: &'static str, messages: ReadSignal<Vec<String>>) -> impl IntoView {
    view! {
        <ul class=kind>
            <For
                each=move || messages.get()
                key=|msg| msg.clone()
                children=move |msg| view! { <li>{msg}</li> }
            />
        </ul>
    }
}

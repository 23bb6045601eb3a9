//! Free-Text Description Page

use leptos::prelude::*;

use crate::api;
use crate::components::StrategyResult;

const EXAMPLE: &str = "I'm 34 and live in Canada. I earn about $7,000 a month and spend around $4,500. \
I have $20,000 saved and want to retire comfortably in 25 years. I'm fine with moderate risk.";

#[component]
pub fn DescribePage() -> impl IntoView {
    let (text, set_text) = signal(String::new());
    let (error, set_error) = signal(None::<String>);
    let (result, set_result) = signal(None::<api::StrategyView>);
    let (loading, set_loading) = signal(false);

    let send = move |_| {
        let description = text.get();
        if loading.get() {
            return;
        }
        if description.trim().is_empty() {
            set_error.set(Some("Please describe your financial situation first.".into()));
            return;
        }

        set_error.set(None);
        set_result.set(None);
        set_loading.set(true);
        leptos::task::spawn_local(async move {
            match api::request_strategy_from_text(&description).await {
                Ok(report) => set_result.set(Some(report)),
                Err(e) => set_error.set(Some(e)),
            }
            set_loading.set(false);
        });
    };

    view! {
        <div class="describe">
            <h2>"Describe your situation"</h2>
            <p>"Mention your age, country, income, expenses, savings, goals and how much risk you accept."</p>
            <textarea
                rows="8"
                placeholder=EXAMPLE
                prop:value=move || text.get()
                on:input=move |ev| set_text.set(event_target_value(&ev))
            />
            <div class="actions">
                <button class="btn" on:click=move |_| set_text.set(EXAMPLE.to_string())>"Use example"</button>
                <button class="btn btn-primary" on:click=send disabled=move || loading.get()>
                    {move || if loading.get() { "Analyzing..." } else { "Get my strategy" }}
                </button>
            </div>

            {move || error.get().map(|e| view! { <p class="error">{e}</p> })}
            {move || result.get().map(|report| view! { <StrategyResult report=report /> })}
        </div>
    }
}

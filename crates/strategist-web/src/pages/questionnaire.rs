//! Questionnaire Page

use leptos::prelude::*;

use crate::api;
use crate::components::{MessageList, StrategyResult};
use crate::form::{AGE_GROUPS, COUNTRIES, QuestionnaireForm, RISK_PROFILES};

#[component]
pub fn QuestionnairePage() -> impl IntoView {
    let (form, set_form) = signal(QuestionnaireForm::default());
    let (errors, set_errors) = signal(Vec::<String>::new());
    let (warnings, set_warnings) = signal(Vec::<String>::new());
    let (result, set_result) = signal(None::<api::StrategyView>);
    let (loading, set_loading) = signal(false);

    let submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if loading.get() {
            return;
        }

        let current = form.get();
        let check = current.check();
        set_warnings.set(check.warnings.clone());
        set_errors.set(check.errors.clone());
        if !check.is_ok() {
            return;
        }

        set_loading.set(true);
        set_result.set(None);
        let payload = current.to_payload();
        leptos::task::spawn_local(async move {
            match api::request_strategy(&payload).await {
                Ok(report) => set_result.set(Some(report)),
                Err(e) => set_errors.set(vec![e]),
            }
            set_loading.set(false);
        });
    };

    let options = |values: &'static [&'static str]| {
        values
            .iter()
            .map(|v| view! { <option value=*v>{*v}</option> })
            .collect_view()
    };

    view! {
        <div class="questionnaire">
            <h2>"Tell us about your finances"</h2>
            <form on:submit=submit>
                <div class="field">
                    <label>"Age group"</label>
                    <select on:change=move |ev| set_form.update(|f| f.age_group = event_target_value(&ev))>
                        <option value="">"Select..."</option>
                        {options(&AGE_GROUPS)}
                    </select>
                </div>
                <div class="field">
                    <label>"Country"</label>
                    <select on:change=move |ev| set_form.update(|f| f.country = event_target_value(&ev))>
                        <option value="">"Select..."</option>
                        {options(&COUNTRIES)}
                    </select>
                </div>
                <div class="field">
                    <label>"Monthly income"</label>
                    <input
                        type="text"
                        placeholder="6000"
                        prop:value=move || form.get().income
                        on:input=move |ev| set_form.update(|f| f.income = event_target_value(&ev))
                    />
                </div>
                <div class="field">
                    <label>"Monthly expenses"</label>
                    <input
                        type="text"
                        placeholder="4000"
                        prop:value=move || form.get().expenses
                        on:input=move |ev| set_form.update(|f| f.expenses = event_target_value(&ev))
                    />
                </div>
                <div class="field">
                    <label>"Current assets (optional)"</label>
                    <input
                        type="text"
                        prop:value=move || form.get().assets
                        on:input=move |ev| set_form.update(|f| f.assets = event_target_value(&ev))
                    />
                </div>
                <div class="field">
                    <label>"Current liabilities (optional)"</label>
                    <input
                        type="text"
                        prop:value=move || form.get().liabilities
                        on:input=move |ev| set_form.update(|f| f.liabilities = event_target_value(&ev))
                    />
                </div>
                <div class="field">
                    <label>"Risk tolerance"</label>
                    <select on:change=move |ev| set_form.update(|f| f.risk_profile = event_target_value(&ev))>
                        <option value="">"Select..."</option>
                        {options(&RISK_PROFILES)}
                    </select>
                </div>
                <div class="field">
                    <label>"Investment goal"</label>
                    <input
                        type="text"
                        placeholder="Retirement, a house deposit..."
                        prop:value=move || form.get().goal
                        on:input=move |ev| set_form.update(|f| f.goal = event_target_value(&ev))
                    />
                </div>
                <div class="field">
                    <label>"Timeframe"</label>
                    <input
                        type="text"
                        placeholder="10 years"
                        prop:value=move || form.get().timeframe
                        on:input=move |ev| set_form.update(|f| f.timeframe = event_target_value(&ev))
                    />
                </div>

                <MessageList kind="errors" messages=errors />
                <MessageList kind="warnings" messages=warnings />

                <button type="submit" class="btn btn-primary" disabled=move || loading.get()>
                    {move || if loading.get() { "Building your strategy..." } else { "Get my strategy" }}
                </button>
            </form>

            {move || result.get().map(|report| view! { <StrategyResult report=report /> })}
        </div>
    }
}

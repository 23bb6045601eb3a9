//! Service Status Page

use leptos::prelude::*;

use crate::api;

#[component]
pub fn StatusPage() -> impl IntoView {
    let (health, set_health) = signal(None::<Result<api::ServiceHealth, String>>);
    let (ping, set_ping) = signal(None::<Result<String, String>>);
    let (checked_at, set_checked_at) = signal(None::<String>);

    let refresh = move |_| {
        leptos::task::spawn_local(async move {
            set_ping.set(Some(api::test_service().await));
            set_health.set(Some(api::health().await));
            set_checked_at.set(Some(chrono::Local::now().format("%H:%M:%S").to_string()));
        });
    };

    view! {
        <div class="status">
            <h2>"Service status"</h2>
            <button class="btn" on:click=refresh>"Test Service"</button>

            {move || ping.get().map(|p| match p {
                Ok(message) => view! { <p class="ok">{message}</p> }.into_any(),
                Err(e) => view! { <p class="error">{format!("Service unreachable: {e}")}</p> }.into_any(),
            })}

            {move || health.get().and_then(Result::ok).map(|h| view! {
                <dl class="health">
                    <dt>"Status"</dt><dd>{h.status}</dd>
                    <dt>"Version"</dt><dd>{h.version}</dd>
                    <dt>"LLM provider"</dt><dd>{h.llm_provider}</dd>
                    <dt>"LLM connected"</dt>
                    <dd>{if h.llm_connected { "yes" } else { "no (rule-based strategies)" }}</dd>
                    <dt>"Features"</dt><dd>{h.features.join(", ")}</dd>
                </dl>
            })}

            {move || checked_at.get().map(|t| view! { <p class="checked">{format!("Last checked {t}")}</p> })}
        </div>
    }
}

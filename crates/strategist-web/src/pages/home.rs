//! Home Page

use leptos::prelude::*;

#[component]
pub fn HomePage() -> impl IntoView {
    view! {
        <div class="home">
            <header class="hero">
                <h1>"Finance Strategist"</h1>
                <p class="tagline">"A personal investment strategy built from your situation and live economic data"</p>
                <div class="cta">
                    <a href="/questionnaire" class="btn btn-primary">"Answer the questionnaire"</a>
                    <a href="/describe" class="btn">"Describe it in your own words"</a>
                </div>
            </header>

            <section class="features">
                <div class="feature">
                    <h3>"📈 Live data"</h3>
                    <p>"Inflation, interest rates and GDP growth from the World Bank, FRED and OECD, plus market trends."</p>
                </div>
                <div class="feature">
                    <h3>"🧾 Tax aware"</h3>
                    <p>"Country-specific tax strategies and an estimate of your annual tax."</p>
                </div>
                <div class="feature">
                    <h3>"🛟 Always answers"</h3>
                    <p>"If the AI advisor is offline you still get a rule-based strategy."</p>
                </div>
            </section>

            <p class="disclaimer">"Educational information only, not financial advice."</p>
        </div>
    }
}

//! Main App Component

use leptos::prelude::*;
use leptos_router::{components::*, path};

use crate::pages::{DescribePage, HomePage, QuestionnairePage, StatusPage};

/// Root application component
#[component]
pub fn App() -> impl IntoView {
    view! {
        <Router>
            <nav class="nav">
                <A href="/">"Home"</A>
                <A href="/questionnaire">"Questionnaire"</A>
                <A href="/describe">"Describe your situation"</A>
                <A href="/status">"Status"</A>
            </nav>
            <main class="app">
                <Routes fallback=|| view! { <p>"Page not found"</p> }>
                    <Route path=path!("/") view=HomePage />
                    <Route path=path!("/questionnaire") view=QuestionnairePage />
                    <Route path=path!("/describe") view=DescribePage />
                    <Route path=path!("/status") view=StatusPage />
                </Routes>
            </main>
        </Router>
    }
}

//! Main Leptos application component with routing

use crate::{
    components::sidebar::Sidebar,
    pages::{checkinout::CheckInOutPage, dashboard::Dashboard, not_found::NotFound},
    state::{AppState, browser_config},
};
use atems_core::nav::{APP_BASE_PATH, content_class};
use leptos::prelude::*;
use leptos_router::{
    components::{Route, Router, Routes},
    path,
};

/// Main application component
#[component]
pub fn App() -> impl IntoView {
    provide_context(AppState::new(browser_config()));
    let sidebar_open = RwSignal::new(true);

    view! {
        <Router base=APP_BASE_PATH>
            <div class="app-layout">
                <Sidebar open=sidebar_open />
                <main class=move || content_class(sidebar_open.get())>
                    <Routes fallback=|| view! { <NotFound /> }>
                        <Route path=path!("/") view=Dashboard />
                        <Route path=path!("/checkinout") view=CheckInOutPage />
                    </Routes>
                </main>
            </div>
        </Router>
    }
}

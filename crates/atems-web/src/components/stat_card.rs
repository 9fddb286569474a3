//! Dashboard statistic card

use leptos::prelude::*;

/// One labelled number on the dashboard
#[component]
pub fn StatCard(
    /// Card title
    label: &'static str,
    /// Count shown
    value: u64,
    /// `data-tooltip` key of the card
    tooltip: &'static str,
    /// Extra class for the card colour
    #[prop(default = "")]
    accent: &'static str,
) -> impl IntoView {
    view! {
        <div class=format!("stat-card {accent}")>
            <h3 class="stat-label" data-tooltip=tooltip>{label}</h3>
            <p class="stat-value">{value}</p>
        </div>
    }
}

//! Dashboard page showing inventory statistics and recent activity

use crate::{
    api_client::redirect_to_login,
    components::{
        loading::Loading,
        recent_activity::{HISTORY_ERROR_MESSAGE, RecentActivity},
        stat_card::StatCard,
    },
    state::use_app_state,
    tooltips::attach_tooltips,
};
use atems_core::{
    Error, HistoryEvent, Stats,
    query::{QueryState, fetch_with_retry},
    tooltips::Page,
};
use chrono::Utc;
use leptos::prelude::*;
use leptos_router::components::A;
use wasm_bindgen_futures::spawn_local;

/// Shown when the statistics cannot be loaded
pub const STATS_ERROR_MESSAGE: &str = "Failed to load stats. Log in at /login first.";

fn report_failure(error: &Error, what: &str) -> bool {
    if let Some(login_url) = error.login_url() {
        redirect_to_login(login_url);
        return true;
    }
    leptos::logging::warn!("Failed to load {what}: {error}");
    false
}

/// Main dashboard page component
#[component]
pub fn Dashboard() -> impl IntoView {
    let state = use_app_state();
    let (poll_interval, history_limit) = state.config.with_value(|config| {
        (
            config.dashboard.poll_interval(),
            config.dashboard.clamped_history_limit(),
        )
    });

    let initial = state
        .stats
        .with_untracked(|cache| cache.last().copied())
        .map_or(QueryState::Loading, QueryState::Ready);
    let stats = RwSignal::new(initial);
    let history = RwSignal::new(QueryState::<Vec<HistoryEvent>>::Loading);

    let refresh_stats = move || {
        if let Some(fresh) = state
            .stats
            .with_untracked(|cache| cache.fresh(Utc::now()).copied())
        {
            stats.set(QueryState::Ready(fresh));
            return;
        }

        let policy = state.stats.with_untracked(|cache| cache.policy());
        let api = state.api.get_value();
        spawn_local(async move {
            match fetch_with_retry(&policy, || api.get_stats()).await {
                Ok(fetched) => {
                    state.stats.update(|cache| cache.store(fetched, Utc::now()));
                    stats.try_set(QueryState::Ready(fetched));
                }
                Err(error) => {
                    if !report_failure(&error, "stats") {
                        stats.try_set(QueryState::Failed(STATS_ERROR_MESSAGE.to_string()));
                    }
                }
            }
        });
    };

    let refresh_history = move || {
        let api = state.api.get_value();
        spawn_local(async move {
            match api.get_history(history_limit).await {
                Ok(page) => {
                    history.try_set(QueryState::Ready(page.events));
                }
                Err(error) => {
                    if !report_failure(&error, "history") {
                        history.try_set(QueryState::Failed(HISTORY_ERROR_MESSAGE.to_string()));
                    }
                }
            }
        });
    };

    refresh_stats();
    refresh_history();

    let poll = set_interval_with_handle(
        move || {
            refresh_stats();
            refresh_history();
        },
        poll_interval,
    )
    .ok();
    on_cleanup(move || {
        if let Some(handle) = poll {
            handle.clear();
        }
    });

    // Cards are rendered once data arrives
    Effect::new(move |_| {
        stats.track();
        history.track();
        if let Err(error) = attach_tooltips(Page::Dashboard) {
            leptos::logging::warn!("{error}");
        }
    });

    view! {
        <div class="dashboard">
            <div class="page-header">
                <h2>"Tool Inventory"</h2>
                <A href="/checkinout" attr:class="btn btn-primary">"Check In/Out"</A>
            </div>
            {move || match stats.get() {
                QueryState::Loading => view! { <Loading message="Loading stats..." /> }.into_any(),
                QueryState::Failed(message) => {
                    view! { <div class="notice notice-error">{message}</div> }.into_any()
                }
                QueryState::Ready(stats) => view! { <StatGrid stats=stats /> }.into_any(),
            }}
            <RecentActivity events=history />
        </div>
    }
}

#[component]
fn StatGrid(stats: Stats) -> impl IntoView {
    view! {
        <div class="stat-grid">
            <StatCard label="Total Tools" value=stats.total_tools tooltip="total-tools" />
            <StatCard
                label="In Stock"
                value=stats.in_stock
                tooltip="in-stock"
                accent="stat-card-ok"
            />
            <StatCard
                label="Checked Out"
                value=stats.checked_out
                tooltip="checked-out"
                accent="stat-card-info"
            />
            <StatCard
                label="Calibration Overdue"
                value=stats.calibration_overdue
                tooltip="calibration-overdue"
                accent="stat-card-warning"
            />
        </div>
    }
}

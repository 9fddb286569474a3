//! Latest check-in/out events on the dashboard

use atems_core::{HistoryEvent, query::QueryState};
use leptos::prelude::*;

/// Shown when the history feed cannot be loaded
pub const HISTORY_ERROR_MESSAGE: &str = "Recent activity is unavailable.";

/// Recent activity panel
#[component]
pub fn RecentActivity(
    /// Latest events, newest first
    #[prop(into)]
    events: Signal<QueryState<Vec<HistoryEvent>>>,
) -> impl IntoView {
    view! {
        <section class="recent-activity">
            <h3 data-tooltip="recent-activity">"Recent Activity"</h3>
            {move || match events.get() {
                QueryState::Loading => view! { <p class="muted">"Loading..."</p> }.into_any(),
                QueryState::Failed(message) => {
                    view! { <p class="muted">{message}</p> }.into_any()
                }
                QueryState::Ready(events) if events.is_empty() => {
                    view! { <p class="muted">"No recent activity."</p> }.into_any()
                }
                QueryState::Ready(events) => {
                    view! {
                        <ul class="activity-list">
                            {events.into_iter().map(|event| view! { <ActivityRow event=event /> }).collect_view()}
                        </ul>
                    }
                        .into_any()
                }
            }}
        </section>
    }
}

#[component]
fn ActivityRow(event: HistoryEvent) -> impl IntoView {
    let time = event.time_label();
    let tool = event.tool_label().to_string();
    let action_class = format!("activity-action activity-{}", event.action);

    view! {
        <li class="activity-row">
            <span class="activity-time">{time}</span>
            <span class=action_class>{event.action}</span>
            <span class="activity-tool">{tool}</span>
            <span class="activity-user">{event.username}</span>
            {event.job_id.map(|job_id| view! { <span class="activity-job">{job_id}</span> })}
            {event.condition.map(|condition| view! { <span class="activity-condition">{condition}</span> })}
        </li>
    }
}

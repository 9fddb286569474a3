//! Check-in/out result message

use atems_core::Notice;
use leptos::prelude::*;

/// Message box styled by the notice tone; renders nothing without a notice
#[component]
pub fn NoticeBox(
    /// Notice to show
    #[prop(into)]
    notice: Signal<Option<Notice>>,
) -> impl IntoView {
    move || {
        notice.get().map(|notice| {
            view! {
                <div class=notice.tone.css_class() role="status">
                    {notice.text}
                </div>
            }
        })
    }
}

//! Collapsible navigation sidebar

use atems_core::nav::{
    NAV_ITEMS, NavItem, link_class, sidebar_class, strip_base, toggle_glyph, toggle_label,
};
use leptos::prelude::*;
use leptos_router::{components::A, hooks::use_location};

/// Sidebar with the fixed navigation list
#[component]
pub fn Sidebar(
    /// Open (labels shown) or collapsed (icons only)
    open: RwSignal<bool>,
) -> impl IntoView {
    view! {
        <nav class=move || sidebar_class(open.get())>
            <div class="sidebar-header">
                {move || open.get().then(|| view! { <h1 class="sidebar-title">"ATEMS"</h1> })}
                <button
                    class="sidebar-toggle"
                    type="button"
                    aria-label=move || toggle_label(open.get())
                    on:click=move |_| open.update(|open| *open = !*open)
                >
                    {move || toggle_glyph(open.get())}
                </button>
            </div>
            <ul class="nav-list">
                {NAV_ITEMS
                    .into_iter()
                    .map(|item| view! { <NavLink item=item open=open /> })
                    .collect_view()}
            </ul>
        </nav>
    }
}

#[component]
fn NavLink(item: NavItem, open: RwSignal<bool>) -> impl IntoView {
    let label = move || open.get().then(|| view! { <span class="nav-label">{item.label}</span> });

    if item.external {
        // Server-rendered page; the router must not handle it
        return view! {
            <li class="nav-item">
                <a href=item.path rel="external" class=link_class(false) title=item.label>
                    <span class="nav-icon">{item.icon}</span>
                    {label}
                </a>
            </li>
        }
            .into_any();
    }

    let location = use_location();
    let active = move || item.is_active(strip_base(&location.pathname.get()));

    view! {
        <li class="nav-item">
            <A href=item.path attr:class=move || link_class(active()) attr:title=item.label>
                <span class="nav-icon">{item.icon}</span>
                {label}
            </A>
        </li>
    }
        .into_any()
}

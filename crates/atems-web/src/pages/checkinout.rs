//! Check-in/out form driven by barcode scans
//!
//! A keyboard-wedge scanner types into the scan input and presses Enter; the
//! camera modal feeds the same entry point. Where a scan lands is decided by
//! [`ScanSession`].

use crate::{
    api_client::redirect_to_login,
    components::{camera_scanner::CameraScanner, notice::NoticeBox},
    state::use_app_state,
    tooltips::attach_tooltips,
};
use atems_core::{Condition, Notice, ScanOutcome, ScanSession, tooltips::Page};
use leptos::{ev, html, prelude::*};
use wasm_bindgen_futures::spawn_local;

/// True when `event` is the Enter a keyboard-wedge scanner sends after a
/// code. The enclosing form's default submit is suppressed.
pub fn take_scan_enter(event: &ev::KeyboardEvent) -> bool {
    if event.key() != "Enter" {
        return false;
    }
    event.prevent_default();
    true
}

/// Check-in/out page component
#[component]
pub fn CheckInOutPage() -> impl IntoView {
    let state = use_app_state();
    let auto_submit_delay = state
        .config
        .with_value(|config| config.scanner.auto_submit_delay());

    let session = RwSignal::new(ScanSession::new());
    let scan_value = RwSignal::new(String::new());
    let notice = RwSignal::new(None::<Notice>);
    let submitting = RwSignal::new(false);
    let camera_open = RwSignal::new(false);
    let scan_input = NodeRef::<html::Input>::new();

    let focus_scan = move || {
        if let Some(input) = scan_input.get_untracked()
            && let Err(error) = input.focus()
        {
            leptos::logging::warn!("Failed to focus the scan input: {error:?}");
        }
    };

    let submit = move || {
        let request = match session.with_untracked(ScanSession::to_request) {
            Ok(request) => request,
            Err(error) => {
                notice.set(Notice::from_error(&error));
                return;
            }
        };

        submitting.set(true);
        let api = state.api.get_value();
        spawn_local(async move {
            match api.check_in_out(&request).await {
                Ok(response) => {
                    if response.is_success() {
                        session.try_update(ScanSession::clear_identity);
                        focus_scan();
                    }
                    notice.try_set(Some(Notice::from_response(&response)));
                }
                Err(error) => match error.login_url() {
                    Some(login_url) => redirect_to_login(login_url),
                    None => {
                        leptos::logging::error!("Check-in/out failed: {error}");
                        notice.try_set(Notice::from_error(&error));
                    }
                },
            }
            submitting.try_set(false);
        });
    };

    let lookup_user = move |badge_id: String| {
        let api = state.api.get_value();
        spawn_local(async move {
            match api.lookup_user(&badge_id).await {
                Ok(username) => {
                    // Dropped when the badge was submitted or replaced meanwhile
                    let applied = session
                        .try_update(|session| session.apply_lookup_for(&badge_id, username))
                        .unwrap_or(false);
                    if !applied {
                        leptos::logging::log!("Ignoring late lookup for badge {badge_id}");
                    }
                }
                Err(error) => match error.login_url() {
                    Some(login_url) => redirect_to_login(login_url),
                    None => leptos::logging::warn!("User lookup for {badge_id} failed: {error}"),
                },
            }
        });
    };

    let dispatch = move |raw: String| {
        let outcome = session.try_update(|session| session.accept_scan(&raw));
        scan_value.set(String::new());
        focus_scan();

        if let Some(ScanOutcome::BadgeCaptured { badge_id }) = outcome {
            lookup_user(badge_id);
            // Reads the form when the timer fires, so a lookup that lands
            // later submits nothing
            set_timeout(
                move || {
                    let ready = session
                        .try_with_untracked(ScanSession::ready_to_auto_submit)
                        .unwrap_or(false);
                    if ready {
                        submit();
                    }
                },
                auto_submit_delay,
            );
        }
    };

    let on_scan_keydown = move |event: ev::KeyboardEvent| {
        if take_scan_enter(&event) {
            dispatch(scan_value.get_untracked());
        }
    };

    let on_submit = move |event: ev::SubmitEvent| {
        event.prevent_default();
        submit();
    };

    Effect::new(move |_| {
        focus_scan();
        if let Err(error) = attach_tooltips(Page::CheckInOut) {
            leptos::logging::warn!("{error}");
        }
    });

    view! {
        <div class="checkinout">
            <h2>"Tool Check In/Out"</h2>

            <div class="scan-bar">
                <input
                    class="scan-input"
                    type="text"
                    autocomplete="off"
                    node_ref=scan_input
                    placeholder=move || session.with(ScanSession::prompt)
                    prop:value=move || scan_value.get()
                    on:input=move |event| scan_value.set(event_target_value(&event))
                    on:keydown=on_scan_keydown
                />
                <button
                    class="btn btn-secondary"
                    type="button"
                    on:click=move |_| camera_open.set(true)
                >
                    "Scan with camera"
                </button>
            </div>

            <NoticeBox notice=notice />

            <form class="checkinout-form" on:submit=on_submit>
                <label data-tooltip="tool-id">
                    "Tool ID"
                    <input
                        type="text"
                        name="tool_id_number"
                        prop:value=move || session.with(|session| session.tool_id().to_string())
                        on:input=move |event| {
                            session.update(|session| session.set_tool_id(event_target_value(&event)));
                        }
                    />
                </label>
                <label data-tooltip="badge-id">
                    "Badge ID"
                    <input
                        type="text"
                        name="badge_id"
                        prop:value=move || session.with(|session| session.badge_id().to_string())
                        on:input=move |event| {
                            session.update(|session| session.set_badge_id(event_target_value(&event)));
                        }
                    />
                </label>
                <label data-tooltip="username">
                    "Username"
                    <input
                        type="text"
                        name="username"
                        prop:value=move || session.with(|session| session.username().to_string())
                        on:input=move |event| {
                            session.update(|session| session.set_username(event_target_value(&event)));
                        }
                    />
                </label>
                <label data-tooltip="job-id">
                    "Job ID"
                    <input
                        type="text"
                        name="job_id"
                        prop:value=move || session.with(|session| session.job_id().to_string())
                        on:input=move |event| {
                            session.update(|session| session.set_job_id(event_target_value(&event)));
                        }
                    />
                </label>
                <label data-tooltip="condition">
                    "Condition"
                    <select
                        name="condition"
                        prop:value=move || {
                            session
                                .with(|session| session.condition().map(Condition::as_str))
                                .unwrap_or_default()
                        }
                        on:change=move |event| {
                            match Condition::parse_optional(&event_target_value(&event)) {
                                Ok(condition) => session.update(|session| session.set_condition(condition)),
                                Err(error) => notice.set(Notice::from_error(&error)),
                            }
                        }
                    >
                        <option value="">"Not reported"</option>
                        {Condition::ALL
                            .into_iter()
                            .map(|condition| {
                                view! { <option value=condition.as_str()>{condition.as_str()}</option> }
                            })
                            .collect_view()}
                    </select>
                </label>
                <button
                    class="btn btn-primary"
                    type="submit"
                    data-tooltip="submit-btn"
                    disabled=move || submitting.get()
                >
                    {move || if submitting.get() { "Submitting..." } else { "Submit" }}
                </button>
            </form>

            <Show when=move || camera_open.get()>
                <CameraScanner
                    on_decode=Callback::new(move |text: String| dispatch(text))
                    on_error=Callback::new(move |message: String| {
                        notice.set(Some(Notice::error(message)));
                    })
                    on_close=Callback::new(move |()| camera_open.set(false))
                />
            </Show>
        </div>
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use wasm_bindgen_test::wasm_bindgen_test;
    use web_sys::KeyboardEventInit;

    fn keydown(key: &str) -> ev::KeyboardEvent {
        let init = KeyboardEventInit::new();
        init.set_key(key);
        init.set_cancelable(true);
        ev::KeyboardEvent::new_with_keyboard_event_init_dict("keydown", &init).unwrap()
    }

    #[wasm_bindgen_test]
    fn test_enter_finishes_scan_without_submitting_form() {
        let event = keydown("Enter");

        assert!(take_scan_enter(&event));
        assert!(event.default_prevented());
    }

    #[wasm_bindgen_test]
    fn test_other_keys_reach_the_input() {
        let event = keydown("A");

        assert!(!take_scan_enter(&event));
        assert!(!event.default_prevented());
    }
}

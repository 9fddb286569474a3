//! Modal with a live camera view that decodes one barcode

use crate::camera::CameraSession;
use leptos::prelude::*;
use send_wrapper::SendWrapper;
use wasm_bindgen_futures::spawn_local;

/// Element the scanner library renders the camera view into
pub const READER_ELEMENT_ID: &str = "qr-reader";

/// Camera scanner modal. Opens the camera when mounted; the first decoded
/// text is passed to `on_decode`, then the camera stops and the modal asks
/// to be closed.
#[component]
pub fn CameraScanner(
    /// Receives the decoded text
    on_decode: Callback<String>,
    /// Receives a start failure
    on_error: Callback<String>,
    /// Asks the parent to unmount the modal
    on_close: Callback<()>,
) -> impl IntoView {
    let session: StoredValue<Option<SendWrapper<CameraSession>>> = StoredValue::new(None);
    let decoded = StoredValue::new(false);

    let stop = move || {
        if let Some(active) = session.try_update_value(Option::take).flatten() {
            spawn_local(async move { active.take().stop().await });
        }
    };

    Effect::new(move |_| {
        spawn_local(async move {
            let started = CameraSession::start(READER_ELEMENT_ID, move |text: String| {
                if decoded.try_get_value().unwrap_or(true) {
                    return;
                }
                decoded.set_value(true);
                stop();
                on_decode.run(text);
                on_close.run(());
            })
            .await;

            match started {
                Ok(active) => {
                    // Modal closed while the camera was starting
                    if let Some(Some(orphan)) =
                        session.try_set_value(Some(SendWrapper::new(active)))
                    {
                        orphan.take().stop().await;
                    }
                }
                Err(error) => {
                    leptos::logging::error!("{error}");
                    on_error.run(error.to_string());
                    on_close.run(());
                }
            }
        });
    });

    on_cleanup(stop);

    view! {
        <div class="modal-backdrop">
            <div class="modal camera-modal" role="dialog" aria-label="Scan with camera">
                <h3>"Scan with camera"</h3>
                <div id=READER_ELEMENT_ID class="camera-view"></div>
                <button
                    class="btn btn-secondary"
                    type="button"
                    on:click=move |_| {
                        stop();
                        on_close.run(());
                    }
                >
                    "Cancel"
                </button>
            </div>
        </div>
    }
}

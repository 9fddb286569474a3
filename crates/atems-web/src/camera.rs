//! Camera barcode scanning through the `Html5Qrcode` JavaScript library
//!
//! The library is loaded by the host page. Start failures (library missing,
//! camera denied, no camera) come back as [`Error::Camera`].

use atems_core::{Error, Result};
use js_sys::{Object, Reflect};
use wasm_bindgen::{JsValue, closure::Closure, prelude::wasm_bindgen};

/// Global name the library registers
pub const LIBRARY_NAME: &str = "Html5Qrcode";

/// Frames scanned per second
const SCAN_FPS: f64 = 10.0;

/// Edge of the square scan box in pixels
const SCAN_BOX: f64 = 250.0;

#[wasm_bindgen]
extern "C" {
    type Html5Qrcode;

    #[wasm_bindgen(constructor, catch)]
    fn new(element_id: &str) -> std::result::Result<Html5Qrcode, JsValue>;

    #[wasm_bindgen(method, catch)]
    async fn start(
        this: &Html5Qrcode,
        camera: JsValue,
        config: JsValue,
        on_success: &Closure<dyn FnMut(String)>,
        on_failure: &Closure<dyn FnMut(JsValue)>,
    ) -> std::result::Result<JsValue, JsValue>;

    #[wasm_bindgen(method, catch)]
    async fn stop(this: &Html5Qrcode) -> std::result::Result<JsValue, JsValue>;
}

fn camera_error(context: &str, error: &JsValue) -> Error {
    let detail = error
        .as_string()
        .or_else(|| {
            Reflect::get(error, &JsValue::from_str("message"))
                .ok()
                .and_then(|message| message.as_string())
        })
        .unwrap_or_else(|| format!("{error:?}"));
    Error::Camera(format!("{context}: {detail}"))
}

/// True when the host page loaded the scanner library
pub fn library_available() -> bool {
    Reflect::has(&js_sys::global(), &JsValue::from_str(LIBRARY_NAME)).unwrap_or(false)
}

fn object(entries: &[(&str, JsValue)]) -> Result<JsValue> {
    let object = Object::new();
    for (key, value) in entries {
        Reflect::set(&object, &JsValue::from_str(key), value)
            .map_err(|e| camera_error("Failed to build scanner options", &e))?;
    }
    Ok(object.into())
}

/// A running camera scan. The decode callback stays alive as long as the
/// session does.
pub struct CameraSession {
    scanner: Html5Qrcode,
    on_success: Closure<dyn FnMut(String)>,
    on_failure: Closure<dyn FnMut(JsValue)>,
}

impl std::fmt::Debug for CameraSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CameraSession").finish_non_exhaustive()
    }
}

impl CameraSession {
    /// Open the rear camera inside the element with id `element_id` and call
    /// `on_decode` with every decoded text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Camera`] when the library is missing or the camera
    /// cannot be started. A partially started camera is stopped first.
    pub async fn start(
        element_id: &str,
        on_decode: impl FnMut(String) + 'static,
    ) -> Result<Self> {
        if !library_available() {
            return Err(Error::Camera(format!(
                "{LIBRARY_NAME} library is not loaded"
            )));
        }

        let scanner =
            Html5Qrcode::new(element_id).map_err(|e| camera_error("Failed to create scanner", &e))?;
        let session = Self {
            scanner,
            on_success: Closure::new(on_decode),
            // Called for every frame without a code
            on_failure: Closure::new(|_: JsValue| {}),
        };

        let camera = object(&[("facingMode", JsValue::from_str("environment"))])?;
        let config = object(&[
            ("fps", JsValue::from_f64(SCAN_FPS)),
            ("qrbox", JsValue::from_f64(SCAN_BOX)),
        ])?;

        let started = session
            .scanner
            .start(camera, config, &session.on_success, &session.on_failure)
            .await;
        if let Err(e) = started {
            session.stop().await;
            return Err(camera_error("Failed to start camera", &e));
        }

        leptos::logging::log!("Camera scanner started");
        Ok(session)
    }

    /// Stop the camera. Stopping a scanner that never started is not an
    /// error worth reporting.
    pub async fn stop(self) {
        if let Err(e) = self.scanner.stop().await {
            leptos::logging::warn!("Camera stop failed: {e:?}");
        }
    }
}

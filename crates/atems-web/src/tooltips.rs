//! Help icons with hover popups on elements tagged `data-tooltip`

use atems_core::{
    Error, Result,
    tooltips::{HIDDEN_CLASS, ICON_CLASS, POPUP_CLASS, Page, selector},
};
use wasm_bindgen::{JsCast, JsValue, closure::Closure};
use web_sys::Element;

fn dom_error(error: &JsValue) -> Error {
    Error::Other(format!("DOM operation failed: {error:?}"))
}

/// Attach help icons to every tagged element of `page` in the document.
/// Returns how many icons were added.
///
/// # Errors
///
/// Returns an error if the DOM cannot be queried or modified.
pub fn attach_tooltips(page: Page) -> Result<usize> {
    let Some(document) = web_sys::window().and_then(|window| window.document()) else {
        return Ok(0);
    };

    let Some(root) = document.document_element() else {
        return Ok(0);
    };
    attach_tooltips_in(&root, page)
}

/// Attach help icons to every tagged element of `page` below `root`.
/// Returns how many icons were added.
///
/// # Errors
///
/// Returns an error if the DOM cannot be queried or modified.
pub fn attach_tooltips_in(root: &Element, page: Page) -> Result<usize> {
    let mut added = 0;
    for (key, text) in page.entries() {
        let elements = root
            .query_selector_all(&selector(key))
            .map_err(|e| dom_error(&e))?;
        for index in 0..elements.length() {
            let Some(element) = elements
                .item(index)
                .and_then(|node| node.dyn_into::<Element>().ok())
            else {
                continue;
            };
            if add_tooltip(&element, text)? {
                added += 1;
            }
        }
    }
    Ok(added)
}

/// Append a `?` icon carrying `text` to `element`. Elements that already
/// carry an icon are left alone; returns whether an icon was added.
///
/// # Errors
///
/// Returns an error if the DOM cannot be modified.
pub fn add_tooltip(element: &Element, text: &str) -> Result<bool> {
    let existing = element
        .query_selector(&format!(".{ICON_CLASS}"))
        .map_err(|e| dom_error(&e))?;
    if existing.is_some() {
        return Ok(false);
    }

    let Some(document) = element.owner_document() else {
        return Ok(false);
    };

    let icon = document
        .create_element("span")
        .map_err(|e| dom_error(&e))?;
    icon.set_class_name(ICON_CLASS);
    icon.set_text_content(Some("?"));

    let popup = document
        .create_element("span")
        .map_err(|e| dom_error(&e))?;
    popup.set_class_name(&format!("{POPUP_CLASS} {HIDDEN_CLASS}"));
    popup.set_text_content(Some(text));

    icon.append_child(&popup).map_err(|e| dom_error(&e))?;
    element.append_child(&icon).map_err(|e| dom_error(&e))?;

    let shown = popup.clone();
    let show = Closure::<dyn FnMut()>::new(move || {
        let _ = shown.class_list().remove_1(HIDDEN_CLASS);
    });
    let hide = Closure::<dyn FnMut()>::new(move || {
        let _ = popup.class_list().add_1(HIDDEN_CLASS);
    });

    icon.add_event_listener_with_callback("mouseenter", show.as_ref().unchecked_ref())
        .map_err(|e| dom_error(&e))?;
    icon.add_event_listener_with_callback("mouseleave", hide.as_ref().unchecked_ref())
        .map_err(|e| dom_error(&e))?;

    // Listeners live as long as the icon
    show.forget();
    hide.forget();

    Ok(true)
}

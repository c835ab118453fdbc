use wasm_bindgen::JsCast;
use web_sys as web;

/// Class that hides the photo upload controls.
pub const UI_HIDDEN_CLASS: &str = "ui-hidden";
pub const UPLOAD_WRAPPER_SELECTOR: &str = ".upload-wrapper";

#[inline]
pub fn window_document() -> Option<web::Document> {
    web::window().and_then(|w| w.document())
}

pub fn toggle_upload_controls(document: &web::Document) {
    match document.query_selector(UPLOAD_WRAPPER_SELECTOR) {
        Ok(Some(el)) => {
            let _ = el.class_list().toggle(UI_HIDDEN_CLASS);
        }
        _ => log::debug!("[ui] no {UPLOAD_WRAPPER_SELECTOR} element"),
    }
}

// 'H' shows or hides the upload controls
pub fn wire_controls_toggle_h(document: &web::Document) {
    if let Some(window) = web::window() {
        let doc = document.clone();
        let closure =
            wasm_bindgen::closure::Closure::wrap(Box::new(move |ev: web::KeyboardEvent| {
                let key = ev.key();
                if key == "h" || key == "H" {
                    toggle_upload_controls(&doc);
                    ev.prevent_default();
                }
            }) as Box<dyn FnMut(_)>);
        let _ =
            window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

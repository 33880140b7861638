//! Browser entry point: binds the page effects to the live document.
//!
//! Build with `wasm-pack build --target web apps/web` and load the generated
//! module from the portfolio page. Settings may be supplied inline:
//!
//! ```html
//! <script type="application/toml" id="portfolio-settings">
//! rotation_interval_ms = 8000
//! </script>
//! ```

mod host;
mod logging;
mod runtime;

use std::{cell::RefCell, rc::Rc};

use portfolio_core::load_settings;
use shared::protocol::PageEvent;
use wasm_bindgen::{closure::Closure, prelude::*, JsCast as _};
use web_sys::{Document, Window};

use crate::runtime::Runtime;

const SETTINGS_ELEMENT_ID: &str = "portfolio-settings";

#[cfg_attr(all(target_arch = "wasm32", not(test)), wasm_bindgen(start))]
pub fn start() -> Result<(), JsValue> {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    logging::init_logging(logging::default_level());

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no global window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("window has no document"))?;

    let raw_settings = document
        .get_element_by_id(SETTINGS_ELEMENT_ID)
        .and_then(|element| element.text_content());
    let settings = load_settings(raw_settings.as_deref());

    let runtime = Runtime::install(window.clone(), document.clone(), settings);
    wire_lifecycle(&window, &document, runtime)
}

/// Delivers `DomContentLoaded` and `Load`, immediately when the document is
/// already past those stages. The lifecycle listeners own the runtime, which
/// keeps it alive for the page's lifetime.
fn wire_lifecycle(
    window: &Window,
    document: &Document,
    runtime: Rc<RefCell<Runtime>>,
) -> Result<(), JsValue> {
    let state = document.ready_state();

    let ready_runtime = runtime.clone();
    let on_ready = Closure::<dyn FnMut()>::new(move || {
        Runtime::deliver(&ready_runtime, PageEvent::DomContentLoaded);
    });
    let load_runtime = runtime.clone();
    let on_load = Closure::<dyn FnMut()>::new(move || {
        Runtime::deliver(&load_runtime, PageEvent::Load);
    });

    match state.as_str() {
        "loading" => {
            document.add_event_listener_with_callback(
                "DOMContentLoaded",
                on_ready.as_ref().unchecked_ref(),
            )?;
            window.add_event_listener_with_callback("load", on_load.as_ref().unchecked_ref())?;
        }
        "interactive" => {
            Runtime::deliver(&runtime, PageEvent::DomContentLoaded);
            window.add_event_listener_with_callback("load", on_load.as_ref().unchecked_ref())?;
        }
        _ => {
            Runtime::deliver(&runtime, PageEvent::DomContentLoaded);
            Runtime::deliver(&runtime, PageEvent::Load);
        }
    }

    on_ready.forget();
    on_load.forget();
    Ok(())
}

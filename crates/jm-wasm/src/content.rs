//! Content script: one engine per page.

use std::cell::RefCell;

use log::{trace, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Event, MutationObserver, Node};

use jm_core::{EngineConfig, RedactionEngine};

use crate::chrome;
use crate::dom::{mutations_from_records, WebPage};

struct ContentScript {
    engine: RedactionEngine,
    page: WebPage,
}

thread_local! {
    static CONTENT: RefCell<Option<ContentScript>> = const { RefCell::new(None) };
}

/// Run `f` against the page's engine, if started and not already borrowed.
fn with_content<R>(f: impl FnOnce(&mut RedactionEngine, &mut WebPage) -> R) -> Option<R> {
    CONTENT.with(|cell| match cell.try_borrow_mut() {
        Ok(mut guard) => guard
            .as_mut()
            .map(|content| f(&mut content.engine, &mut content.page)),
        Err(_) => {
            warn!("Content script busy, event dropped");
            None
        }
    })
}

pub fn is_started() -> bool {
    CONTENT.with(|cell| cell.borrow().is_some())
}

pub fn is_enabled() -> bool {
    with_content(|engine, _| engine.is_enabled()).unwrap_or(false)
}

/// Build the engine, read the persisted flag and listen for toggles.
pub fn start(config: EngineConfig) -> Result<(), JsValue> {
    if is_started() {
        return Err(JsValue::from_str("Content script already started"));
    }

    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("No document available"))?;

    let engine = RedactionEngine::from_config(config)
        .map_err(|e| JsValue::from_str(&format!("Failed to build engine: {}", e)))?;
    let storage_key = engine.config().storage_key.clone();

    let on_mutations = Closure::<dyn FnMut(js_sys::Array, MutationObserver)>::new(
        |records: js_sys::Array, _observer: MutationObserver| {
            let batch = mutations_from_records(&records);
            if let Some(report) = with_content(|engine, page| engine.process_mutations(page, batch)) {
                trace!("Mutation batch: {report:?}");
            }
        },
    );

    let on_input = Closure::<dyn FnMut(Event)>::new(|event: Event| {
        let Some(field) = event.target().and_then(|t| t.dyn_into::<Node>().ok()) else {
            return;
        };
        with_content(|engine, page| engine.handle_input(page, &field));
    });

    let page = WebPage::new(document, on_mutations, on_input)?;
    CONTENT.with(|cell| *cell.borrow_mut() = Some(ContentScript { engine, page }));

    chrome::add_message_listener(|message| with_content(|engine, page| engine.handle_message(page, &message)))?;

    chrome::load_flag(&storage_key, |stored| {
        with_content(|engine, page| engine.load(page, stored));
    })
}

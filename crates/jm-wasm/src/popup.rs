//! Popup: binds the checkbox to the persisted flag.

use std::cell::RefCell;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Event, HtmlInputElement};

use jm_core::{ActivePage, ContentMessage, Error, FlagStore, ToggleController};

use crate::chrome;

/// `chrome.storage.sync` under one key.
pub struct SyncStore {
    key: String,
}

impl FlagStore for SyncStore {
    fn store(&mut self, enabled: bool) -> jm_core::Result<()> {
        chrome::store_flag(&self.key, enabled).map_err(|e| Error::Store(chrome::error_string(&e)))
    }
}

/// Active tab of the current window.
pub struct ActiveTab;

impl ActivePage for ActiveTab {
    fn notify(&mut self, message: &ContentMessage) -> jm_core::Result<()> {
        chrome::notify_active_tab(message).map_err(|e| Error::Delivery(chrome::error_string(&e)))
    }
}

struct Popup {
    controller: ToggleController<SyncStore, ActiveTab>,
    _on_change: Closure<dyn FnMut(Event)>,
}

thread_local! {
    static POPUP: RefCell<Option<Popup>> = const { RefCell::new(None) };
}

/// Initialize the checkbox with id `checkbox_id` from storage and persist
/// every change.
pub fn start(checkbox_id: &str, storage_key: &str) -> Result<(), JsValue> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("No document available"))?;
    let toggle: HtmlInputElement = document
        .get_element_by_id(checkbox_id)
        .ok_or_else(|| JsValue::from_str(&format!("No element with id '{}'", checkbox_id)))?
        .dyn_into()
        .map_err(|_| JsValue::from_str(&format!("'{}' is not an input element", checkbox_id)))?;

    let key = storage_key.to_string();
    chrome::load_flag(storage_key, move |stored| {
        let store = SyncStore { key };
        let controller = ToggleController::activate(stored, store, ActiveTab);
        toggle.set_checked(controller.checked());

        let on_change = Closure::<dyn FnMut(Event)>::new({
            let toggle = toggle.clone();
            move |_event: Event| {
                let enabled = toggle.checked();
                POPUP.with(|cell| {
                    if let Some(popup) = cell.borrow_mut().as_mut() {
                        popup.controller.change(enabled);
                    }
                });
            }
        });
        let _ = toggle.add_event_listener_with_callback("change", on_change.as_ref().unchecked_ref());

        POPUP.with(|cell| {
            *cell.borrow_mut() = Some(Popup {
                controller,
                _on_change: on_change,
            })
        });
    })
}

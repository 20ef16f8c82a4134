//! Thin bindings to the extension APIs.
//!
//! Every call uses the callback form so a missing receiver or a storage error
//! surfaces through `chrome.runtime.lastError` instead of a rejected promise.

use js_sys::{Function, Reflect};
use log::debug;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use jm_core::state::{flag_items, read_flag};
use jm_core::{Ack, ContentMessage};

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(catch, js_namespace = ["chrome", "storage", "sync"], js_name = get)]
    fn storage_sync_get(keys: &JsValue, callback: &Function) -> Result<(), JsValue>;

    #[wasm_bindgen(catch, js_namespace = ["chrome", "storage", "sync"], js_name = set)]
    fn storage_sync_set(items: &JsValue, callback: &Function) -> Result<(), JsValue>;

    #[wasm_bindgen(catch, js_namespace = ["chrome", "runtime", "onMessage"], js_name = addListener)]
    fn on_message_add_listener(listener: &Function) -> Result<(), JsValue>;

    #[wasm_bindgen(catch, js_namespace = ["chrome", "tabs"], js_name = query)]
    fn tabs_query(query_info: &JsValue, callback: &Function) -> Result<(), JsValue>;

    #[wasm_bindgen(catch, js_namespace = ["chrome", "tabs"], js_name = sendMessage)]
    fn tabs_send_message(tab_id: i32, message: &JsValue, callback: &Function) -> Result<(), JsValue>;
}

/// Message of `chrome.runtime.lastError`, if one is set. Reading it also
/// marks the error as checked.
fn last_error() -> Option<String> {
    let chrome = Reflect::get(&js_sys::global(), &"chrome".into()).ok()?;
    let runtime = Reflect::get(&chrome, &"runtime".into()).ok()?;
    let error = Reflect::get(&runtime, &"lastError".into()).ok()?;
    if error.is_undefined() || error.is_null() {
        return None;
    }
    Reflect::get(&error, &"message".into())
        .ok()
        .and_then(|m| m.as_string())
        .or_else(|| Some("unknown error".to_string()))
}

pub(crate) fn to_json(value: &JsValue) -> Option<serde_json::Value> {
    let text = js_sys::JSON::stringify(value).ok()?.as_string()?;
    serde_json::from_str(&text).ok()
}

pub(crate) fn from_json(value: &serde_json::Value) -> Result<JsValue, JsValue> {
    js_sys::JSON::parse(&value.to_string())
}

pub(crate) fn error_string(value: &JsValue) -> String {
    value
        .as_string()
        .or_else(|| value.dyn_ref::<js_sys::Error>().map(|e| String::from(e.message())))
        .unwrap_or_else(|| format!("{value:?}"))
}

/// Read the flag under `key` and hand it to `on_loaded` (`None` when absent).
pub fn load_flag(key: &str, on_loaded: impl FnOnce(Option<bool>) + 'static) -> Result<(), JsValue> {
    let keys = js_sys::Array::of1(&JsValue::from_str(key));
    let key = key.to_string();
    let callback = Closure::once_into_js(move |items: JsValue| {
        if let Some(error) = last_error() {
            debug!("Storage read failed, using default: {error}");
        }
        let stored = to_json(&items).and_then(|items| read_flag(&items, &key));
        on_loaded(stored);
    });
    storage_sync_get(&keys, callback.unchecked_ref())
}

/// Persist the flag. Completion is not awaited.
pub fn store_flag(key: &str, enabled: bool) -> Result<(), JsValue> {
    let items = from_json(&flag_items(key, enabled))?;
    let callback = Closure::once_into_js(|| {
        if let Some(error) = last_error() {
            log::warn!("Failed to persist flag: {error}");
        }
    });
    storage_sync_set(&items, callback.unchecked_ref())
}

/// Register `handler` for messages addressed to this page. Messages that do
/// not parse are left for other listeners.
pub fn add_message_listener(mut handler: impl FnMut(ContentMessage) -> Option<Ack> + 'static) -> Result<(), JsValue> {
    let listener = Closure::<dyn FnMut(JsValue, JsValue, Function) -> bool>::new(
        move |request: JsValue, _sender: JsValue, send_response: Function| {
            let Some(message) = to_json(&request).and_then(|v| serde_json::from_value::<ContentMessage>(v).ok()) else {
                return false;
            };
            if let Some(ack) = handler(message) {
                let reply = serde_json::to_value(&ack)
                    .ok()
                    .and_then(|v| from_json(&v).ok())
                    .unwrap_or(JsValue::UNDEFINED);
                let _ = send_response.call1(&JsValue::NULL, &reply);
            }
            false
        },
    );
    on_message_add_listener(listener.as_ref().unchecked_ref())?;
    // Lives as long as the page.
    listener.forget();
    Ok(())
}

/// Send `message` to the active tab of the current window. Delivery failures
/// after dispatch are logged and dropped.
pub fn notify_active_tab(message: &ContentMessage) -> Result<(), JsValue> {
    let payload = serde_json::to_value(message).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let payload = from_json(&payload)?;

    let query = js_sys::Object::new();
    let _ = Reflect::set(&query, &"active".into(), &JsValue::from(true));
    let _ = Reflect::set(&query, &"currentWindow".into(), &JsValue::from(true));

    let callback = Closure::once_into_js(move |tabs: JsValue| {
        let tabs = js_sys::Array::from(&tabs);
        let tab_id = Reflect::get(&tabs.get(0), &"id".into())
            .ok()
            .and_then(|id| id.as_f64());
        let Some(tab_id) = tab_id else {
            debug!("No active tab to notify");
            return;
        };

        let on_reply = Closure::once_into_js(|_reply: JsValue| {
            if let Some(error) = last_error() {
                debug!("Toggle message not delivered: {error}");
            }
        });
        if let Err(e) = tabs_send_message(tab_id as i32, &payload, on_reply.unchecked_ref()) {
            debug!("Toggle message not delivered: {}", error_string(&e));
        }
    });
    tabs_query(&query, callback.unchecked_ref())
}

//! WebAssembly bindings for jobmask
//!
//! `start_content_script` runs in every page, `start_popup` in the extension
//! popup. Both read the enabled flag from `chrome.storage.sync`.

mod chrome;
mod content;
mod dom;
mod logger;
mod popup;

use std::sync::OnceLock;

use wasm_bindgen::prelude::*;

use jm_core::{Censor, EngineConfig};

static DEFAULT_CENSOR: OnceLock<Option<Censor>> = OnceLock::new();

fn parse_config(config_json: Option<String>) -> Result<EngineConfig, JsValue> {
    match config_json {
        Some(text) => EngineConfig::from_json(&text)
            .map_err(|e| JsValue::from_str(&format!("Invalid config: {}", e))),
        None => Ok(EngineConfig::default()),
    }
}

#[wasm_bindgen]
pub fn set_log_level(level: &str) {
    logger::init(logger::parse_level(level));
}

/// Start redacting the current page. `config_json` is an optional
/// `EngineConfig` as JSON.
#[wasm_bindgen]
pub fn start_content_script(config_json: Option<String>) -> Result<(), JsValue> {
    logger::init(log::max_level().max(log::LevelFilter::Warn));
    let config = parse_config(config_json)?;
    content::start(config)
}

#[wasm_bindgen]
pub fn is_censoring_enabled() -> bool {
    content::is_enabled()
}

/// Bind the popup checkbox (default id `enableCensorToggle`). Pass the same
/// `config_json` as the content script so both use one storage key.
#[wasm_bindgen]
pub fn start_popup(checkbox_id: Option<String>, config_json: Option<String>) -> Result<(), JsValue> {
    logger::init(log::max_level().max(log::LevelFilter::Warn));
    let config = parse_config(config_json)?;
    let id = checkbox_id.unwrap_or_else(|| "enableCensorToggle".to_string());
    popup::start(&id, &config.storage_key)
}

/// Censor a string with the built-in blocklist, regardless of the flag.
#[wasm_bindgen]
pub fn censor_text(text: &str) -> String {
    let censor = DEFAULT_CENSOR.get_or_init(|| Censor::from_config(&EngineConfig::default()).ok());
    match censor {
        Some(censor) => censor.apply(text).into_owned(),
        None => text.to_string(),
    }
}

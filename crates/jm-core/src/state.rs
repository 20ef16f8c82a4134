//! Enabled flag state and its persisted form.

use serde_json::{Map, Value};

/// Engine state. `Observing` means enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EngineState {
    #[default]
    Disabled,
    Observing,
}

impl EngineState {
    pub fn from_enabled(enabled: bool) -> Self {
        if enabled {
            Self::Observing
        } else {
            Self::Disabled
        }
    }

    pub fn is_enabled(self) -> bool {
        self == Self::Observing
    }
}

/// A missing flag means enabled.
pub fn resolve_enabled(stored: Option<bool>) -> bool {
    stored.unwrap_or(true)
}

/// Read the flag out of a storage result object such as `{"censoringEnabled": false}`.
///
/// Anything other than a boolean under `key` counts as absent.
pub fn read_flag(items: &Value, key: &str) -> Option<bool> {
    items.get(key).and_then(Value::as_bool)
}

/// Build the storage object persisting `enabled` under `key`.
pub fn flag_items(key: &str, enabled: bool) -> Value {
    let mut map = Map::new();
    map.insert(key.to_string(), Value::Bool(enabled));
    Value::Object(map)
}

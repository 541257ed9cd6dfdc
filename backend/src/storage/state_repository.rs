use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use shared::{AppData, STORAGE_KEY};
use std::sync::Arc;
use tracing::{info, warn};

use super::traits::KeyValueStorage;

/// Reads and writes the whole planner state under [`STORAGE_KEY`]
#[derive(Clone)]
pub struct StateRepository {
    storage: Arc<dyn KeyValueStorage>,
}

impl StateRepository {
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self { storage }
    }

    /// Load stored state. Missing or unreadable data falls back to defaults;
    /// when only one of `finance` / `items` is usable, that part is kept.
    pub fn load(&self) -> AppData {
        let raw = match self.storage.get(STORAGE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                info!("No saved planner state, starting empty");
                return AppData::default();
            }
            Err(e) => {
                warn!("Failed to read planner state: {:#}", e);
                return AppData::default();
            }
        };

        let parsed: serde_json::Value = match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                warn!("Failed to load state: {}", e);
                return AppData::default();
            }
        };

        let Some(object) = parsed.as_object() else {
            warn!("Saved planner state is not an object, ignoring it");
            return AppData::default();
        };

        AppData {
            finance: load_part(object.get("finance"), "finance"),
            items: load_part(object.get("items"), "items"),
        }
    }

    /// Persist the full state, replacing what was stored
    pub fn save(&self, data: &AppData) -> Result<()> {
        let raw = serde_json::to_string(data).context("Failed to serialize planner state")?;
        self.storage.put(STORAGE_KEY, &raw)
    }
}

fn load_part<T: DeserializeOwned + Default>(value: Option<&serde_json::Value>, name: &str) -> T {
    match value {
        None | Some(serde_json::Value::Null) => T::default(),
        Some(value) => serde_json::from_value(value.clone()).unwrap_or_else(|e| {
            warn!("Ignoring unreadable saved {}: {}", name, e);
            T::default()
        }),
    }
}

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::Result;

pub const CONFIG_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryData {
    pub host: String,
}

/// Persisted configuration for one AirTouch console.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigEntry {
    pub entry_id: Uuid,
    #[serde(default = "default_version")]
    pub version: u32,
    pub title: String,
    pub data: EntryData,
}

fn default_version() -> u32 {
    CONFIG_VERSION
}

impl ConfigEntry {
    /// New entry titled after its host.
    pub fn new(host: impl Into<String>) -> Self {
        let host = host.into();
        Self {
            entry_id: Uuid::new_v4(),
            version: CONFIG_VERSION,
            title: host.clone(),
            data: EntryData { host },
        }
    }

    pub fn host(&self) -> &str {
        &self.data.host
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let raw = serde_json::to_string_pretty(self)?;
        fs::write(path, raw)?;
        Ok(())
    }
}

use crate::error::Result;
use crate::ledger::JsonFileStorage;
use crate::recurrence::RecurrencePolicy;
use crate::schema::Granularity;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct DashboardConfig {
    #[schemars(description = "JSON file holding the prestations and depenses")]
    pub storage_path: PathBuf,

    #[schemars(description = "Visit gap (in days) that counts a client as returning")]
    pub recurrence: RecurrencePolicy,

    #[schemars(description = "View shown when the dashboard opens: day, month or year")]
    pub default_granularity: Granularity,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            storage_path: PathBuf::from("salon-ledger.json"),
            recurrence: RecurrencePolicy::default(),
            default_granularity: Granularity::default(),
        }
    }
}

impl DashboardConfig {
    pub fn from_json_str(raw: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads the config file; a missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        match fs::read_to_string(path.as_ref()) {
            Ok(raw) => Self::from_json_str(&raw),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.recurrence.validate()
    }

    pub fn storage(&self) -> JsonFileStorage {
        JsonFileStorage::new(self.storage_path.clone())
    }

    pub fn schema_as_json() -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&schemars::schema_for!(DashboardConfig))
    }
}

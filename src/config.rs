use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ContactsResult;

/// Name the host registers the method channel under.
pub const CHANNEL_NAME: &str = "flutter_contacts_service";

/// Service settings. Every field can be omitted from the config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// SQLite file holding the contacts provider.
    pub database_path: PathBuf,
    pub channel_name: String,
    /// Label mode for calls that don't pass `androidLocalizedLabels`.
    pub localized_labels: bool,
    /// `tracing_subscriber::EnvFilter` directive used when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from(".data").join("contacts.db"),
            channel_name: CHANNEL_NAME.to_string(),
            localized_labels: false,
            log_filter: "info".to_string(),
        }
    }
}

impl ServiceConfig {
    /// Read a JSON config file.
    pub fn load(path: &Path) -> ContactsResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }
}

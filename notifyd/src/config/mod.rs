//! Configuration management: defaults, validation, loading from DB + environment.

pub mod app_config;
pub mod defaults;
pub mod manager;
pub mod validation;

pub use app_config::AppConfig;
pub use manager::SettingsManager;
pub use notify_db::SettingKind;

use serde::{Deserialize, Serialize};

/// A setting as returned to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingInfo {
    pub key: String,
    pub value: String,
    #[serde(rename = "type")]
    pub setting_type: SettingKind,
    pub default: String,
    pub description: String,
    pub is_default: bool,
}

/// Summary of settings that affect how notifications reach the user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigStatus {
    pub builtin_bubbles: bool,
    pub dnd_active: bool,
    pub warnings: Vec<String>,
}

//! Runtime configuration loaded from DB + environment overrides.

use std::path::{Path, PathBuf};
use std::time::Duration;

use notify_core::CoreConfig;
use notify_core::bubble::Layout;

use super::manager::SettingsManager;
use super::validation::split_list;

/// Runtime configuration populated from the settings DB.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server_port: u16,
    pub builtin_bubbles: bool,
    pub layout: Layout,
    pub center_debounce_ms: u64,
    pub system_apps: Vec<String>,
    pub icon_cache_dir: PathBuf,
}

impl AppConfig {
    /// Load configuration from the settings manager (DB-first, env overrides).
    pub fn load(sm: &SettingsManager, data_dir: &Path) -> Result<Self, anyhow::Error> {
        let g = |key: &str| -> String { sm.get_setting(key).unwrap_or_default() };
        let defaults = Layout::default();

        let mut server_port = parse_or(&g("SERVER_PORT"), 8080u16);
        if let Ok(v) = std::env::var("SERVER_PORT") {
            if let Ok(p) = v.parse::<u16>() {
                server_port = p;
            }
        }

        let icon_cache_dir = match g("ICON_CACHE_DIR") {
            dir if dir.is_empty() => data_dir.join("icons"),
            dir => PathBuf::from(dir),
        };

        Ok(Self {
            server_port,
            builtin_bubbles: g("BUBBLE_MODE") != "external",
            layout: Layout {
                visible: parse_or(&g("BUBBLE_VISIBLE"), defaults.visible),
                overlap: parse_or(&g("BUBBLE_OVERLAP"), defaults.overlap),
                bubble_width: parse_or(&g("BUBBLE_WIDTH"), defaults.bubble_width),
                bubble_height: parse_or(&g("BUBBLE_HEIGHT"), defaults.bubble_height),
                screen_padding: parse_or(&g("SCREEN_PADDING"), defaults.screen_padding),
                bubble_margin: parse_or(&g("BUBBLE_MARGIN"), defaults.bubble_margin),
                animation_ms: parse_or(&g("ANIMATION_MS"), defaults.animation_ms),
            },
            center_debounce_ms: parse_or(&g("CENTER_DEBOUNCE_MS"), 300),
            system_apps: split_list(&g("SYSTEM_APPS")).map(str::to_string).collect(),
            icon_cache_dir,
        })
    }

    /// Reload config from the settings manager.
    pub fn reload(&mut self, sm: &SettingsManager, data_dir: &Path) -> Result<(), anyhow::Error> {
        *self = Self::load(sm, data_dir)?;
        Ok(())
    }

    /// Settings consumed by the notification core.
    pub fn core_config(&self) -> CoreConfig {
        CoreConfig {
            layout: self.layout.clone(),
            system_apps: self.system_apps.clone(),
            debounce: Duration::from_millis(self.center_debounce_ms),
            ..CoreConfig::default()
        }
    }
}

fn parse_or<T: std::str::FromStr>(s: &str, default: T) -> T {
    if s.is_empty() {
        return default;
    }
    s.parse().unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify_db::Database;

    #[test]
    fn defaults_match_core_layout() {
        let sm = SettingsManager::new(Database::open_in_memory().unwrap());
        let config = AppConfig::load(&sm, Path::new("/tmp/notifyd")).unwrap();
        assert!(config.builtin_bubbles);
        assert_eq!(config.layout, Layout::default());
        assert_eq!(config.icon_cache_dir, PathBuf::from("/tmp/notifyd/icons"));
        assert!(config.system_apps.contains(&"notify-send".to_string()));
        assert_eq!(config.core_config().debounce, Duration::from_millis(300));
    }

    #[test]
    fn stored_values_override_defaults() {
        let sm = SettingsManager::new(Database::open_in_memory().unwrap());
        sm.set_setting("BUBBLE_MODE", "external").unwrap();
        sm.set_setting("BUBBLE_VISIBLE", "4").unwrap();
        sm.set_setting("SYSTEM_APPS", "a, b").unwrap();
        sm.set_setting("ICON_CACHE_DIR", "/var/cache/icons").unwrap();
        let config = AppConfig::load(&sm, Path::new("/tmp")).unwrap();
        assert!(!config.builtin_bubbles);
        assert_eq!(config.layout.visible, 4);
        assert_eq!(config.system_apps, vec!["a", "b"]);
        assert_eq!(config.icon_cache_dir, PathBuf::from("/var/cache/icons"));
    }
}

//! Application settings

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use shared::SceneSettings;

use super::scene::{DEFAULT_DUPLICATE_OFFSET, DEFAULT_HISTORY_LIMIT};

/// All application settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Initial background, grid and sun settings for a new scene
    pub scene: SceneSettings,
    /// Number of undo steps kept
    pub history_limit: usize,
    /// X/Z offset applied by duplicate and paste
    pub duplicate_offset: f64,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            scene: SceneSettings::default(),
            history_limit: DEFAULT_HISTORY_LIMIT,
            duplicate_offset: DEFAULT_DUPLICATE_OFFSET,
        }
    }
}

impl AppSettings {
    fn config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "massing", "massing-editor")
            .map(|dirs| dirs.config_dir().join("settings.json"))
    }

    /// Load settings from file, or return default if not found
    pub fn load() -> Self {
        Self::config_path()
            .map(|path| Self::load_from(&path))
            .unwrap_or_default()
    }

    /// Load settings from an explicit path; missing or corrupt files give defaults
    pub fn load_from(path: &Path) -> Self {
        let Ok(json) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        match serde_json::from_str(&json) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!(path = %path.display(), "ignoring corrupt settings file: {e}");
                Self::default()
            }
        }
    }

    /// Save settings to file
    pub fn save(&self) {
        if let Some(path) = Self::config_path() {
            if let Err(e) = self.save_to(&path) {
                tracing::warn!(path = %path.display(), "failed to save settings: {e}");
            }
        }
    }

    /// Save settings to an explicit path, creating parent directories
    pub fn save_to(&self, path: &Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("massing-editor-test-{}", std::process::id()))
            .join(name)
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let settings = AppSettings::load_from(&temp_path("does-not-exist.json"));
        assert_eq!(settings, AppSettings::default());
        assert_eq!(settings.history_limit, 10);
    }

    #[test]
    fn test_save_and_load() {
        let path = temp_path("settings.json");
        let mut settings = AppSettings::default();
        settings.history_limit = 25;
        settings.scene.sun.latitude = 40.0;
        settings.save_to(&path).unwrap();

        let loaded = AppSettings::load_from(&path);
        assert_eq!(loaded, settings);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_corrupt_file_gives_defaults() {
        let path = temp_path("corrupt.json");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "{not json").unwrap();
        assert_eq!(AppSettings::load_from(&path), AppSettings::default());
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let settings: AppSettings = serde_json::from_str(r#"{"history_limit": 3}"#).unwrap();
        assert_eq!(settings.history_limit, 3);
        assert_eq!(settings.duplicate_offset, DEFAULT_DUPLICATE_OFFSET);
    }
}

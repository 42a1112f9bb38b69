// Hiveway - A Mastodon client
// Copyright (C) 2025 Hiveway Contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Runtime configuration
//!
//! Read from `<config dir>/Hiveway/config.json` when present; every field
//! falls back to its default.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{CoreError, CoreResult};

const APP_DIR: &str = "Hiveway";
const CONFIG_FILE: &str = "config.json";

/// Settings the UI may change at runtime; stored values win over the file
pub const SETTING_KEYS: [&str; 2] = ["locale", "media_preview_enabled"];

/// Pixel sizes the row layouts are built from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LayoutDimensions {
    /// Media preview height in timeline rows
    pub media_preview_height: u32,
    /// Media preview height in the detailed row
    pub detail_media_preview_height: u32,
    /// Card image height when the card stacks vertically
    pub card_image_vertical_height: u32,
    /// Card image width when the card lays out side by side
    pub card_image_horizontal_width: u32,
}

impl Default for LayoutDimensions {
    fn default() -> Self {
        Self {
            media_preview_height: 160,
            detail_media_preview_height: 250,
            card_image_vertical_height: 160,
            card_image_horizontal_width: 100,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    /// Unix socket path, or pipe name on Windows
    pub socket_path: String,
    /// SQLite database holding the active account
    pub database_path: PathBuf,
    /// BCP 47 tag used for number formatting
    pub locale: String,
    /// Whether rows show media previews
    pub media_preview_enabled: bool,
    /// Page size for timeline loads
    pub page_size: u32,
    /// Minutes east of UTC for absolute timestamps; the system zone when unset
    pub utc_offset_minutes: Option<i32>,
    pub layout: LayoutDimensions,
}

impl Default for CoreConfig {
    fn default() -> Self {
        #[cfg(windows)]
        let socket_path = r"\\.\pipe\hiveway_ipc".to_string();
        #[cfg(not(windows))]
        let socket_path = "/tmp/hiveway_ipc.sock".to_string();

        Self {
            socket_path,
            database_path: data_dir().join("hiveway.db"),
            locale: "en-US".to_string(),
            media_preview_enabled: true,
            page_size: 20,
            utc_offset_minutes: None,
            layout: LayoutDimensions::default(),
        }
    }
}

impl CoreConfig {
    /// Load the config file from the platform config directory
    pub fn load() -> CoreResult<Self> {
        let path = config_dir().join(CONFIG_FILE);
        Self::load_from(&path)
    }

    /// Load a config file, using defaults when it does not exist
    pub fn load_from(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path)
            .map_err(|e| CoreError::Config(format!("{}: {}", path.display(), e)))?;
        let config: Self = serde_json::from_str(&raw)
            .map_err(|e| CoreError::Config(format!("{}: {}", path.display(), e)))?;

        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Apply one runtime setting by key
    pub fn apply_setting(&mut self, key: &str, value: &str) -> CoreResult<()> {
        match key {
            "locale" => self.locale = value.to_string(),
            "media_preview_enabled" => {
                self.media_preview_enabled = value.parse().map_err(|_| {
                    CoreError::InvalidParams(format!("{} expects true or false", key))
                })?;
            }
            _ => return Err(CoreError::InvalidParams(format!("Unknown setting: {}", key))),
        }
        debug!("Setting {} = {}", key, value);
        Ok(())
    }
}

/// Directory for logs and the database
pub fn data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let config = CoreConfig::load_from(Path::new("/nonexistent/hiveway/config.json")).unwrap();
        assert_eq!(config.locale, "en-US");
        assert_eq!(config.layout, LayoutDimensions::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let path = std::env::temp_dir().join(format!("hiveway-config-{}.json", uuid::Uuid::new_v4()));
        std::fs::write(&path, r#"{"locale":"de-DE","layout":{"card_image_horizontal_width":90}}"#)
            .unwrap();

        let config = CoreConfig::load_from(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.locale, "de-DE");
        assert_eq!(config.layout.card_image_horizontal_width, 90);
        assert_eq!(config.layout.card_image_vertical_height, 160);
        assert!(config.media_preview_enabled);
        assert_eq!(config.utc_offset_minutes, None);
    }

    #[test]
    fn malformed_file_is_a_config_error() {
        let path = std::env::temp_dir().join(format!("hiveway-config-{}.json", uuid::Uuid::new_v4()));
        std::fs::write(&path, "{ not json").unwrap();

        let result = CoreConfig::load_from(&path);
        std::fs::remove_file(&path).ok();

        assert!(matches!(result, Err(CoreError::Config(_))));
    }

    #[test]
    fn settings_override_fields() {
        let mut config = CoreConfig::default();
        config.apply_setting("locale", "de-DE").unwrap();
        config.apply_setting("media_preview_enabled", "false").unwrap();

        assert_eq!(config.locale, "de-DE");
        assert!(!config.media_preview_enabled);
    }

    #[test]
    fn bad_settings_are_rejected() {
        let mut config = CoreConfig::default();
        assert!(matches!(
            config.apply_setting("media_preview_enabled", "sometimes"),
            Err(CoreError::InvalidParams(_))
        ));
        assert!(config.apply_setting("theme", "dark").is_err());
        assert!(config.media_preview_enabled);
    }
}

use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{LazyLock, RwLock};

use crate::inputs::KeyBindings;

pub const CURRENT_VERSION: u32 = 2;
const SETTINGS_FILENAME: &str = "config.yaml";
const APP_NAME: &str = "flipbook";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_version")]
    pub version: u32,

    #[serde(default = "default_true")]
    pub sound_enabled: bool,

    #[serde(default = "default_next_keys")]
    pub next_keys: Vec<String>,

    #[serde(default = "default_prev_keys")]
    pub prev_keys: Vec<String>,
}

fn default_true() -> bool {
    true
}

fn default_version() -> u32 {
    CURRENT_VERSION
}

fn default_next_keys() -> Vec<String> {
    vec!["Right".to_string(), "l".to_string()]
}

fn default_prev_keys() -> Vec<String> {
    vec!["Left".to_string(), "h".to_string()]
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: CURRENT_VERSION,
            sound_enabled: true,
            next_keys: default_next_keys(),
            prev_keys: default_prev_keys(),
        }
    }
}

static SETTINGS: LazyLock<RwLock<Settings>> = LazyLock::new(|| RwLock::new(Settings::default()));
static SETTINGS_PATH: LazyLock<RwLock<Option<PathBuf>>> = LazyLock::new(|| RwLock::new(None));

fn preferred_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|config| config.join(APP_NAME).join(SETTINGS_FILENAME))
}

fn remember_path(path: &Path) {
    if let Ok(mut current) = SETTINGS_PATH.write() {
        *current = Some(path.to_path_buf());
    }
}

pub fn load_settings() {
    let Some(path) = preferred_config_path() else {
        warn!("Could not determine config directory, using default settings");
        return;
    };
    load_settings_from_path(&path);
}

/// Load settings from `path`, writing defaults there when it does not exist.
/// Later saves go to the same file.
pub fn load_settings_from_path(path: &Path) {
    remember_path(path);
    if !path.exists() {
        info!("Settings file not found, creating with defaults at {path:?}");
        if let Ok(settings) = SETTINGS.read() {
            save_settings_to_file(&settings, path);
        }
        return;
    }

    match fs::read_to_string(path) {
        Ok(content) => match serde_yaml::from_str::<Settings>(&content) {
            Ok(mut settings) => {
                debug!("Loaded settings from {path:?}");

                if settings.version < CURRENT_VERSION {
                    migrate_settings(&mut settings);
                    save_settings_to_file(&settings, path);
                }

                if let Ok(mut global) = SETTINGS.write() {
                    *global = settings;
                }
            }
            Err(e) => {
                error!("Failed to parse settings file {path:?}: {e}");
            }
        },
        Err(e) => {
            error!("Failed to read settings file {path:?}: {e}");
        }
    }
}

fn migrate_settings(settings: &mut Settings) {
    info!(
        "Migrating settings from v{} to v{}",
        settings.version, CURRENT_VERSION
    );

    // v1 stored no key bindings; serde defaults already filled them in
    settings.version = CURRENT_VERSION;
}

pub fn save_settings() {
    let path = SETTINGS_PATH
        .read()
        .ok()
        .and_then(|p| p.clone())
        .or_else(preferred_config_path);
    let Some(path) = path else {
        warn!("Could not determine config directory, cannot save settings");
        return;
    };

    if let Ok(settings) = SETTINGS.read() {
        save_settings_to_file(&settings, &path);
    }
}

fn save_settings_to_file(settings: &Settings, path: &Path) {
    if let Some(parent) = path.parent() {
        if !parent.exists() {
            if let Err(e) = fs::create_dir_all(parent) {
                error!("Failed to create config directory {parent:?}: {e}");
                return;
            }
        }
    }

    let content = generate_settings_yaml(settings);

    match fs::write(path, content) {
        Ok(()) => debug!("Saved settings to {path:?}"),
        Err(e) => error!("Failed to save settings to {path:?}: {e}"),
    }
}

// Key names may be any character, so quoting is left to serde_yaml
fn key_list_yaml(field: &str, keys: &[String]) -> String {
    if keys.is_empty() {
        return format!("{field}: []\n");
    }
    match serde_yaml::to_string(keys) {
        Ok(list) => format!("{field}:\n{list}"),
        Err(e) => {
            error!("Failed to serialize {field}: {e}");
            format!("{field}: []\n")
        }
    }
}

fn generate_settings_yaml(settings: &Settings) -> String {
    let mut content = String::new();

    content.push_str(&format!("version: {}\n", settings.version));
    content.push_str(&format!("sound_enabled: {}\n", settings.sound_enabled));
    content.push('\n');
    content.push_str(KEYS_TEMPLATE);
    content.push_str(&key_list_yaml("next_keys", &settings.next_keys));
    content.push_str(&key_list_yaml("prev_keys", &settings.prev_keys));

    content
}

const KEYS_TEMPLATE: &str = r#"# ============================================================================
# Page turning keys
# ============================================================================
# Named keys: Right, Left, Up, Down, PageUp, PageDown, Home, End, Enter, Tab,
# Backspace, Space. Any single character is used as-is.

"#;

// Public API for accessing/modifying settings

pub fn is_sound_enabled() -> bool {
    SETTINGS.read().map(|s| s.sound_enabled).unwrap_or(true)
}

pub fn set_sound_enabled(enabled: bool) {
    if let Ok(mut settings) = SETTINGS.write() {
        settings.sound_enabled = enabled;
    }
    save_settings();
}

pub fn key_bindings() -> KeyBindings {
    SETTINGS
        .read()
        .map(|s| KeyBindings::from_names(&s.next_keys, &s.prev_keys))
        .unwrap_or_default()
}

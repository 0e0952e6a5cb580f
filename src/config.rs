//! Configuration for the touchpad numpad
//!
//! Stored as TOML. Every field has a serde default, so a file only needs the
//! keys it wants to change and a missing file means "all defaults". The key
//! layout itself is fixed and not part of the configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use numpad_engine::{HOLD_TIME, MIN_KEY_HOLD};

/// Toggle feedback settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackConfig {
    /// Play a sound when the numpad is toggled
    #[serde(default = "default_true")]
    pub sound: bool,
    /// Show a desktop notification when the numpad is toggled
    #[serde(default = "default_true")]
    pub notifications: bool,
    /// Sound played when the numpad turns on
    #[serde(default = "default_sound_on")]
    pub sound_on: PathBuf,
    /// Sound played when the numpad turns off
    #[serde(default = "default_sound_off")]
    pub sound_off: PathBuf,
    /// How long the notification stays visible
    #[serde(default = "default_notification_timeout")]
    pub notification_timeout_ms: u32,
}

fn default_true() -> bool {
    true
}
fn default_sound_on() -> PathBuf {
    PathBuf::from("/usr/share/sounds/freedesktop/stereo/complete.oga")
}
fn default_sound_off() -> PathBuf {
    PathBuf::from("/usr/share/sounds/freedesktop/stereo/device-removed.oga")
}
fn default_notification_timeout() -> u32 {
    1500
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            sound: true,
            notifications: true,
            sound_on: default_sound_on(),
            sound_off: default_sound_off(),
            notification_timeout_ms: default_notification_timeout(),
        }
    }
}

/// Complete numpad configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumpadConfig {
    /// Name for the virtual keyboard device
    #[serde(default = "default_device_name")]
    pub device_name: String,
    /// Case-insensitive substrings that identify the touchpad by name
    #[serde(default = "default_name_patterns")]
    pub name_patterns: Vec<String>,
    /// Scan /dev/input/event0 up to (excluding) this index
    #[serde(default = "default_max_event_index")]
    pub max_event_index: u32,
    /// Hotspot hold time before the numpad toggles
    #[serde(default = "default_hold_time")]
    pub hold_time_ms: u64,
    /// Delay between key press and release
    #[serde(default = "default_key_hold")]
    pub key_hold_ms: u64,
    #[serde(default)]
    pub feedback: FeedbackConfig,
}

fn default_device_name() -> String {
    "Virtual Touchpad Numpad".to_string()
}
fn default_name_patterns() -> Vec<String> {
    vec!["touchpad".to_string(), "synaptics".to_string()]
}
fn default_max_event_index() -> u32 {
    32
}
fn default_hold_time() -> u64 {
    HOLD_TIME.as_millis() as u64
}
fn default_key_hold() -> u64 {
    10
}

impl Default for NumpadConfig {
    fn default() -> Self {
        Self {
            device_name: default_device_name(),
            name_patterns: default_name_patterns(),
            max_event_index: default_max_event_index(),
            hold_time_ms: default_hold_time(),
            key_hold_ms: default_key_hold(),
            feedback: FeedbackConfig::default(),
        }
    }
}

impl NumpadConfig {
    /// Get the default config file path
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("touchpad-numpad")
            .join("config.toml")
    }

    /// Load config from a file, or return default if not found
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: NumpadConfig = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save config to a file
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn hold_time(&self) -> Duration {
        Duration::from_millis(self.hold_time_ms)
    }

    /// Press-to-release delay, never shorter than consumers can register
    pub fn key_hold(&self) -> Duration {
        Duration::from_millis(self.key_hold_ms).max(MIN_KEY_HOLD)
    }
}

//! Player preference persistence for the EchoPlayer core
//!
//! Hosts load these settings at startup and feed them into the playback
//! context; the engine itself never reads the disk. Settings are stored as
//! JSON under the platform config directory. Per-media playback position
//! memory lives in the `history` submodule.

mod history;

pub use history::PositionHistory;

use crate::orchestrator::{AutoPauseSettings, LoopSettings, PlaybackContext};
use crate::utils::error::{IntoPlayerError, Result};
use log::info;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Persisted player preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerSettings {
    /// Volume in [0.0, 1.0]
    pub volume: f32,

    /// Whether audio starts muted
    pub muted: bool,

    /// Playback rate multiplier
    pub playback_rate: f32,

    /// Quick-access playback rates shown in the transport bar
    pub favorite_rates: Vec<f32>,

    /// Loop-on-subtitle settings
    pub loop_settings: LoopSettings,

    /// Auto-pause settings
    pub auto_pause: AutoPauseSettings,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            volume: 0.7,
            muted: false,
            playback_rate: 1.0,
            favorite_rates: vec![0.75, 1.0, 1.25, 1.5],
            loop_settings: LoopSettings::default(),
            auto_pause: AutoPauseSettings::default(),
        }
    }
}

impl PlayerSettings {
    /// Load settings from the default location
    ///
    /// A missing file yields defaults; a malformed file is an error.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::settings_file_path())
    }

    /// Load settings from an explicit path
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(path)?;
        let settings =
            serde_json::from_str::<Self>(&data).settings_err("Parsing settings file")?;
        info!("Loaded player settings from {:?}", path);
        Ok(settings)
    }

    /// Save settings to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::settings_file_path())
    }

    /// Save settings to an explicit path
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(self).settings_err("Serializing settings")?;
        std::fs::write(path, data)?;
        Ok(())
    }

    /// Apply these preferences onto a playback context
    ///
    /// Resets the loop countdown to its configured baseline.
    pub fn apply_to(&self, context: &mut PlaybackContext) {
        context.volume = self.volume.clamp(0.0, 1.0);
        context.muted = self.muted;
        context.playback_rate = self.playback_rate;
        context.loop_settings = self.loop_settings;
        context.loop_settings.remaining = self.loop_settings.count;
        context.auto_pause = self.auto_pause;
    }

    fn settings_file_path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push("echoplayer");
        path.push("settings.json");
        path
    }
}

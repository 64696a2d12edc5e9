//! Per-media playback position memory
//!
//! Lets hosts resume a video where the viewer left off. Positions near the
//! very beginning or end of the media are not worth restoring and are
//! dropped instead.

use crate::utils::error::{IntoPlayerError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Map of media source to last playback position
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct PositionHistory {
    positions: HashMap<String, PositionEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
struct PositionEntry {
    /// Last position in seconds
    position_secs: f64,

    /// Media duration in seconds
    duration_secs: f64,

    /// Unix timestamp of the last playback
    last_played: u64,
}

impl PositionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the last position for a media source
    ///
    /// Positions in the first or last 5% of the media clear the entry
    /// instead: restarting there is indistinguishable from starting over.
    pub fn save_position(&mut self, source: &str, position_secs: f64, duration_secs: f64) {
        if duration_secs <= 0.0 {
            return;
        }

        let progress = position_secs / duration_secs;
        if !(0.05..=0.95).contains(&progress) {
            self.positions.remove(source);
            return;
        }

        let last_played = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);

        self.positions.insert(
            source.to_string(),
            PositionEntry {
                position_secs,
                duration_secs,
                last_played,
            },
        );
    }

    /// Look up the saved position for a media source, in seconds
    pub fn get_position(&self, source: &str) -> Option<f64> {
        self.positions.get(source).map(|e| e.position_secs)
    }

    /// Forget the saved position for a media source
    pub fn clear_position(&mut self, source: &str) {
        self.positions.remove(source);
    }

    /// Load the history from the default location; missing file yields empty
    pub fn load() -> Self {
        Self::load_from(&Self::history_file_path()).unwrap_or_default()
    }

    /// Load the history from an explicit path
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(path)?;
        serde_json::from_str(&data).settings_err("Parsing position history")
    }

    /// Persist the history to the default location
    pub fn persist(&self) -> Result<()> {
        self.persist_to(&Self::history_file_path())
    }

    /// Persist the history to an explicit path
    pub fn persist_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(self).settings_err("Serializing position history")?;
        std::fs::write(path, data)?;
        Ok(())
    }

    fn history_file_path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push("echoplayer");
        path.push("position_history.json");
        path
    }
}

//! Playback context and policy settings
//!
//! The context is a plain snapshot of playback-relevant state. The UI layer
//! supplies and refreshes it; the engine only derives the active cue index
//! and the loop countdown from it.

use crate::subtitle::{SubtitleCue, NO_ACTIVE_CUE};
use serde::{Deserialize, Serialize};

/// Loop count value meaning "repeat forever"
pub const LOOP_INFINITE: i32 = -1;

/// Loop granularity
///
/// Only single-cue looping exists today; the enum leaves room for e.g.
/// A-B range looping without changing the settings shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoopMode {
    /// Loop the current subtitle cue
    Single,
}

/// Loop-on-subtitle settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoopSettings {
    /// Whether loop playback is enabled
    pub enabled: bool,

    /// Loop granularity
    pub mode: LoopMode,

    /// Configured repeat count: [`LOOP_INFINITE`] for endless, 0 for
    /// disabled, N > 0 for a finite number of repeats
    pub count: i32,

    /// Remaining iterations of the countdown: mirrors `count` semantics,
    /// decremented by the engine on each automatic loop-back
    pub remaining: i32,
}

impl Default for LoopSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            mode: LoopMode::Single,
            count: LOOP_INFINITE,
            remaining: LOOP_INFINITE,
        }
    }
}

/// Auto-pause-at-cue-end settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AutoPauseSettings {
    /// Master switch for the auto-pause feature
    pub enabled: bool,

    /// Pause when the active subtitle cue ends
    pub pause_on_subtitle_end: bool,

    /// Automatically resume playback after `resume_delay_ms`
    pub resume_enabled: bool,

    /// Delay before the automatic resume fires, in milliseconds
    pub resume_delay_ms: u64,
}

impl Default for AutoPauseSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            pause_on_subtitle_end: true,
            resume_enabled: false,
            resume_delay_ms: 3000,
        }
    }
}

/// Snapshot of current playback-relevant state
///
/// Created fresh per player page; replaced or merged on each relevant store
/// change via [`crate::orchestrator::PlayerOrchestrator::sync_context`]. The
/// engine mutates only the fields it derives (`active_cue_index`,
/// `loop_settings.remaining`) plus echoes of controller state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackContext {
    /// Current playback position in seconds
    pub current_time: f64,

    /// Media duration in seconds (0.0 while unknown)
    pub duration: f64,

    /// Whether playback is paused
    pub paused: bool,

    /// Volume in [0.0, 1.0]
    pub volume: f32,

    /// Whether audio is muted
    pub muted: bool,

    /// Playback rate multiplier (1.0 = normal)
    pub playback_rate: f32,

    /// Subtitle cues, sorted by non-decreasing start time
    pub subtitles: Vec<SubtitleCue>,

    /// Index of the active cue, or [`NO_ACTIVE_CUE`]; derived by the engine
    pub active_cue_index: i32,

    /// Loop-on-subtitle settings
    pub loop_settings: LoopSettings,

    /// Auto-pause settings
    pub auto_pause: AutoPauseSettings,
}

impl Default for PlaybackContext {
    fn default() -> Self {
        Self {
            current_time: 0.0,
            duration: 0.0,
            paused: true,
            volume: 0.7,
            muted: false,
            playback_rate: 1.0,
            subtitles: Vec::new(),
            active_cue_index: NO_ACTIVE_CUE,
            loop_settings: LoopSettings::default(),
            auto_pause: AutoPauseSettings::default(),
        }
    }
}

impl PlaybackContext {
    /// The cue at `active_cue_index`, when valid
    pub fn active_cue(&self) -> Option<&SubtitleCue> {
        usize::try_from(self.active_cue_index)
            .ok()
            .and_then(|i| self.subtitles.get(i))
    }

    /// Clamp a seek target into the valid media range
    pub fn clamp_seek_target(&self, time: f64) -> f64 {
        time.clamp(0.0, self.duration.max(0.0))
    }
}

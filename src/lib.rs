//! EchoPlayer core — player orchestration engine
//!
//! This crate implements the playback coordination core of EchoPlayer, a
//! video player oriented around language-learning workflows. The central
//! piece is the [`PlayerOrchestrator`]: UI code issues playback intents
//! (toggle play, seek, navigate subtitles, set volume/rate), the orchestrator
//! validates them against the current [`PlaybackContext`] and drives the
//! connected [`VideoController`]; raw media events flow back through the
//! orchestrator's handlers, which derive the active subtitle cue, the
//! loop-on-cue countdown, and the auto-pause/auto-resume behavior, pushing
//! results to the UI through a [`StateUpdater`].
//!
//! The crate has no UI of its own: both capability interfaces are traits the
//! host implements, one adapter per target environment.

pub mod orchestrator;
pub mod settings;
pub mod subtitle;
pub mod utils;

pub use orchestrator::{
    AutoPauseSettings, LoopMode, LoopSettings, PlaybackContext, PlayerOrchestrator, SeekOrigin,
    StateUpdater, UiStateUpdate, VideoController, LOOP_INFINITE,
};
pub use settings::{PlayerSettings, PositionHistory};
pub use subtitle::{SubtitleCue, CUE_TOLERANCE_SECS, NEAR_START_GRACE_SECS, NO_ACTIVE_CUE};
pub use utils::error::{EchoPlayerError, Result};

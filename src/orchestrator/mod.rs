//! Player orchestration module for the EchoPlayer core
//!
//! This module coordinates playback between the UI layer and the underlying
//! media element. UI code issues intents (toggle play, seek, set volume), the
//! orchestrator validates them against the current playback context and calls
//! into the connected [`VideoController`]; raw media events flow back through
//! the orchestrator's event handlers, which recompute derived state (active
//! subtitle cue, loop countdown, auto-pause) and push the results through the
//! connected [`StateUpdater`].
//!
//! The orchestrator never touches a media element directly and never throws
//! across its intent boundary: precondition failures are logged warnings and
//! the intent becomes a no-op.

mod context;
mod engine;
mod timer;

pub use context::{AutoPauseSettings, LoopMode, LoopSettings, PlaybackContext, LOOP_INFINITE};
pub use engine::PlayerOrchestrator;

use crate::utils::error::Result;

/// Capability interface over a real media element
///
/// Implemented externally as a thin wrapper over the host environment's
/// playback surface; the orchestrator treats it as opaque. Exactly one
/// controller is connected at a time; connecting a new one silently replaces
/// the previous.
///
/// All methods take `&self`: implementations are expected to carry interior
/// mutability since they are shared with the auto-resume timer thread.
pub trait VideoController: Send + Sync {
    /// Start playback. May fail, e.g. when the host's autoplay policy blocks
    /// the request; the orchestrator logs and absorbs such failures.
    fn play(&self) -> Result<()>;

    /// Pause playback
    fn pause(&self);

    /// Seek to an absolute position in seconds
    fn seek(&self, time: f64);

    /// Set the playback rate multiplier (1.0 = normal)
    fn set_playback_rate(&self, rate: f32);

    /// Set volume in [0.0, 1.0]
    fn set_volume(&self, volume: f32);

    /// Mute or unmute
    fn set_muted(&self, muted: bool);

    /// Current playback position in seconds
    fn current_time(&self) -> f64;

    /// Media duration in seconds
    fn duration(&self) -> f64;

    /// Whether playback is currently paused
    fn is_paused(&self) -> bool;

    /// Current playback rate multiplier
    fn playback_rate(&self) -> f32;

    /// Current volume in [0.0, 1.0]
    fn volume(&self) -> f32;

    /// Whether audio is muted
    fn is_muted(&self) -> bool;
}

/// Sink for derived state pushed back to the UI store
///
/// Implemented externally as a bridge to the application's state store. Calls
/// are fire-and-forget; the orchestrator never consumes a return value.
pub trait StateUpdater: Send + Sync {
    fn set_current_time(&self, time: f64);
    fn set_duration(&self, duration: f64);
    fn set_playing(&self, playing: bool);
    fn update_loop_remaining(&self, remaining: i32);
    fn set_playback_rate(&self, rate: f32);
    fn set_volume(&self, volume: f32);
    fn set_muted(&self, muted: bool);
    fn set_seeking(&self, seeking: bool);
    fn set_waiting(&self, waiting: bool);
    fn set_ended(&self, ended: bool);
    fn set_active_cue_index(&self, index: i32);

    /// Push a UI-state signal (e.g. open or close the auto-resume countdown)
    fn update_ui_state(&self, update: UiStateUpdate);
}

/// Origin of a seek request
///
/// Threaded explicitly through the seek pathway: user-originated seeks
/// suppress the loop-countdown decrement and auto-pause triggering for the
/// transition they cause, automatic (internal) seeks do not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeekOrigin {
    /// Requested by the user (scrubbing, subtitle navigation)
    User,

    /// Issued by the engine itself (loop-back seeks)
    Internal,
}

/// UI-state signal pushed through [`StateUpdater::update_ui_state`]
///
/// Fields are optional so a signal only touches the parts of the UI state it
/// names; `None` means "leave unchanged".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UiStateUpdate {
    /// Open (`Some(true)`) or close (`Some(false)`) the countdown shown
    /// while an auto-resume timer is pending
    pub open_auto_resume_countdown: Option<bool>,
}

impl UiStateUpdate {
    /// Signal that the auto-resume countdown should be shown or hidden
    pub fn auto_resume_countdown(open: bool) -> Self {
        Self {
            open_auto_resume_countdown: Some(open),
        }
    }
}

//! Player orchestrator implementation
//!
//! The orchestrator owns the intent-to-action translation, the media-event-
//! to-state-update translation, and the derived playback policies: active
//! subtitle cue tracking, loop-on-cue with a finite countdown, and
//! auto-pause-at-cue-end with a delayed, cancellable resume.
//!
//! Lifecycle is explicit: the host application constructs one orchestrator,
//! connects a [`StateUpdater`] once and a [`VideoController`] per mounted
//! media element, and calls [`PlayerOrchestrator::dispose`] on teardown.

use crate::orchestrator::context::{LoopMode, PlaybackContext};
use crate::orchestrator::timer::CountdownTimer;
use crate::orchestrator::{SeekOrigin, StateUpdater, UiStateUpdate, VideoController};
use crate::subtitle;

use log::{debug, error, info, warn};
use parking_lot::{Mutex, RwLock};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// State shared with the auto-resume timer thread
struct SharedState {
    inner: RwLock<EngineInner>,
    controller: RwLock<Option<Arc<dyn VideoController>>>,
    updater: RwLock<Option<Arc<dyn StateUpdater>>>,
    disposed: AtomicBool,
}

/// Mutable engine state behind the lock
struct EngineInner {
    /// Current playback context, partially engine-derived
    context: PlaybackContext,

    /// Set by a user-originated seek; suppresses loop and auto-pause for the
    /// next observed time transition, then clears
    user_seek_pending: bool,

    /// Cue whose finite loop count ran out; looping stays disabled for it
    /// until the active cue changes or a user-originated seek occurs
    loop_exhausted_cue: Option<usize>,

    /// Whether an auto-resume countdown is pending
    resume_pending: bool,
}

/// Work computed under the state lock but performed outside it
enum TimeFollowup {
    None,
    LoopBack { target: f64, remaining: i32 },
    AutoPause { resume_delay_ms: Option<u64> },
}

/// The player orchestration engine
///
/// All intents are synchronous dispatch calls; none return errors to the
/// caller. Precondition failures (no controller connected, out-of-range
/// subtitle index, non-finite numeric input) are logged warnings and the
/// intent becomes a no-op. A rejected play request is caught and logged,
/// leaving playback state as last known-good.
pub struct PlayerOrchestrator {
    shared: Arc<SharedState>,
    resume_timer: Mutex<CountdownTimer>,
}

impl PlayerOrchestrator {
    /// Create a new orchestrator with a default playback context
    pub fn new() -> Self {
        Self {
            shared: Arc::new(SharedState {
                inner: RwLock::new(EngineInner {
                    context: PlaybackContext::default(),
                    user_seek_pending: false,
                    loop_exhausted_cue: None,
                    resume_pending: false,
                }),
                controller: RwLock::new(None),
                updater: RwLock::new(None),
                disposed: AtomicBool::new(false),
            }),
            resume_timer: Mutex::new(CountdownTimer::new()),
        }
    }

    // ===== Lifecycle =====

    /// Connect a video controller, replacing any previous one
    ///
    /// Replacement is the documented path for a new media element; a pending
    /// auto-resume countdown is cancelled.
    pub fn connect_video_controller(&self, controller: Arc<dyn VideoController>) {
        if self.reject_if_disposed("connect_video_controller") {
            return;
        }
        self.cancel_pending_resume();
        let replaced = self.shared.controller.write().replace(controller).is_some();
        debug!(
            "Video controller {}",
            if replaced { "replaced" } else { "connected" }
        );
    }

    /// Disconnect the current video controller, if any
    pub fn disconnect_video_controller(&self) {
        self.cancel_pending_resume();
        if self.shared.controller.write().take().is_some() {
            debug!("Video controller disconnected");
        }
    }

    /// Connect the state updater the engine pushes derived state through
    pub fn connect_state_updater(&self, updater: Arc<dyn StateUpdater>) {
        if self.reject_if_disposed("connect_state_updater") {
            return;
        }
        *self.shared.updater.write() = Some(updater);
        debug!("State updater connected");
    }

    /// Replace the playback context from the host's store
    ///
    /// External fields are taken as supplied; the active cue index is
    /// re-derived from the new subtitle list and current time.
    pub fn sync_context(&self, context: PlaybackContext) {
        if self.reject_if_disposed("sync_context") {
            return;
        }
        let mut inner = self.shared.inner.write();
        let active = subtitle::find_active_cue(&context.subtitles, context.current_time);
        inner.context = context;
        inner.context.active_cue_index = active;
        inner.loop_exhausted_cue = None;
    }

    /// Tear the orchestrator down
    ///
    /// Cancels any pending auto-resume countdown (joining its timer thread),
    /// clears the controller and state-updater references, and makes every
    /// subsequent intent a logged no-op. Idempotent.
    pub fn dispose(&self) {
        if self.shared.disposed.swap(true, Ordering::SeqCst) {
            return;
        }
        self.resume_timer.lock().cancel();
        self.shared.inner.write().resume_pending = false;
        *self.shared.controller.write() = None;
        *self.shared.updater.write() = None;
        info!("Player orchestrator disposed");
    }

    // ===== Intents =====

    /// Toggle between playing and paused
    pub fn request_toggle_play(&self) {
        if self.reject_if_disposed("request_toggle_play") {
            return;
        }
        let Some(controller) = self.require_controller("request_toggle_play") else {
            return;
        };
        self.cancel_pending_resume();

        if controller.is_paused() {
            if let Err(e) = controller.play() {
                error!("Play request failed: {}", e);
            }
        } else {
            controller.pause();
        }
    }

    /// Seek to an absolute position in seconds (programmatic origin)
    pub fn request_seek(&self, time: f64) {
        self.seek_to(time, SeekOrigin::Internal, "request_seek");
    }

    /// Seek relative to the current position (programmatic origin)
    pub fn request_seek_by(&self, delta_seconds: f64) {
        if self.reject_if_disposed("request_seek_by") {
            return;
        }
        if !delta_seconds.is_finite() {
            warn!("request_seek_by ignored: non-finite delta");
            return;
        }
        let current = self.shared.inner.read().context.current_time;
        self.seek_to(current + delta_seconds, SeekOrigin::Internal, "request_seek_by");
    }

    /// Seek to an absolute position, marked as user-originated
    ///
    /// User-originated seeks suppress the loop-countdown decrement and
    /// auto-pause triggering for the transition they cause.
    pub fn request_user_seek(&self, time: f64) {
        self.seek_to(time, SeekOrigin::User, "request_user_seek");
    }

    /// Seek to the start of the cue at `index`, marked as user-originated
    ///
    /// Manual subtitle navigation also resets the loop countdown to its
    /// configured baseline.
    pub fn request_user_seek_by_subtitle_index(&self, index: usize) {
        if self.reject_if_disposed("request_user_seek_by_subtitle_index") {
            return;
        }
        let Some(controller) = self.require_controller("request_user_seek_by_subtitle_index")
        else {
            return;
        };
        {
            let inner = self.shared.inner.read();
            if index >= inner.context.subtitles.len() {
                warn!(
                    "request_user_seek_by_subtitle_index ignored: index {} out of range ({} cues)",
                    index,
                    inner.context.subtitles.len()
                );
                return;
            }
        }
        self.cancel_pending_resume();

        let (start, remaining) = {
            let mut inner = self.shared.inner.write();
            let Some(cue) = inner.context.subtitles.get(index) else {
                return;
            };
            let start = cue.start_time;
            inner.user_seek_pending = true;
            inner.loop_exhausted_cue = None;
            let baseline = inner.context.loop_settings.count;
            inner.context.loop_settings.remaining = baseline;
            inner.context.current_time = start;
            inner.context.active_cue_index = index as i32;
            (start, baseline)
        };

        controller.seek(start);
        self.push(|u| {
            u.set_current_time(start);
            u.set_active_cue_index(index as i32);
            u.update_loop_remaining(remaining);
        });
        debug!("Seeking to subtitle {} at {:.3}s", index, start);
    }

    /// Seek to the next subtitle cue, if one exists
    ///
    /// With no active cue, the target is the first cue starting after the
    /// current time.
    pub fn request_seek_to_next_cue(&self) {
        if self.reject_if_disposed("request_seek_to_next_cue") {
            return;
        }
        let target = {
            let inner = self.shared.inner.read();
            subtitle::next_cue_index(
                &inner.context.subtitles,
                inner.context.active_cue_index,
                inner.context.current_time,
            )
        };
        match target {
            Some(index) => self.request_user_seek_by_subtitle_index(index),
            None => debug!("request_seek_to_next_cue: no later cue"),
        }
    }

    /// Seek to the previous subtitle cue, if one exists
    ///
    /// With no active cue, the target is the last cue that has already ended.
    pub fn request_seek_to_previous_cue(&self) {
        if self.reject_if_disposed("request_seek_to_previous_cue") {
            return;
        }
        let target = {
            let inner = self.shared.inner.read();
            subtitle::previous_cue_index(
                &inner.context.subtitles,
                inner.context.active_cue_index,
                inner.context.current_time,
            )
        };
        match target {
            Some(index) => self.request_user_seek_by_subtitle_index(index),
            None => debug!("request_seek_to_previous_cue: no earlier cue"),
        }
    }

    /// Set the playback volume, clamped to [0.0, 1.0]
    pub fn request_set_volume(&self, volume: f32) {
        if self.reject_if_disposed("request_set_volume") {
            return;
        }
        if !volume.is_finite() {
            warn!("request_set_volume ignored: non-finite volume");
            return;
        }
        let Some(controller) = self.require_controller("request_set_volume") else {
            return;
        };
        let volume = volume.clamp(0.0, 1.0);
        controller.set_volume(volume);
        self.shared.inner.write().context.volume = volume;
        self.push(|u| u.set_volume(volume));
    }

    /// Toggle the muted state
    pub fn request_toggle_mute(&self) {
        if self.reject_if_disposed("request_toggle_mute") {
            return;
        }
        let Some(controller) = self.require_controller("request_toggle_mute") else {
            return;
        };
        let muted = !controller.is_muted();
        controller.set_muted(muted);
        self.shared.inner.write().context.muted = muted;
        self.push(|u| u.set_muted(muted));
    }

    /// Set the playback rate multiplier
    pub fn request_set_playback_rate(&self, rate: f32) {
        if self.reject_if_disposed("request_set_playback_rate") {
            return;
        }
        if !rate.is_finite() || rate <= 0.0 {
            warn!("request_set_playback_rate ignored: invalid rate {}", rate);
            return;
        }
        let Some(controller) = self.require_controller("request_set_playback_rate") else {
            return;
        };
        controller.set_playback_rate(rate);
        self.shared.inner.write().context.playback_rate = rate;
        self.push(|u| u.set_playback_rate(rate));
    }

    // ===== Read accessors =====

    /// Snapshot of the current playback context
    pub fn context(&self) -> PlaybackContext {
        self.shared.inner.read().context.clone()
    }

    /// Whether playback is paused, preferring the live controller state
    pub fn is_paused(&self) -> bool {
        match self.shared.controller.read().as_ref() {
            Some(controller) => controller.is_paused(),
            None => self.shared.inner.read().context.paused,
        }
    }

    /// Whether audio is muted, preferring the live controller state
    pub fn is_muted(&self) -> bool {
        match self.shared.controller.read().as_ref() {
            Some(controller) => controller.is_muted(),
            None => self.shared.inner.read().context.muted,
        }
    }

    /// Last known volume from the context snapshot
    pub fn current_volume(&self) -> f32 {
        self.shared.inner.read().context.volume
    }

    /// Whether a video controller is currently connected
    pub fn is_video_controller_connected(&self) -> bool {
        self.shared.controller.read().is_some()
    }

    /// Whether an auto-resume countdown is currently pending
    pub fn is_auto_resume_pending(&self) -> bool {
        self.shared.inner.read().resume_pending
    }

    // ===== Media event handlers =====

    /// Handle a time update from the media element
    ///
    /// Recomputes the active cue and applies the loop-on-cue and
    /// auto-pause-at-cue-end policies when the previously active cue just
    /// ended. User-originated seeks suppress both policies for the
    /// transition they cause.
    pub fn on_time_update(&self, time: f64) {
        if self.shared.disposed.load(Ordering::SeqCst) || !time.is_finite() {
            return;
        }

        let (prev_active, final_active, reported_time, followup) = {
            let mut inner = self.shared.inner.write();
            let suppress = std::mem::take(&mut inner.user_seek_pending);
            let prev_active = inner.context.active_cue_index;
            let last_time = inner.context.current_time;
            let new_active = subtitle::find_active_cue(&inner.context.subtitles, time);

            // Crossing detection: the previously active cue's end lies
            // between the last reported time and this one.
            let crossed_end = !suppress
                && prev_active >= 0
                && (prev_active as usize) < inner.context.subtitles.len()
                && {
                    let end = inner.context.subtitles[prev_active as usize].end_time;
                    last_time <= end && time > end
                };

            let loop_settings = inner.context.loop_settings;
            let loop_eligible = crossed_end
                && loop_settings.enabled
                && matches!(loop_settings.mode, LoopMode::Single)
                && loop_settings.remaining != 0
                && inner.loop_exhausted_cue != Some(prev_active as usize);

            let followup;
            if loop_eligible {
                let cue = prev_active as usize;
                let target = inner.context.subtitles[cue].start_time;
                let mut remaining = inner.context.loop_settings.remaining;
                if remaining > 0 {
                    remaining -= 1;
                    if remaining == 0 {
                        inner.loop_exhausted_cue = Some(cue);
                    }
                    inner.context.loop_settings.remaining = remaining;
                }
                inner.context.current_time = target;
                inner.context.active_cue_index = prev_active;
                followup = TimeFollowup::LoopBack { target, remaining };
            } else if crossed_end
                && inner.context.auto_pause.enabled
                && inner.context.auto_pause.pause_on_subtitle_end
            {
                inner.context.current_time = time;
                inner.context.active_cue_index = new_active;
                inner.context.paused = true;
                let resume_delay_ms = if inner.context.auto_pause.resume_enabled {
                    inner.resume_pending = true;
                    Some(inner.context.auto_pause.resume_delay_ms)
                } else {
                    None
                };
                followup = TimeFollowup::AutoPause { resume_delay_ms };
            } else {
                inner.context.current_time = time;
                inner.context.active_cue_index = new_active;
                if let Some(exhausted) = inner.loop_exhausted_cue {
                    if new_active >= 0 && new_active as usize != exhausted {
                        inner.loop_exhausted_cue = None;
                    }
                }
                followup = TimeFollowup::None;
            }

            let final_active = inner.context.active_cue_index;
            (prev_active, final_active, inner.context.current_time, followup)
        };

        self.push(|u| u.set_current_time(reported_time));
        if final_active != prev_active {
            self.push(|u| u.set_active_cue_index(final_active));
        }

        match followup {
            TimeFollowup::None => {}
            TimeFollowup::LoopBack { target, remaining } => {
                if let Some(controller) = self.controller_ref() {
                    controller.seek(target);
                }
                self.push(|u| u.update_loop_remaining(remaining));
                debug!("Looping back to {:.3}s, {} repeats remaining", target, remaining);
            }
            TimeFollowup::AutoPause { resume_delay_ms } => {
                if let Some(controller) = self.controller_ref() {
                    controller.pause();
                }
                if let Some(delay_ms) = resume_delay_ms {
                    self.push(|u| u.update_ui_state(UiStateUpdate::auto_resume_countdown(true)));
                    self.schedule_auto_resume(delay_ms);
                }
                debug!("Auto-paused at cue end ({:.3}s)", time);
            }
        }
    }

    /// Handle a play event from the media element
    pub fn on_play(&self) {
        if self.shared.disposed.load(Ordering::SeqCst) {
            return;
        }
        self.shared.inner.write().context.paused = false;
        self.push(|u| {
            u.set_playing(true);
            u.set_ended(false);
        });
    }

    /// Handle a pause event from the media element
    pub fn on_pause(&self) {
        if self.shared.disposed.load(Ordering::SeqCst) {
            return;
        }
        self.shared.inner.write().context.paused = true;
        self.push(|u| u.set_playing(false));
    }

    /// Handle end-of-media
    ///
    /// Treated as a pause, except when looping is active on the final cue,
    /// in which case playback loops back into it.
    pub fn on_ended(&self) {
        if self.shared.disposed.load(Ordering::SeqCst) {
            return;
        }

        let followup = {
            let mut inner = self.shared.inner.write();
            let active = inner.context.active_cue_index;
            let loop_settings = inner.context.loop_settings;
            let loop_eligible = loop_settings.enabled
                && matches!(loop_settings.mode, LoopMode::Single)
                && loop_settings.remaining != 0
                && active >= 0
                && (active as usize) < inner.context.subtitles.len()
                && inner.loop_exhausted_cue != Some(active as usize);

            if loop_eligible {
                let cue = active as usize;
                let target = inner.context.subtitles[cue].start_time;
                let mut remaining = inner.context.loop_settings.remaining;
                if remaining > 0 {
                    remaining -= 1;
                    if remaining == 0 {
                        inner.loop_exhausted_cue = Some(cue);
                    }
                    inner.context.loop_settings.remaining = remaining;
                }
                inner.context.current_time = target;
                Some((target, remaining))
            } else {
                inner.context.paused = true;
                None
            }
        };

        match followup {
            Some((target, remaining)) => {
                if let Some(controller) = self.controller_ref() {
                    controller.seek(target);
                    if let Err(e) = controller.play() {
                        error!("Loop-back play request failed: {}", e);
                    }
                }
                self.push(|u| {
                    u.set_current_time(target);
                    u.update_loop_remaining(remaining);
                });
            }
            None => {
                self.push(|u| {
                    u.set_playing(false);
                    u.set_ended(true);
                });
            }
        }
    }

    /// Handle the start of a seek operation
    pub fn on_seeking(&self) {
        if self.shared.disposed.load(Ordering::SeqCst) {
            return;
        }
        self.push(|u| u.set_seeking(true));
    }

    /// Handle the completion of a seek operation
    pub fn on_seeked(&self, time: f64) {
        if self.shared.disposed.load(Ordering::SeqCst) || !time.is_finite() {
            return;
        }

        let (prev_active, new_active) = {
            let mut inner = self.shared.inner.write();
            inner.user_seek_pending = false;
            let prev_active = inner.context.active_cue_index;
            let new_active = subtitle::find_active_cue(&inner.context.subtitles, time);
            inner.context.current_time = time;
            inner.context.active_cue_index = new_active;
            if let Some(exhausted) = inner.loop_exhausted_cue {
                if new_active >= 0 && new_active as usize != exhausted {
                    inner.loop_exhausted_cue = None;
                }
            }
            (prev_active, new_active)
        };

        self.push(|u| {
            u.set_seeking(false);
            u.set_current_time(time);
        });
        if new_active != prev_active {
            self.push(|u| u.set_active_cue_index(new_active));
        }
    }

    /// Handle a buffering stall
    pub fn on_waiting(&self) {
        if self.shared.disposed.load(Ordering::SeqCst) {
            return;
        }
        self.push(|u| u.set_waiting(true));
    }

    /// Handle readiness to play after a stall
    pub fn on_can_play(&self) {
        if self.shared.disposed.load(Ordering::SeqCst) {
            return;
        }
        self.push(|u| u.set_waiting(false));
    }

    /// Handle a duration change from the media element
    pub fn on_duration_change(&self, duration: f64) {
        if self.shared.disposed.load(Ordering::SeqCst) {
            return;
        }
        if !duration.is_finite() || duration < 0.0 {
            return;
        }
        self.shared.inner.write().context.duration = duration;
        self.push(|u| u.set_duration(duration));
    }

    /// Handle a playback-rate change from the media element
    pub fn on_playback_rate_change(&self, rate: f32) {
        if self.shared.disposed.load(Ordering::SeqCst) {
            return;
        }
        self.shared.inner.write().context.playback_rate = rate;
        self.push(|u| u.set_playback_rate(rate));
    }

    // ===== Internals =====

    /// Shared seek pathway for all seek intents
    fn seek_to(&self, time: f64, origin: SeekOrigin, intent: &str) {
        if self.reject_if_disposed(intent) {
            return;
        }
        if !time.is_finite() {
            warn!("{} ignored: non-finite seek target", intent);
            return;
        }
        let Some(controller) = self.require_controller(intent) else {
            return;
        };
        self.cancel_pending_resume();

        let target = {
            let mut inner = self.shared.inner.write();
            let target = inner.context.clamp_seek_target(time);
            if origin == SeekOrigin::User {
                inner.user_seek_pending = true;
                inner.loop_exhausted_cue = None;
            }
            inner.context.current_time = target;
            target
        };

        controller.seek(target);
        debug!("{}: seeking to {:.3}s ({:?})", intent, target, origin);
    }

    /// Schedule the auto-resume countdown; the callback reaches back into
    /// the shared state, not the orchestrator handle, so cancellation can
    /// join the timer thread without deadlocking.
    fn schedule_auto_resume(&self, delay_ms: u64) {
        let shared = Arc::clone(&self.shared);
        self.resume_timer
            .lock()
            .schedule(Duration::from_millis(delay_ms), move || {
                if shared.disposed.load(Ordering::SeqCst) {
                    return;
                }
                if !std::mem::take(&mut shared.inner.write().resume_pending) {
                    return;
                }
                if let Some(updater) = shared.updater.read().clone() {
                    updater.update_ui_state(UiStateUpdate::auto_resume_countdown(false));
                }
                match shared.controller.read().clone() {
                    Some(controller) => {
                        if let Err(e) = controller.play() {
                            error!("Auto-resume play request failed: {}", e);
                        }
                    }
                    None => warn!("Auto-resume fired with no video controller connected"),
                }
            });
        debug!("Auto-resume scheduled in {} ms", delay_ms);
    }

    /// Cancel a pending auto-resume countdown, if any; idempotent
    fn cancel_pending_resume(&self) {
        self.resume_timer.lock().cancel();
        let was_pending = std::mem::take(&mut self.shared.inner.write().resume_pending);
        if was_pending {
            self.push(|u| u.update_ui_state(UiStateUpdate::auto_resume_countdown(false)));
            debug!("Pending auto-resume cancelled");
        }
    }

    fn controller_ref(&self) -> Option<Arc<dyn VideoController>> {
        self.shared.controller.read().clone()
    }

    /// Clone out the controller, logging a warning for the intent when none
    /// is connected
    fn require_controller(&self, intent: &str) -> Option<Arc<dyn VideoController>> {
        let controller = self.controller_ref();
        if controller.is_none() {
            warn!("{} ignored: no video controller connected", intent);
        }
        controller
    }

    fn reject_if_disposed(&self, intent: &str) -> bool {
        if self.shared.disposed.load(Ordering::SeqCst) {
            warn!("{} ignored: orchestrator disposed", intent);
            true
        } else {
            false
        }
    }

    /// Run `f` against the connected state updater, if any
    fn push<F: FnOnce(&dyn StateUpdater)>(&self, f: F) {
        if let Some(updater) = self.shared.updater.read().clone() {
            f(updater.as_ref());
        }
    }
}

impl Default for PlayerOrchestrator {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for PlayerOrchestrator {
    fn drop(&mut self) {
        self.dispose();
    }
}

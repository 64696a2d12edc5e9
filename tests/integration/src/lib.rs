//! Integration test utilities for the EchoPlayer core
//!
//! Provides scripted fake implementations of the two capability interfaces
//! the orchestrator consumes, plus helpers for building subtitle tracks and
//! pre-wired orchestrators.

use echoplayer_core::{
    PlaybackContext, PlayerOrchestrator, StateUpdater, SubtitleCue, UiStateUpdate, VideoController,
};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;

/// A controller call observed by [`FakeVideoController`]
#[derive(Debug, Clone, PartialEq)]
pub enum ControllerCall {
    Play,
    Pause,
    Seek(f64),
    SetPlaybackRate(f32),
    SetVolume(f32),
    SetMuted(bool),
}

/// Scriptable in-memory video controller
///
/// Records every mutating call and maintains a plausible media-element state
/// so read accessors stay consistent with the calls made.
#[derive(Default)]
pub struct FakeVideoController {
    calls: Mutex<Vec<ControllerCall>>,
    paused: AtomicBool,
    muted: AtomicBool,
    current_time: Mutex<f64>,
    duration: Mutex<f64>,
    volume: Mutex<f32>,
    rate: Mutex<f32>,
    /// When set, play() fails like a blocked autoplay request
    pub fail_play: AtomicBool,
    play_attempts: AtomicU32,
}

impl FakeVideoController {
    pub fn new(paused: bool, duration: f64) -> Arc<Self> {
        let controller = Arc::new(Self::default());
        controller.paused.store(paused, Ordering::SeqCst);
        *controller.duration.lock() = duration;
        *controller.volume.lock() = 0.7;
        *controller.rate.lock() = 1.0;
        controller
    }

    /// All mutating calls observed so far, in order
    pub fn calls(&self) -> Vec<ControllerCall> {
        self.calls.lock().clone()
    }

    /// Recorded seek targets, in order
    pub fn seek_targets(&self) -> Vec<f64> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                ControllerCall::Seek(t) => Some(t),
                _ => None,
            })
            .collect()
    }

    /// Number of successful play() calls
    pub fn play_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| **c == ControllerCall::Play)
            .count()
    }

    /// Number of play() attempts, including rejected ones
    pub fn play_attempts(&self) -> u32 {
        self.play_attempts.load(Ordering::SeqCst)
    }
}

impl VideoController for FakeVideoController {
    fn play(&self) -> echoplayer_core::Result<()> {
        self.play_attempts.fetch_add(1, Ordering::SeqCst);
        if self.fail_play.load(Ordering::SeqCst) {
            return Err(echoplayer_core::EchoPlayerError::Playback(
                "autoplay blocked".to_string(),
            ));
        }
        self.calls.lock().push(ControllerCall::Play);
        self.paused.store(false, Ordering::SeqCst);
        Ok(())
    }

    fn pause(&self) {
        self.calls.lock().push(ControllerCall::Pause);
        self.paused.store(true, Ordering::SeqCst);
    }

    fn seek(&self, time: f64) {
        self.calls.lock().push(ControllerCall::Seek(time));
        *self.current_time.lock() = time;
    }

    fn set_playback_rate(&self, rate: f32) {
        self.calls.lock().push(ControllerCall::SetPlaybackRate(rate));
        *self.rate.lock() = rate;
    }

    fn set_volume(&self, volume: f32) {
        self.calls.lock().push(ControllerCall::SetVolume(volume));
        *self.volume.lock() = volume;
    }

    fn set_muted(&self, muted: bool) {
        self.calls.lock().push(ControllerCall::SetMuted(muted));
        self.muted.store(muted, Ordering::SeqCst);
    }

    fn current_time(&self) -> f64 {
        *self.current_time.lock()
    }

    fn duration(&self) -> f64 {
        *self.duration.lock()
    }

    fn is_paused(&self) -> bool {
        self.paused.load(Ordering::SeqCst)
    }

    fn playback_rate(&self) -> f32 {
        *self.rate.lock()
    }

    fn volume(&self) -> f32 {
        *self.volume.lock()
    }

    fn is_muted(&self) -> bool {
        self.muted.load(Ordering::SeqCst)
    }
}

/// A state update observed by [`RecordingStateUpdater`]
#[derive(Debug, Clone, PartialEq)]
pub enum PushedUpdate {
    CurrentTime(f64),
    Duration(f64),
    Playing(bool),
    LoopRemaining(i32),
    PlaybackRate(f32),
    Volume(f32),
    Muted(bool),
    Seeking(bool),
    Waiting(bool),
    Ended(bool),
    ActiveCueIndex(i32),
    Ui(UiStateUpdate),
}

/// Records every update the orchestrator pushes
#[derive(Default)]
pub struct RecordingStateUpdater {
    updates: Mutex<Vec<PushedUpdate>>,
}

impl RecordingStateUpdater {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn updates(&self) -> Vec<PushedUpdate> {
        self.updates.lock().clone()
    }

    pub fn contains(&self, update: &PushedUpdate) -> bool {
        self.updates.lock().contains(update)
    }

    /// Count of identical pushes, for idempotence assertions
    pub fn count_of(&self, update: &PushedUpdate) -> usize {
        self.updates.lock().iter().filter(|u| *u == update).count()
    }

    fn record(&self, update: PushedUpdate) {
        self.updates.lock().push(update);
    }
}

impl StateUpdater for RecordingStateUpdater {
    fn set_current_time(&self, time: f64) {
        self.record(PushedUpdate::CurrentTime(time));
    }
    fn set_duration(&self, duration: f64) {
        self.record(PushedUpdate::Duration(duration));
    }
    fn set_playing(&self, playing: bool) {
        self.record(PushedUpdate::Playing(playing));
    }
    fn update_loop_remaining(&self, remaining: i32) {
        self.record(PushedUpdate::LoopRemaining(remaining));
    }
    fn set_playback_rate(&self, rate: f32) {
        self.record(PushedUpdate::PlaybackRate(rate));
    }
    fn set_volume(&self, volume: f32) {
        self.record(PushedUpdate::Volume(volume));
    }
    fn set_muted(&self, muted: bool) {
        self.record(PushedUpdate::Muted(muted));
    }
    fn set_seeking(&self, seeking: bool) {
        self.record(PushedUpdate::Seeking(seeking));
    }
    fn set_waiting(&self, waiting: bool) {
        self.record(PushedUpdate::Waiting(waiting));
    }
    fn set_ended(&self, ended: bool) {
        self.record(PushedUpdate::Ended(ended));
    }
    fn set_active_cue_index(&self, index: i32) {
        self.record(PushedUpdate::ActiveCueIndex(index));
    }
    fn update_ui_state(&self, update: UiStateUpdate) {
        self.record(PushedUpdate::Ui(update));
    }
}

/// Build a subtitle track from (start, end) pairs
pub fn track(ranges: &[(f64, f64)]) -> Vec<SubtitleCue> {
    ranges
        .iter()
        .enumerate()
        .map(|(i, &(start, end))| SubtitleCue::new(start, end, format!("cue {}", i)))
        .collect()
}

/// An orchestrator wired to a fake controller and recording updater
pub struct TestRig {
    pub orchestrator: PlayerOrchestrator,
    pub controller: Arc<FakeVideoController>,
    pub updater: Arc<RecordingStateUpdater>,
}

impl TestRig {
    /// Wire up an orchestrator around the given context; the fake controller
    /// starts unpaused with the context's duration.
    pub fn new(context: PlaybackContext) -> Self {
        let orchestrator = PlayerOrchestrator::new();
        let controller = FakeVideoController::new(false, context.duration);
        let updater = RecordingStateUpdater::new();

        orchestrator.connect_state_updater(Arc::clone(&updater) as Arc<dyn StateUpdater>);
        orchestrator
            .connect_video_controller(Arc::clone(&controller) as Arc<dyn VideoController>);
        orchestrator.sync_context(context);

        Self {
            orchestrator,
            controller,
            updater,
        }
    }
}

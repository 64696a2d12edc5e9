//! Subtitle cue model and timing lookups for the EchoPlayer core
//!
//! This module defines the subtitle cue type the orchestrator indexes into,
//! the active-cue containment lookup with its boundary tolerance, and the
//! next/previous cue resolution backing manual subtitle navigation.
//! Parsing of SRT and WebVTT files lives in the `parse` submodule.

mod parse;

pub use parse::{parse_srt, parse_vtt};

use serde::{Deserialize, Serialize};

/// Tolerance applied at cue boundaries when testing containment, in seconds.
///
/// A cue is considered active slightly before its start and slightly after
/// its end so the overlay does not flicker when time updates land exactly on
/// a boundary. Tunable; the stock value matches the application default.
pub const CUE_TOLERANCE_SECS: f64 = 0.05;

/// Grace window after a cue's start, in seconds, during which UI display
/// logic treats playback as "near the start" of the cue. The engine itself
/// does not consume this; it is exposed for host display code.
pub const NEAR_START_GRACE_SECS: f64 = 2.0;

/// Sentinel index meaning "no cue is active".
pub const NO_ACTIVE_CUE: i32 = -1;

/// A single subtitle cue with timing and text
///
/// Times are f64 seconds from the start of the media, mirroring the units a
/// media element reports. Invariant: `start_time < end_time`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubtitleCue {
    /// Start time of the cue in seconds
    pub start_time: f64,

    /// End time of the cue in seconds
    pub end_time: f64,

    /// Text in the media's original language
    pub original_text: String,

    /// Optional translation shown alongside the original text
    pub translated_text: Option<String>,
}

impl SubtitleCue {
    /// Create a cue without a translation
    pub fn new<S: Into<String>>(start_time: f64, end_time: f64, original_text: S) -> Self {
        Self {
            start_time,
            end_time,
            original_text: original_text.into(),
            translated_text: None,
        }
    }

    /// Whether `time` falls inside this cue, within the boundary tolerance
    pub fn contains(&self, time: f64) -> bool {
        time >= self.start_time - CUE_TOLERANCE_SECS && time <= self.end_time + CUE_TOLERANCE_SECS
    }

    /// Whether `time` is within the near-start grace window of this cue
    pub fn is_near_start(&self, time: f64) -> bool {
        time >= self.start_time - CUE_TOLERANCE_SECS
            && time <= self.start_time + NEAR_START_GRACE_SECS
    }

    /// Cue duration in seconds
    pub fn duration(&self) -> f64 {
        self.end_time - self.start_time
    }
}

/// Find the index of the cue containing `time`, or [`NO_ACTIVE_CUE`]
///
/// `cues` must be sorted by non-decreasing start time. Containment uses
/// [`CUE_TOLERANCE_SECS`]. When cues overlap, the latest-starting cue that
/// contains `time` wins.
pub fn find_active_cue(cues: &[SubtitleCue], time: f64) -> i32 {
    if !time.is_finite() {
        return NO_ACTIVE_CUE;
    }

    // Candidates are the cues starting at or before `time`; walk backwards
    // from the latest one so overlapping cues resolve to the newest.
    let upper = cues.partition_point(|c| c.start_time - CUE_TOLERANCE_SECS <= time);
    for idx in (0..upper).rev() {
        if cues[idx].contains(time) {
            return idx as i32;
        }
    }

    NO_ACTIVE_CUE
}

/// Resolve the target index for a "next subtitle" navigation
///
/// With a valid active cue, the target is the following cue. With no active
/// cue, the target is the first cue starting after `time`. Returns `None`
/// when no such cue exists.
pub fn next_cue_index(cues: &[SubtitleCue], active_index: i32, time: f64) -> Option<usize> {
    if active_index >= 0 {
        let next = active_index as usize + 1;
        return (next < cues.len()).then_some(next);
    }

    cues.iter().position(|c| c.start_time > time)
}

/// Resolve the target index for a "previous subtitle" navigation
///
/// With a valid active cue, the target is the preceding cue. With no active
/// cue, the target is the last cue that has already ended at `time`. Returns
/// `None` when no such cue exists.
pub fn previous_cue_index(cues: &[SubtitleCue], active_index: i32, time: f64) -> Option<usize> {
    if active_index > 0 {
        return Some(active_index as usize - 1);
    }
    if active_index == 0 {
        return None;
    }

    cues.iter().rposition(|c| c.end_time <= time)
}

//! Utility module for the EchoPlayer core
//!
//! This module provides common utilities used throughout the crate:
//! - Error handling with custom error types
//! - Display formatting for playback timestamps

pub mod error;

// Re-export commonly used items
pub use error::{EchoPlayerError, Result};

/// Format a duration for display
///
/// # Arguments
///
/// * `duration` - Duration to format
///
/// # Returns
///
/// Formatted string in the format "HH:MM:SS" or "MM:SS" for durations under an hour
pub fn format_duration(duration: std::time::Duration) -> String {
    let total_secs = duration.as_secs();
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;

    if hours > 0 {
        format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{:02}:{:02}", minutes, seconds)
    }
}

/// Format a playback position given in seconds for display
///
/// Negative or non-finite positions render as "00:00". Used by hosts that
/// render the transport bar from a [`crate::orchestrator::PlaybackContext`],
/// whose times are f64 seconds.
pub fn format_seconds(seconds: f64) -> String {
    if !seconds.is_finite() || seconds < 0.0 {
        return format_duration(std::time::Duration::ZERO);
    }
    format_duration(std::time::Duration::from_secs(seconds as u64))
}

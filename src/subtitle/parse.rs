//! SRT and WebVTT subtitle parsing
//!
//! Hosts load subtitle files with these parsers and hand the resulting cue
//! list to the orchestrator through the playback context. Malformed blocks
//! are skipped rather than failing the whole file; an input yielding no cues
//! at all is an error.

use crate::subtitle::SubtitleCue;
use crate::utils::error::{EchoPlayerError, Result};
use log::warn;

/// Parse a subtitle track from SRT content
///
/// SRT format:
/// ```text
/// 1
/// 00:00:01,000 --> 00:00:04,000
/// First subtitle line
///
/// 2
/// 00:00:05,000 --> 00:00:08,000
/// Second subtitle line
/// With multiple lines
/// ```
pub fn parse_srt(content: &str) -> Result<Vec<SubtitleCue>> {
    let content = content.replace("\r\n", "\n");
    let mut cues = Vec::new();

    for block in content.split("\n\n") {
        let block = block.trim();
        if block.is_empty() {
            continue;
        }

        let lines: Vec<&str> = block.lines().collect();
        // Timing line is located by pattern; the numeric counter line is
        // optional in practice.
        let Some(timing_pos) = lines.iter().position(|l| l.contains("-->")) else {
            continue;
        };

        let Some((start, end)) = parse_timing_line(lines[timing_pos]) else {
            warn!("Skipping SRT block with malformed timing: {:?}", lines[timing_pos]);
            continue;
        };
        if start >= end {
            warn!("Skipping SRT cue with inverted timing ({} >= {})", start, end);
            continue;
        }

        let text = lines[timing_pos + 1..].join("\n");
        if text.trim().is_empty() {
            continue;
        }

        cues.push(SubtitleCue::new(start, end, text));
    }

    finish(cues)
}

/// Parse a subtitle track from WebVTT content
///
/// Handles the `WEBVTT` header, optional cue identifiers, and skips NOTE and
/// STYLE blocks. Cue settings after the timing pair are ignored.
pub fn parse_vtt(content: &str) -> Result<Vec<SubtitleCue>> {
    let content = content.replace("\r\n", "\n");
    if !content.trim_start().starts_with("WEBVTT") {
        return Err(EchoPlayerError::subtitle_error("missing WEBVTT header"));
    }

    let mut cues = Vec::new();

    for block in content.split("\n\n") {
        let block = block.trim();
        if block.is_empty()
            || block.starts_with("WEBVTT")
            || block.starts_with("NOTE")
            || block.starts_with("STYLE")
            || block.starts_with("REGION")
        {
            continue;
        }

        let lines: Vec<&str> = block.lines().collect();
        let Some(timing_pos) = lines.iter().position(|l| l.contains("-->")) else {
            continue;
        };

        let Some((start, end)) = parse_timing_line(lines[timing_pos]) else {
            warn!("Skipping VTT block with malformed timing: {:?}", lines[timing_pos]);
            continue;
        };
        if start >= end {
            warn!("Skipping VTT cue with inverted timing ({} >= {})", start, end);
            continue;
        }

        let text = lines[timing_pos + 1..].join("\n");
        if text.trim().is_empty() {
            continue;
        }

        cues.push(SubtitleCue::new(start, end, text));
    }

    finish(cues)
}

/// Sort parsed cues by start time and reject empty tracks
fn finish(mut cues: Vec<SubtitleCue>) -> Result<Vec<SubtitleCue>> {
    if cues.is_empty() {
        return Err(EchoPlayerError::subtitle_error("no cues found"));
    }
    cues.sort_by(|a, b| a.start_time.total_cmp(&b.start_time));
    Ok(cues)
}

/// Parse a "start --> end" timing line into a pair of second offsets
fn parse_timing_line(line: &str) -> Option<(f64, f64)> {
    let mut parts = line.splitn(2, "-->");
    let start = parse_timestamp(parts.next()?.trim())?;
    // Cue settings (e.g. "align:start") may trail the end timestamp
    let end_part = parts.next()?.trim();
    let end_token = end_part.split_whitespace().next()?;
    let end = parse_timestamp(end_token)?;
    Some((start, end))
}

/// Parse "HH:MM:SS,mmm", "HH:MM:SS.mmm" or "MM:SS.mmm" into seconds
fn parse_timestamp(text: &str) -> Option<f64> {
    let text = text.replace(',', ".");
    let fields: Vec<&str> = text.split(':').collect();

    let (hours, minutes, seconds) = match fields.as_slice() {
        [h, m, s] => (h.parse::<u64>().ok()?, m.parse::<u64>().ok()?, s),
        [m, s] => (0, m.parse::<u64>().ok()?, s),
        _ => return None,
    };

    let secs: f64 = seconds.parse().ok()?;
    if !(0.0..60.0).contains(&secs) || minutes >= 60 {
        return None;
    }

    Some((hours * 3600 + minutes * 60) as f64 + secs)
}

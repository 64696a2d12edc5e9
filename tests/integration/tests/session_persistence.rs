//! Integration tests for the startup/shutdown persistence pipeline
//!
//! Exercises the flow a host application runs around the engine: load
//! persisted settings, apply them to a fresh playback context, hand the
//! context to the orchestrator, and write updated settings and playback
//! positions back out on shutdown.

use anyhow::Result;
use echoplayer_integration_tests::{track, TestRig};

use echoplayer_core::{PlaybackContext, PlayerSettings, PositionHistory};

#[test]
fn settings_survive_restart_and_drive_the_engine() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let settings_path = dir.path().join("settings.json");

    // First run: user turns looping on and saves
    let mut settings = PlayerSettings::load_from(&settings_path)?;
    assert_eq!(settings, PlayerSettings::default());
    settings.volume = 0.4;
    settings.loop_settings.enabled = true;
    settings.loop_settings.count = 2;
    settings.loop_settings.remaining = 2;
    settings.save_to(&settings_path)?;

    // Second run: the reloaded settings shape the playback context
    let reloaded = PlayerSettings::load_from(&settings_path)?;
    let mut context = PlaybackContext::default();
    context.duration = 60.0;
    context.subtitles = track(&[(2.0, 4.0)]);
    context.current_time = 3.0;
    reloaded.apply_to(&mut context);
    assert_eq!(context.volume, 0.4);
    assert_eq!(context.loop_settings.remaining, 2);

    // The engine honors the applied loop configuration
    let rig = TestRig::new(context);
    rig.orchestrator.on_time_update(4.01);
    assert_eq!(rig.controller.seek_targets(), vec![2.0]);
    assert_eq!(rig.orchestrator.context().loop_settings.remaining, 1);
    Ok(())
}

#[test]
fn playback_position_survives_restart() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let history_path = dir.path().join("position_history.json");

    // Shutdown mid-film: remember where the viewer was
    let mut history = PositionHistory::load_from(&history_path)?;
    history.save_position("lesson-04.mp4", 600.0, 1200.0);
    history.persist_to(&history_path)?;

    // Next launch resumes from the stored position
    let reloaded = PositionHistory::load_from(&history_path)?;
    let resume_at = reloaded.get_position("lesson-04.mp4");
    assert_eq!(resume_at, Some(600.0));

    let mut context = PlaybackContext::default();
    context.duration = 1200.0;
    let rig = TestRig::new(context);
    rig.orchestrator.request_seek(resume_at.unwrap_or(0.0));
    assert_eq!(rig.controller.seek_targets(), vec![600.0]);
    assert_eq!(rig.orchestrator.context().current_time, 600.0);
    Ok(())
}

#[test]
fn finished_film_clears_its_stored_position() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let history_path = dir.path().join("position_history.json");

    let mut history = PositionHistory::new();
    history.save_position("lesson-04.mp4", 600.0, 1200.0);
    history.persist_to(&history_path)?;

    // Watching to the end drops the entry on the next save
    let mut reloaded = PositionHistory::load_from(&history_path)?;
    reloaded.save_position("lesson-04.mp4", 1195.0, 1200.0);
    reloaded.persist_to(&history_path)?;

    let final_state = PositionHistory::load_from(&history_path)?;
    assert_eq!(final_state.get_position("lesson-04.mp4"), None);
    Ok(())
}

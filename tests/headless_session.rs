// Runs the session screen's state machine without a terminal: a manual clock
// stands in for real time and sessions land in an on-disk database.

use std::time::Duration;

use chrono::{TimeZone, Utc};
use tempfile::TempDir;

use breathe::core::ManualClock;
use breathe::features::breathing::{PresetCatalog, SessionStorage, QUICK_PRESET_ID};
use breathe::storage::Database;
use breathe::tui::{Action, App};

fn open(dir: &TempDir) -> SessionStorage {
    SessionStorage::with_database(Database::open_at(&dir.path().join("breathe.db")).unwrap(), "sam")
}

#[test]
fn box_session_is_recorded_on_quit() {
    let dir = TempDir::new().unwrap();
    let clock = ManualClock::new(Utc.with_ymd_and_hms(2024, 7, 1, 6, 30, 0).unwrap());

    let mut app = App::new(
        clock.clone(),
        &PresetCatalog::builtin(),
        "box",
        Box::new(open(&dir)),
        None,
        Duration::from_secs(1),
    )
    .unwrap();

    app.handle(Action::Start).unwrap();
    for _ in 0..16 {
        clock.advance_secs(1);
        app.apply_due_ticks();
    }
    assert_eq!(app.sequencer().state().cycles_completed(), 1);
    let view = app.sequencer().current_view().unwrap();
    assert_eq!(view.as_tuple(), ("inhale", "Breathe in slowly", 4));

    app.handle(Action::TogglePause).unwrap();
    clock.advance_secs(30);
    assert_eq!(app.apply_due_ticks(), 0);

    app.handle(Action::Quit).unwrap();
    assert!(app.should_quit);
    drop(app);

    let sessions = open(&dir).get_recent(10).unwrap();
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0].record.preset_id, "box-breathing");
    // Real elapsed time, paused time included.
    assert_eq!(sessions[0].record.duration_seconds, 46);
    assert!(sessions[0].record.completed);
}

#[test]
fn quick_session_stops_itself_after_a_minute() {
    let dir = TempDir::new().unwrap();
    let clock = ManualClock::new(Utc.with_ymd_and_hms(2024, 7, 1, 21, 0, 0).unwrap());

    let mut app = App::new(
        clock.clone(),
        &PresetCatalog::builtin(),
        QUICK_PRESET_ID,
        Box::new(open(&dir)),
        Some(60),
        Duration::from_secs(1),
    )
    .unwrap();
    app.start_selected().unwrap();

    // One long stall: the missed ticks are applied at once and the limit
    // still cuts the session at exactly 60.
    clock.advance_secs(75);
    assert_eq!(app.apply_due_ticks(), 60);
    assert!(!app.is_running());

    app.quit();
    let outcomes = app.into_outcomes();
    assert_eq!(outcomes.len(), 1);
    assert!(outcomes[0].is_recorded());

    let sessions = open(&dir).get_recent(10).unwrap();
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0].record.preset_id, QUICK_PRESET_ID);
    assert!(sessions[0].record.completed);
}

#[test]
fn stopping_a_capped_session_early_is_not_completed() {
    let dir = TempDir::new().unwrap();
    let clock = ManualClock::new(Utc.with_ymd_and_hms(2024, 7, 2, 8, 0, 0).unwrap());

    let mut app = App::new(
        clock.clone(),
        &PresetCatalog::builtin(),
        "calm",
        Box::new(open(&dir)),
        Some(300),
        Duration::from_secs(1),
    )
    .unwrap();
    app.handle(Action::Start).unwrap();
    clock.advance_secs(63);
    app.apply_due_ticks();
    app.handle(Action::Stop).unwrap();

    let sessions = open(&dir).get_recent(10).unwrap();
    assert_eq!(sessions[0].record.duration_seconds, 63);
    assert!(!sessions[0].record.completed);
}

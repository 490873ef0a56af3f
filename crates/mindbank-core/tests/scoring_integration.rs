//! End-to-end scoring flow: log events, score the week, reset.

use chrono::Utc;
use mindbank_core::journal::{Deposit, DepositKind, RoutineKey};
use mindbank_core::question::Question;
use mindbank_core::scoring::ScoringEngine;
use mindbank_core::storage::{Database, UserSettings};
use mindbank_core::LocalDay;

fn one_routine_settings() -> UserSettings {
    UserSettings {
        active_routines: vec![RoutineKey::Affirmations],
        include_deposit_checks: true,
        include_reframe_check: true,
    }
}

#[test]
fn example_week_scores_match_the_fixed_point_mapping() {
    let db = Database::open_memory().unwrap();
    let engine = ScoringEngine::new(&db);
    let settings = one_routine_settings();

    // Day D: log success and progress only.
    let logged = engine
        .log_deposit(DepositKind::Success, "nailed the interview")
        .unwrap();
    engine
        .log_deposit(DepositKind::Progress, "two more chapters")
        .unwrap();

    let today = logged.record.day;
    let series = engine.weekly_series(&settings, today);
    assert_eq!(series.len(), 7);

    let today_score = series.last().unwrap();
    assert_eq!(today_score.day, today);
    assert_eq!(today_score.eligible, 5);
    assert_eq!(today_score.answered, 2);
    assert_eq!(today_score.deposit_points, 20);
    assert_eq!(today_score.withdrawal_points, 30);
    assert_eq!(today_score.total_points, -10);
}

#[test]
fn repeated_logging_never_double_scores_the_week() {
    let db = Database::open_memory().unwrap();
    let engine = ScoringEngine::new(&db);
    let settings = one_routine_settings();

    let first = engine.log_reframe("I froze", "I paused and recovered").unwrap();
    let second = engine.log_reframe("Again", "Still fine").unwrap();
    assert!(first.counted);
    assert!(!second.counted);

    let series = engine.weekly_series(&settings, first.record.day);
    assert_eq!(series.last().unwrap().answered, 1);
    // The log keeps both entries for history.
    assert_eq!(db.list_reframes().unwrap().len(), 2);
}

#[test]
fn flagless_legacy_rows_still_score_via_the_fallback_scan() {
    let db = Database::open_memory().unwrap();
    let engine = ScoringEngine::new(&db);
    let settings = one_routine_settings();

    let day: LocalDay = "2024-06-10".parse().unwrap();
    db.insert_deposit(&Deposit {
        id: "pre-upgrade".to_string(),
        recorded_at: Utc::now(),
        day,
        kind: DepositKind::Effort,
        text: "imported from the old app".to_string(),
    })
    .unwrap();

    let map = engine.answered_map(&day, &settings).unwrap();
    assert!(map[&Question::Deposit(DepositKind::Effort)]);

    let series = engine.weekly_series(&settings, day);
    assert_eq!(series.last().unwrap().answered, 1);
}

#[test]
fn reset_leaves_default_eligibility_and_nothing_answered() {
    let db = Database::open_memory().unwrap();
    let engine = ScoringEngine::new(&db);

    // Save non-default settings and log a bit of everything.
    let custom = UserSettings {
        active_routines: vec![RoutineKey::LastWord],
        include_deposit_checks: true,
        include_reframe_check: false,
    };
    custom.save(&db).unwrap();
    engine.log_deposit(DepositKind::Success, "x").unwrap();
    engine.log_reframe("a", "b").unwrap();
    engine.mark_routine_done(RoutineKey::LastWord).unwrap();

    let summary = db.reset_all().unwrap();
    assert_eq!(summary.deleted_deposits, 1);
    assert_eq!(summary.deleted_reframes, 1);
    assert_eq!(summary.deleted_routine_checks, 1);
    assert!(summary.deleted_flags >= 3);

    // Settings are back to defaults, flags and events are gone.
    let settings = UserSettings::load(&db).unwrap();
    assert_eq!(settings, UserSettings::default());

    let series = engine.weekly_series(&settings, LocalDay::today());
    for day in &series {
        assert_eq!(day.eligible, Question::eligible(&settings).len());
        assert_eq!(day.answered, 0);
    }
}

#[test]
fn malformed_rows_do_not_abort_the_week() {
    let db = Database::open_memory().unwrap();
    let engine = ScoringEngine::new(&db);
    let settings = one_routine_settings();

    // A malformed event row on one day must not stop the series.
    db.conn()
        .execute(
            "INSERT INTO deposits (id, recorded_at, day, kind, text)
             VALUES ('junk', 'not-a-timestamp', '2025-02-11', 'winning', 'x')",
            [],
        )
        .unwrap();
    engine
        .log_deposit(DepositKind::Success, "still works")
        .unwrap();

    let today = LocalDay::today();
    let series = engine.weekly_series(&settings, today);
    assert_eq!(series.len(), 7);
    assert_eq!(series.last().unwrap().answered, 1);
}

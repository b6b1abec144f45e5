//! Integration tests for the session controller and task ledger working
//! together through `AppState`.

use pomotrack_core::{
    format_time, AppState, Event, IntervalKind, NewTask, Settings, TaskFilter, TaskId, TaskPatch,
    ValidationError,
};

/// Start the countdown if needed and pulse until the interval completes.
fn complete_interval(app: &mut AppState) -> Event {
    if !app.is_running() {
        app.toggle_running();
    }
    let mut pulses = 0u64;
    loop {
        pulses += 1;
        if let Some(event) = app.pulse() {
            return event;
        }
        assert!(pulses <= 60 * 60, "interval never completed");
    }
}

fn add(app: &mut AppState, title: &str) -> TaskId {
    match app.add_task(NewTask::titled(title)) {
        Ok(Event::TaskAdded { task, .. }) => task.id,
        other => panic!("Expected TaskAdded, got {other:?}"),
    }
}

#[test]
fn test_add_task_defaults() {
    let mut app = AppState::default();
    add(&mut app, "Write report");

    let tasks = app.ledger().tasks();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].title, "Write report");
    assert_eq!(tasks[0].completed_work_units, 0);
    assert_eq!(tasks[0].estimated_work_units, 1);
    assert!(!tasks[0].completed);
}

#[test]
fn test_whitespace_title_leaves_ledger_unchanged() {
    let mut app = AppState::default();
    add(&mut app, "Existing");
    let before = app.ledger().tasks().to_vec();

    assert_eq!(
        app.add_task(NewTask::titled("   ")),
        Err(ValidationError::EmptyTitle)
    );
    assert_eq!(app.ledger().tasks(), before.as_slice());
}

#[test]
fn test_fourth_work_interval_earns_long_break() {
    let mut app = AppState::new(Settings {
        work: 1,
        short_break: 1,
        long_break: 1,
        long_break_interval: 4,
        ..Settings::default()
    });

    for completion in 1..=4u64 {
        let event = complete_interval(&mut app);
        let Event::IntervalCompleted {
            finished,
            next,
            completed_work_count,
            ..
        } = event
        else {
            panic!("Expected IntervalCompleted");
        };
        assert_eq!(finished, IntervalKind::Work);
        assert_eq!(completed_work_count, completion);
        if completion < 4 {
            assert_eq!(next, IntervalKind::ShortBreak);
        } else {
            assert_eq!(next, IntervalKind::LongBreak);
        }
        assert_eq!(app.controller().kind(), next);

        if completion < 4 {
            // Let the break run out naturally to get back to work.
            let back = complete_interval(&mut app);
            assert!(matches!(
                back,
                Event::IntervalCompleted {
                    next: IntervalKind::Work,
                    ..
                }
            ));
        }
    }
    assert_eq!(app.controller().completed_work_count(), 4);
}

#[test]
fn test_work_completion_credits_only_active_task() {
    let mut app = AppState::new(Settings {
        work: 25,
        ..Settings::default()
    });
    let focus = add(&mut app, "Focus");
    let other = add(&mut app, "Other");
    app.set_active_task(Some(focus));

    complete_interval(&mut app);

    assert_eq!(app.ledger().get(&focus).unwrap().completed_work_units, 1);
    assert_eq!(app.ledger().get(&other).unwrap().completed_work_units, 0);
}

#[test]
fn test_deleting_active_task_stops_crediting() {
    let mut app = AppState::new(Settings {
        work: 1,
        ..Settings::default()
    });
    let doomed = add(&mut app, "Doomed");
    let survivor = add(&mut app, "Survivor");
    app.set_active_task(Some(doomed));

    app.delete_task(&doomed);
    assert_eq!(app.ledger().active_task_id(), None);

    match complete_interval(&mut app) {
        Event::IntervalCompleted { credited_task, .. } => assert_eq!(credited_task, None),
        other => panic!("Expected IntervalCompleted, got {other:?}"),
    }
    assert_eq!(app.ledger().get(&survivor).unwrap().completed_work_units, 0);
}

#[test]
fn test_manual_switch_mid_work_is_not_a_completion() {
    let mut app = AppState::default();
    app.toggle_running();
    for _ in 0..120 {
        app.pulse();
    }

    app.select_kind(IntervalKind::ShortBreak);

    let c = app.controller();
    assert_eq!(c.completed_work_count(), 0);
    assert_eq!(c.kind(), IntervalKind::ShortBreak);
    assert_eq!(c.seconds_remaining(), u64::from(app.settings().short_break) * 60);
    assert!(!c.is_running());
}

#[test]
fn test_format_time_examples() {
    assert_eq!(format_time(125), "02:05");
    assert_eq!(format_time(0), "00:00");
}

#[test]
fn test_double_toggle_restores_running_flag() {
    let mut app = AppState::default();
    app.toggle_running();
    app.pulse();
    let kind = app.controller().kind();
    let remaining = app.controller().seconds_remaining();

    app.toggle_running();
    app.toggle_running();

    assert!(app.is_running());
    assert_eq!(app.controller().kind(), kind);
    assert_eq!(app.controller().seconds_remaining(), remaining);
}

#[test]
fn test_auto_start_runs_through_cycle_without_intervention() {
    let mut app = AppState::new(Settings {
        work: 1,
        short_break: 1,
        long_break: 1,
        long_break_interval: 2,
        auto_start_breaks: true,
        auto_start_pomodoros: true,
    });
    app.toggle_running();

    let mut kinds = Vec::new();
    for _ in 0..(60 * 4) {
        if let Some(Event::IntervalCompleted { next, auto_started, .. }) = app.pulse() {
            assert!(auto_started);
            kinds.push(next);
        }
    }
    assert_eq!(
        kinds,
        vec![
            IntervalKind::ShortBreak,
            IntervalKind::Work,
            IntervalKind::LongBreak,
            IntervalKind::Work,
        ]
    );
    assert!(app.is_running());
}

#[test]
fn test_settings_change_mid_countdown_applies_on_next_interval() {
    let mut app = AppState::default();
    app.toggle_running();
    app.pulse();

    app.update_settings(Settings {
        work: 10,
        short_break: 2,
        ..Settings::default()
    })
    .unwrap();
    assert_eq!(app.controller().seconds_remaining(), 1499);

    complete_interval(&mut app);
    assert_eq!(app.controller().kind(), IntervalKind::ShortBreak);
    assert_eq!(app.controller().seconds_remaining(), 120);
}

#[test]
fn test_task_edits_and_filters() {
    let mut app = AppState::default();
    let a = add(&mut app, "a");
    let b = add(&mut app, "b");

    assert!(app.toggle_completion(&b).is_some());
    app.update_task(
        &a,
        TaskPatch {
            title: Some("alpha".into()),
            estimated_work_units: Some(3),
            ..TaskPatch::default()
        },
    );

    let active: Vec<_> = app.ledger().filtered(TaskFilter::Active).collect();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].title, "alpha");
    assert_eq!(active[0].estimated_work_units, 3);

    let stats = app.stats();
    assert_eq!(stats.completed_tasks, 1);
    assert_eq!(stats.active_tasks, 1);
}

#[test]
fn test_unknown_ids_produce_no_events() {
    let mut app = AppState::default();
    add(&mut app, "a");
    let stranger = TaskId::new();

    assert!(app.update_task(&stranger, TaskPatch::default()).is_none());
    assert!(app.delete_task(&stranger).is_none());
    assert!(app.toggle_completion(&stranger).is_none());
    assert_eq!(app.ledger().len(), 1);
}

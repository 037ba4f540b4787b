// Integration tests: grid gestures flowing through the coordinator and the
// optimistic store into SQLite

mod fixtures;

use std::cell::Cell;

use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use fixtures::{at, hm, memory_db, seed_scheduled, task, week};
use pretty_assertions::assert_eq;
use week_scheduler::models::schedule::{ScheduleCommit, ScheduleUpdate};
use week_scheduler::models::settings::GridConfig;
use week_scheduler::models::task::ScheduledTask;
use week_scheduler::services::schedule::{
    CommitResult, ScheduleService, ScheduleSource, ScheduleStore,
};
use week_scheduler::ui_egui::drag::{DragCoordinator, GestureOutcome, GridEvent};

/// Counts updates and optionally rejects them.
struct RecordingSource {
    fail: bool,
    updates: Cell<usize>,
}

impl RecordingSource {
    fn new(fail: bool) -> Self {
        Self {
            fail,
            updates: Cell::new(0),
        }
    }
}

impl ScheduleSource for RecordingSource {
    async fn fetch_scheduled_tasks(
        &self,
        _start: NaiveDate,
        _end: NaiveDate,
    ) -> Result<Vec<ScheduledTask>> {
        Ok(Vec::new())
    }

    async fn update_task_schedule(&self, _update: &ScheduleUpdate) -> Result<()> {
        self.updates.set(self.updates.get() + 1);
        if self.fail {
            Err(anyhow!("request timed out"))
        } else {
            Ok(())
        }
    }
}

fn drive(
    coordinator: &mut DragCoordinator,
    store: &ScheduleStore,
    events: Vec<GridEvent>,
) -> Option<GestureOutcome> {
    let mut outcome = None;
    for event in events {
        if let Some(result) = coordinator.handle(event, store.tasks()) {
            outcome = Some(result);
        }
    }
    outcome
}

fn expect_commit(outcome: Option<GestureOutcome>) -> ScheduleCommit {
    match outcome {
        Some(GestureOutcome::Commit(commit)) => commit,
        other => panic!("expected a commit, got {:?}", other),
    }
}

#[tokio::test]
async fn test_move_is_persisted() {
    let db = memory_db();
    let id = seed_scheduled(&db, "Write report", 2, "09:00", "10:00");
    let service = ScheduleService::new(db.connection());

    let mut store = ScheduleStore::new();
    store.refresh(&service, week()).await.unwrap();
    let mut coordinator = DragCoordinator::new(GridConfig::default(), week());

    let outcome = drive(
        &mut coordinator,
        &store,
        vec![
            GridEvent::PointerDown(at(2, 570.0)),
            GridEvent::PointerMove(at(3, 650.0)),
            GridEvent::PointerMove(at(4, 800.0)),
            GridEvent::PointerUp(at(4, 812.0)),
        ],
    );
    let result = store.commit(expect_commit(outcome), &service).await;
    assert!(matches!(result, CommitResult::Confirmed(_)));

    let saved = service.get_scheduled(id).unwrap().unwrap();
    assert_eq!(saved.day, 4);
    assert_eq!(saved.start_time, hm("13:00"));
    assert_eq!(saved.end_time, hm("14:00"));
    assert_eq!(saved.date, NaiveDate::from_ymd_opt(2025, 3, 6).unwrap());
    assert_eq!(store.get(id), Some(&saved));
}

#[tokio::test]
async fn test_failed_move_reverts_exactly() {
    let original = task(1, "Standup", 2, "09:00", "10:00");
    let bystander = task(2, "Lunch", 2, "12:00", "13:00");
    let mut store = ScheduleStore::with_tasks(vec![original.clone(), bystander.clone()]);
    let mut coordinator = DragCoordinator::new(GridConfig::default(), week());
    let source = RecordingSource::new(true);

    let outcome = drive(
        &mut coordinator,
        &store,
        vec![
            GridEvent::PointerDown(at(2, 540.0)),
            GridEvent::PointerUp(at(4, 780.0)),
        ],
    );
    let result = store.commit(expect_commit(outcome), &source).await;

    assert!(matches!(result, CommitResult::Reverted(_)));
    assert_eq!(store.tasks(), &[original, bystander]);
    let failures = store.take_failures();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].task_id, 1);
    assert_eq!(failures[0].attempted.start_time, hm("13:00"));
}

#[test]
fn test_release_on_origin_sends_nothing() {
    let store = ScheduleStore::with_tasks(vec![task(1, "Standup", 2, "09:00", "10:00")]);
    let mut coordinator = DragCoordinator::new(GridConfig::default(), week());

    let outcome = drive(
        &mut coordinator,
        &store,
        vec![
            GridEvent::PointerDown(at(2, 560.0)),
            GridEvent::PointerMove(at(6, 100.0)),
            GridEvent::PointerMove(at(2, 300.0)),
            GridEvent::PointerUp(at(2, 562.0)),
        ],
    );
    assert_eq!(outcome, None);
    assert!(coordinator.is_idle());
}

#[test]
fn test_cancelled_drag_sends_nothing() {
    let store = ScheduleStore::with_tasks(vec![task(1, "Standup", 2, "09:00", "10:00")]);
    let mut coordinator = DragCoordinator::new(GridConfig::default(), week());

    let outcome = drive(
        &mut coordinator,
        &store,
        vec![
            GridEvent::PointerDown(at(2, 560.0)),
            GridEvent::PointerMove(at(5, 900.0)),
            GridEvent::Cancel,
            GridEvent::PointerUp(at(5, 900.0)),
        ],
    );
    assert_eq!(outcome, None);
}

#[tokio::test]
async fn test_drop_schedules_todo() {
    let db = memory_db();
    let service = ScheduleService::new(db.connection());
    let todo = service.create_todo("Gym", Some(45)).unwrap();

    let mut store = ScheduleStore::new();
    let mut coordinator = DragCoordinator::new(GridConfig::default(), week());
    let outcome = drive(
        &mut coordinator,
        &store,
        vec![
            GridEvent::ExternalEnter {
                data: Some(todo.to_drag_data().unwrap()),
                pos: at(3, 200.0),
            },
            GridEvent::PointerMove(at(1, 400.0)),
            GridEvent::ExternalDrop(at(0, 481.0)),
        ],
    );

    let result = store.commit(expect_commit(outcome), &service).await;
    let scheduled = match result {
        CommitResult::Confirmed(task) => task,
        other => panic!("expected confirmation, got {:?}", other),
    };
    assert_eq!(scheduled.start_time, hm("08:00"));
    assert_eq!(scheduled.end_time, hm("08:45"));
    assert_eq!(scheduled.date, NaiveDate::from_ymd_opt(2025, 3, 2).unwrap());
    assert!(service.list_unscheduled().unwrap().is_empty());
    assert_eq!(service.find_scheduled(week().start(), week().end()).unwrap(), vec![scheduled]);
}

#[tokio::test]
async fn test_failed_drop_leaves_grid_empty() {
    let mut store = ScheduleStore::new();
    let mut coordinator = DragCoordinator::new(GridConfig::default(), week());
    let source = RecordingSource::new(true);

    let outcome = drive(
        &mut coordinator,
        &store,
        vec![
            GridEvent::ExternalEnter {
                data: Some(r#"{"id":5,"title":"Call mum"}"#.to_string()),
                pos: at(1, 600.0),
            },
            GridEvent::ExternalDrop(at(1, 600.0)),
        ],
    );
    store.commit(expect_commit(outcome), &source).await;

    assert!(store.is_empty());
    assert_eq!(source.updates.get(), 1);
    assert_eq!(store.take_failures().len(), 1);
}

#[tokio::test]
async fn test_resize_respects_minimum_duration() {
    let db = memory_db();
    let id = seed_scheduled(&db, "Focus", 1, "14:00", "16:00");
    let service = ScheduleService::new(db.connection());
    let mut store = ScheduleStore::new();
    store.refresh(&service, week()).await.unwrap();
    let mut coordinator = DragCoordinator::new(GridConfig::default(), week());

    // Handle sits in the bottom 8 px of the block; drag it far above the start.
    let outcome = drive(
        &mut coordinator,
        &store,
        vec![
            GridEvent::PointerDown(at(1, 957.0)),
            GridEvent::PointerMove(at(1, 700.0)),
            GridEvent::PointerUp(at(1, 600.0)),
        ],
    );
    store.commit(expect_commit(outcome), &service).await;

    let saved = service.get_scheduled(id).unwrap().unwrap();
    assert_eq!(saved.start_time, hm("14:00"));
    assert_eq!(saved.end_time, hm("14:30"));
}

#[tokio::test]
async fn test_week_navigation_reloads_window() {
    let db = memory_db();
    seed_scheduled(&db, "This week", 3, "09:00", "10:00");
    let service = ScheduleService::new(db.connection());

    let mut store = ScheduleStore::new();
    assert_eq!(store.refresh(&service, week()).await.unwrap(), 1);
    assert_eq!(store.refresh(&service, week().next()).await.unwrap(), 0);
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_idempotent_update_through_store() {
    let db = memory_db();
    let id = seed_scheduled(&db, "Review", 0, "10:00", "11:00");
    let service = ScheduleService::new(db.connection());
    let mut store = ScheduleStore::new();
    store.refresh(&service, week()).await.unwrap();

    let original = store.get(id).unwrap().clone();
    let commit = ScheduleCommit::Resize {
        task_id: id,
        end_time: hm("11:30"),
        original,
    };
    store.commit(commit.clone(), &service).await;
    let again = store.commit(commit, &service).await;

    assert!(matches!(again, CommitResult::Confirmed(_)));
    assert_eq!(service.find_scheduled(week().start(), week().end()).unwrap().len(), 1);
    assert_eq!(store.get(id).unwrap().end_time, hm("11:30"));
}

#[test]
fn test_drop_above_first_visible_hour_clamps() {
    let config = GridConfig {
        grid_origin_hour: 8,
        ..GridConfig::default()
    };
    let store = ScheduleStore::new();
    let mut coordinator = DragCoordinator::new(config, week());

    // 06:00 sits 120 px above an 08:00 origin.
    let outcome = drive(
        &mut coordinator,
        &store,
        vec![
            GridEvent::ExternalEnter {
                data: Some(r#"{"id":8,"title":"Run"}"#.to_string()),
                pos: at(2, -120.0),
            },
            GridEvent::ExternalDrop(at(2, -120.0)),
        ],
    );
    match expect_commit(outcome) {
        ScheduleCommit::ScheduleNew { task } => {
            assert_eq!(task.start_time, hm("08:00"));
            assert_eq!(task.end_time, hm("09:00"));
            assert_eq!(task.day, 2);
        }
        other => panic!("expected schedule, got {:?}", other),
    }
}

#[test]
fn test_small_wobble_on_click_selects() {
    let store = ScheduleStore::with_tasks(vec![task(1, "Standup", 2, "09:00", "10:00")]);
    let mut coordinator = DragCoordinator::new(GridConfig::default(), week());

    let outcome = drive(
        &mut coordinator,
        &store,
        vec![
            GridEvent::PointerDown(at(2, 570.0)),
            GridEvent::PointerMove(at(2, 572.0)),
            GridEvent::PointerUp(at(2, 573.0)),
        ],
    );
    assert_eq!(outcome, Some(GestureOutcome::Selected(1)));
}

#[tokio::test]
async fn test_undersized_resize_never_reaches_database() {
    let db = memory_db();
    let id = seed_scheduled(&db, "Focus", 2, "09:00", "10:00");
    let service = ScheduleService::new(db.connection());
    let mut store = ScheduleStore::new();
    store.refresh(&service, week()).await.unwrap();

    let commit = ScheduleCommit::Resize {
        task_id: id,
        end_time: hm("09:05"),
        original: store.get(id).unwrap().clone(),
    };
    assert_eq!(store.commit(commit, &service).await, CommitResult::Dropped);

    let saved = service.get_scheduled(id).unwrap().unwrap();
    assert_eq!(saved.end_time, hm("10:00"));
    assert_eq!(store.get(id), Some(&saved));
}

#[tokio::test]
async fn test_completed_task_stays_done_after_move() {
    let db = memory_db();
    let id = seed_scheduled(&db, "Laundry", 1, "09:00", "10:00");
    let service = ScheduleService::new(db.connection());
    service.set_completed(id, true).unwrap();

    let mut store = ScheduleStore::new();
    store.refresh(&service, week()).await.unwrap();
    assert!(store.get(id).unwrap().completed);

    let mut coordinator = DragCoordinator::new(GridConfig::default(), week());
    let outcome = drive(
        &mut coordinator,
        &store,
        vec![
            GridEvent::PointerDown(at(1, 570.0)),
            GridEvent::PointerUp(at(3, 690.0)),
        ],
    );
    store.commit(expect_commit(outcome), &service).await;

    let saved = service.get_scheduled(id).unwrap().unwrap();
    assert_eq!(saved.day, 3);
    assert!(saved.completed);
    assert_eq!(store.get(id), Some(&saved));
}

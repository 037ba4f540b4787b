// Test fixtures - reusable test data
// Provides a fixed week, grid positions and a seeded database

#![allow(dead_code)]

use chrono::{NaiveDate, Weekday};
use egui::{pos2, Pos2};
use week_scheduler::models::schedule::ScheduleUpdate;
use week_scheduler::models::task::{ScheduledTask, TaskId, TimeOfDay};
use week_scheduler::services::database::Database;
use week_scheduler::services::schedule::ScheduleService;
use week_scheduler::utils::date::WeekWindow;

/// Sunday 2 March 2025 through Saturday 8 March 2025
pub fn week() -> WeekWindow {
    WeekWindow::containing(NaiveDate::from_ymd_opt(2025, 3, 5).unwrap(), Weekday::Sun)
}

pub fn hm(text: &str) -> TimeOfDay {
    text.parse().unwrap()
}

/// Centre of `day`'s column at `minute` pixels down, on the default grid.
pub fn at(day: u8, minute: f32) -> Pos2 {
    pos2(day as f32 * 120.0 + 60.0, minute)
}

pub fn task(id: TaskId, title: &str, day: u8, start: &str, end: &str) -> ScheduledTask {
    ScheduledTask::new(id, title, day, hm(start), hm(end), week().date_for_day(day)).unwrap()
}

pub fn memory_db() -> Database {
    let db = Database::new(":memory:").expect("Failed to create database");
    db.initialize_schema().expect("Failed to initialize schema");
    db
}

/// Create a todo and place it on the grid, returning its id.
pub fn seed_scheduled(db: &Database, title: &str, day: u8, start: &str, end: &str) -> TaskId {
    let service = ScheduleService::new(db.connection());
    let todo = service.create_todo(title, None).unwrap();
    service
        .update_schedule(&ScheduleUpdate {
            id: todo.id,
            day,
            start_time: hm(start),
            end_time: hm(end),
            date: week().date_for_day(day),
        })
        .unwrap();
    todo.id
}

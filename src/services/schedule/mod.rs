//! Schedule service entry point.
//! Defines the persistence collaborator used by the grid and a SQLite-backed
//! implementation, plus the view-level store that applies edits optimistically.

use anyhow::Result;
use chrono::NaiveDate;
use rusqlite::Connection;

use crate::models::schedule::ScheduleUpdate;
use crate::models::settings::DEFAULT_MINIMUM_DURATION;
use crate::models::task::ScheduledTask;

pub mod crud;
pub mod store;

pub use store::{CommitResult, PendingWrite, ScheduleStore};

/// Where scheduled tasks come from and where schedule changes go.
///
/// Implementations own transport and timeouts; the store only awaits the
/// result.
#[allow(async_fn_in_trait)]
pub trait ScheduleSource {
    /// All scheduled tasks whose date lies in `start..=end`.
    async fn fetch_scheduled_tasks(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<ScheduledTask>>;

    /// Persist a task's day, times and date. Must be idempotent.
    async fn update_task_schedule(&self, update: &ScheduleUpdate) -> Result<()>;
}

/// Service for todos and their schedules stored in SQLite.
pub struct ScheduleService<'a> {
    pub(crate) conn: &'a Connection,
    pub(crate) minimum_duration: u16,
}

impl<'a> ScheduleService<'a> {
    /// Create a new ScheduleService with a database connection
    pub fn new(conn: &'a Connection) -> Self {
        Self {
            conn,
            minimum_duration: DEFAULT_MINIMUM_DURATION,
        }
    }

    /// Refuse schedules shorter than `minutes`.
    pub fn with_minimum_duration(mut self, minutes: u16) -> Self {
        self.minimum_duration = minutes;
        self
    }
}

impl ScheduleSource for ScheduleService<'_> {
    async fn fetch_scheduled_tasks(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<ScheduledTask>> {
        self.find_scheduled(start, end)
    }

    async fn update_task_schedule(&self, update: &ScheduleUpdate) -> Result<()> {
        self.update_schedule(update)
    }
}

// Schedule messages
// Commits emitted by the drag coordinator, the update request sent to the
// persistence collaborator, and the failure notice raised on revert.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::task::{ScheduledTask, TaskId, TimeOfDay};

/// The single change produced by a completed grid gesture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleCommit {
    /// Task moved to a new slot; duration unchanged.
    Relocate {
        task_id: TaskId,
        day: u8,
        start_time: TimeOfDay,
        end_time: TimeOfDay,
        date: NaiveDate,
        original: ScheduledTask,
    },
    /// Task end time changed; day and start unchanged.
    Resize {
        task_id: TaskId,
        end_time: TimeOfDay,
        original: ScheduledTask,
    },
    /// A todo from the side list placed on the grid.
    ScheduleNew { task: ScheduledTask },
}

impl ScheduleCommit {
    pub fn task_id(&self) -> TaskId {
        match self {
            ScheduleCommit::Relocate { task_id, .. } | ScheduleCommit::Resize { task_id, .. } => {
                *task_id
            }
            ScheduleCommit::ScheduleNew { task } => task.id,
        }
    }

    /// The task as it looks once this commit is applied to `current`.
    pub fn apply_to(&self, current: &ScheduledTask) -> ScheduledTask {
        match self {
            ScheduleCommit::Relocate {
                day,
                start_time,
                end_time,
                date,
                ..
            } => ScheduledTask {
                day: *day,
                start_time: *start_time,
                end_time: *end_time,
                date: *date,
                ..current.clone()
            },
            ScheduleCommit::Resize { end_time, .. } => ScheduledTask {
                end_time: *end_time,
                ..current.clone()
            },
            ScheduleCommit::ScheduleNew { task } => task.clone(),
        }
    }

    pub fn describe(&self) -> &'static str {
        match self {
            ScheduleCommit::Relocate { .. } => "move",
            ScheduleCommit::Resize { .. } => "resize",
            ScheduleCommit::ScheduleNew { .. } => "schedule",
        }
    }
}

/// Request to persist a task's schedule. Submitting it twice is harmless.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleUpdate {
    pub id: TaskId,
    pub day: u8,
    pub start_time: TimeOfDay,
    pub end_time: TimeOfDay,
    pub date: NaiveDate,
}

impl From<&ScheduledTask> for ScheduleUpdate {
    fn from(task: &ScheduledTask) -> Self {
        Self {
            id: task.id,
            day: task.day,
            start_time: task.start_time,
            end_time: task.end_time,
            date: task.date,
        }
    }
}

/// Raised when a persisted change was rejected and the grid reverted it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleFailure {
    pub task_id: TaskId,
    pub attempted: ScheduleUpdate,
    pub reason: String,
}

impl ScheduleFailure {
    pub fn message(&self) -> String {
        format!(
            "Could not save schedule {} {}-{}: {}",
            self.attempted.date, self.attempted.start_time, self.attempted.end_time, self.reason
        )
    }
}

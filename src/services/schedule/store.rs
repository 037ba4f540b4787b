//! View-level store of the tasks rendered on the grid.
//!
//! Every grid edit goes through one protocol: [`ScheduleStore::apply_optimistic`]
//! changes the in-memory list at once and hands back a [`PendingWrite`];
//! the write is then either confirmed or reverted. Reverting restores the
//! exact pre-commit snapshot of that one task and queues a
//! [`ScheduleFailure`] for the host to display.

use anyhow::Result;

use super::ScheduleSource;
use crate::models::schedule::{ScheduleCommit, ScheduleFailure, ScheduleUpdate};
use crate::models::settings::DEFAULT_MINIMUM_DURATION;
use crate::models::task::{ScheduledTask, TaskId};
use crate::utils::date::WeekWindow;

/// An optimistic edit waiting for the persistence result.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingWrite {
    pub update: ScheduleUpdate,
    applied: ScheduledTask,
    snapshot: Option<ScheduledTask>,
}

impl PendingWrite {
    pub fn task_id(&self) -> TaskId {
        self.update.id
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CommitResult {
    /// Persisted; the store already showed the new value.
    Confirmed(ScheduledTask),
    /// Persistence failed and the task was put back.
    Reverted(ScheduleFailure),
    /// The commit referred to a task no longer on the grid, or was rejected
    /// before reaching the source.
    Dropped,
}

#[derive(Debug)]
pub struct ScheduleStore {
    tasks: Vec<ScheduledTask>,
    selected_task_id: Option<TaskId>,
    failures: Vec<ScheduleFailure>,
    minimum_duration: u16,
}

impl Default for ScheduleStore {
    fn default() -> Self {
        Self {
            tasks: Vec::new(),
            selected_task_id: None,
            failures: Vec::new(),
            minimum_duration: DEFAULT_MINIMUM_DURATION,
        }
    }
}

impl ScheduleStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tasks(tasks: Vec<ScheduledTask>) -> Self {
        Self {
            tasks,
            ..Self::default()
        }
    }

    /// Reject edits that leave a task shorter than `minutes`.
    pub fn with_minimum_duration(mut self, minutes: u16) -> Self {
        self.minimum_duration = minutes;
        self
    }

    pub fn minimum_duration(&self) -> u16 {
        self.minimum_duration
    }

    /// Tasks in paint order.
    pub fn tasks(&self) -> &[ScheduledTask] {
        &self.tasks
    }

    pub fn get(&self, id: TaskId) -> Option<&ScheduledTask> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn selected_task_id(&self) -> Option<TaskId> {
        self.selected_task_id
    }

    pub fn selected_task(&self) -> Option<&ScheduledTask> {
        self.selected_task_id.and_then(|id| self.get(id))
    }

    pub fn select(&mut self, id: Option<TaskId>) {
        self.selected_task_id = id;
    }

    /// Swap in a freshly fetched window of tasks.
    pub fn replace_all(&mut self, tasks: Vec<ScheduledTask>) {
        self.tasks = tasks;
        if let Some(id) = self.selected_task_id {
            if self.get(id).is_none() {
                self.selected_task_id = None;
            }
        }
    }

    /// Failure notices raised since the last call.
    pub fn take_failures(&mut self) -> Vec<ScheduleFailure> {
        std::mem::take(&mut self.failures)
    }

    /// Apply a commit to the in-memory list immediately.
    ///
    /// Returns `None` when the commit targets a task that is no longer here,
    /// or when the result would be invalid or shorter than the minimum
    /// duration. The list is left untouched in both cases.
    pub fn apply_optimistic(&mut self, commit: &ScheduleCommit) -> Option<PendingWrite> {
        let task_id = commit.task_id();
        let position = self.tasks.iter().position(|task| task.id == task_id);

        let applied = match (commit, position) {
            (ScheduleCommit::ScheduleNew { task }, _) => task.clone(),
            (_, Some(index)) => commit.apply_to(&self.tasks[index]),
            (_, None) => {
                log::debug!(
                    "Dropping {} commit for task {} which is no longer on the grid",
                    commit.describe(),
                    task_id
                );
                return None;
            }
        };
        if let Err(err) = applied.validate_with_minimum(self.minimum_duration) {
            log::warn!("Ignoring {} of task {}: {}", commit.describe(), task_id, err);
            return None;
        }

        let snapshot = match position {
            Some(index) => Some(std::mem::replace(&mut self.tasks[index], applied.clone())),
            None => {
                self.tasks.push(applied.clone());
                None
            }
        };

        Some(PendingWrite {
            update: ScheduleUpdate::from(&applied),
            applied,
            snapshot,
        })
    }

    pub fn confirm(&mut self, pending: PendingWrite) -> ScheduledTask {
        log::debug!("Schedule of task {} saved", pending.task_id());
        pending.applied
    }

    /// Undo an optimistic edit after persistence failed.
    ///
    /// Only the affected task is touched. If a later edit already replaced
    /// the optimistic value, that newer value is kept.
    pub fn revert(&mut self, pending: PendingWrite, reason: impl Into<String>) -> ScheduleFailure {
        let task_id = pending.task_id();
        let reason = reason.into();
        log::warn!("Reverting task {} after failed save: {}", task_id, reason);

        match self.tasks.iter().position(|task| task.id == task_id) {
            Some(index) if self.tasks[index] == pending.applied => match pending.snapshot {
                Some(snapshot) => self.tasks[index] = snapshot,
                None => {
                    self.tasks.remove(index);
                    if self.selected_task_id == Some(task_id) {
                        self.selected_task_id = None;
                    }
                }
            },
            Some(_) => log::debug!("Task {} changed again since the failed save", task_id),
            None => log::debug!("Task {} left the grid before its save failed", task_id),
        }

        let failure = ScheduleFailure {
            task_id,
            attempted: pending.update,
            reason,
        };
        self.failures.push(failure.clone());
        failure
    }

    /// Apply a commit, persist it through `source`, and revert on failure.
    pub async fn commit<S: ScheduleSource>(
        &mut self,
        commit: ScheduleCommit,
        source: &S,
    ) -> CommitResult {
        let Some(pending) = self.apply_optimistic(&commit) else {
            return CommitResult::Dropped;
        };

        match source.update_task_schedule(&pending.update).await {
            Ok(()) => CommitResult::Confirmed(self.confirm(pending)),
            Err(err) => {
                log::error!("Failed to save schedule for task {}: {:#}", pending.task_id(), err);
                CommitResult::Reverted(self.revert(pending, err.to_string()))
            }
        }
    }

    /// Load the tasks of `week` from `source`, replacing the current list.
    pub async fn refresh<S: ScheduleSource>(&mut self, source: &S, week: WeekWindow) -> Result<usize> {
        let tasks = source.fetch_scheduled_tasks(week.start(), week.end()).await?;
        let inconsistent = tasks.iter().filter(|task| !task.matches_week(&week)).count();
        if inconsistent > 0 {
            log::warn!(
                "{} task(s) in week of {} have a day index that disagrees with their date",
                inconsistent,
                week.start()
            );
        }
        let count = tasks.len();
        self.replace_all(tasks);
        Ok(count)
    }
}

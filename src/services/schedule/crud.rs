use super::ScheduleService;
use crate::models::schedule::ScheduleUpdate;
use crate::models::task::{
    ScheduledTask, TaskError, TaskId, TimeOfDay, UnscheduledTask, DAYS_PER_WEEK,
};
use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use rusqlite::{self, params, Row};

impl<'a> ScheduleService<'a> {
    /// Create a new, unscheduled todo.
    pub fn create_todo(&self, title: &str, duration: Option<u16>) -> Result<UnscheduledTask> {
        if title.trim().is_empty() {
            return Err(anyhow!("Todo title cannot be empty"));
        }

        self.conn
            .execute(
                "INSERT INTO todos (title, duration_minutes) VALUES (?, ?)",
                params![title, duration],
            )
            .context("Failed to insert todo")?;

        let id = self.conn.last_insert_rowid();
        Ok(UnscheduledTask::new(id, title, duration))
    }

    /// Todos that are not on the grid yet, oldest first.
    pub fn list_unscheduled(&self) -> Result<Vec<UnscheduledTask>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, title, duration_minutes FROM todos
                 WHERE schedule_date IS NULL
                 ORDER BY id",
            )
            .context("Failed to prepare unscheduled query")?;

        let todos = stmt
            .query_map([], |row| {
                Ok(UnscheduledTask {
                    id: row.get(0)?,
                    title: row.get(1)?,
                    duration: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()
            .context("Failed to read unscheduled todos")?;

        Ok(todos)
    }

    /// Scheduled todos whose date lies in `start..=end`.
    pub fn find_scheduled(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<ScheduledTask>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, title, schedule_day, start_minute, end_minute, schedule_date, completed
                 FROM todos
                 WHERE schedule_date IS NOT NULL
                   AND schedule_date >= ? AND schedule_date <= ?
                 ORDER BY schedule_date, start_minute, id",
            )
            .context("Failed to prepare schedule query")?;

        let tasks = stmt
            .query_map(params![start, end], row_to_task)?
            .collect::<Result<Vec<_>, _>>()
            .context("Failed to read scheduled todos")?;

        Ok(tasks)
    }

    /// Retrieve a scheduled todo by ID.
    pub fn get_scheduled(&self, id: TaskId) -> Result<Option<ScheduledTask>> {
        let result = self.conn.query_row(
            "SELECT id, title, schedule_day, start_minute, end_minute, schedule_date, completed
             FROM todos WHERE id = ? AND schedule_date IS NOT NULL",
            [id],
            row_to_task,
        );

        match result {
            Ok(task) => Ok(Some(task)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Write a todo's schedule. Writing the same values again succeeds.
    ///
    /// Spans shorter than the service's minimum duration are refused.
    pub fn update_schedule(&self, update: &ScheduleUpdate) -> Result<()> {
        if update.day >= DAYS_PER_WEEK {
            return Err(TaskError::InvalidDay(update.day).into());
        }
        if update.end_time <= update.start_time {
            return Err(TaskError::EndBeforeStart.into());
        }
        let actual = update.start_time.minutes_until(update.end_time);
        if actual < self.minimum_duration {
            return Err(TaskError::TooShort {
                actual,
                minimum: self.minimum_duration,
            }
            .into());
        }

        let rows_affected = self
            .conn
            .execute(
                "UPDATE todos SET
                    schedule_day = ?, start_minute = ?, end_minute = ?, schedule_date = ?,
                    updated_at = CURRENT_TIMESTAMP
                 WHERE id = ?",
                params![
                    update.day,
                    update.start_time.minutes(),
                    update.end_time.minutes(),
                    update.date,
                    update.id,
                ],
            )
            .context("Failed to update todo schedule")?;

        if rows_affected == 0 {
            return Err(anyhow!("Todo with id {} not found", update.id));
        }

        Ok(())
    }

    /// Mark a todo done or not done. Its schedule is left as it is.
    pub fn set_completed(&self, id: TaskId, completed: bool) -> Result<()> {
        let rows_affected = self
            .conn
            .execute(
                "UPDATE todos SET completed = ?, updated_at = CURRENT_TIMESTAMP WHERE id = ?",
                params![completed, id],
            )
            .context("Failed to update todo completion")?;

        if rows_affected == 0 {
            return Err(anyhow!("Todo with id {} not found", id));
        }

        Ok(())
    }

    /// Take a todo off the grid, returning it to the unscheduled list.
    pub fn unschedule(&self, id: TaskId) -> Result<()> {
        let rows_affected = self
            .conn
            .execute(
                "UPDATE todos SET
                    schedule_day = NULL, start_minute = NULL, end_minute = NULL,
                    schedule_date = NULL, updated_at = CURRENT_TIMESTAMP
                 WHERE id = ?",
                [id],
            )
            .context("Failed to unschedule todo")?;

        if rows_affected == 0 {
            return Err(anyhow!("Todo with id {} not found", id));
        }

        Ok(())
    }
}

fn row_to_task(row: &Row<'_>) -> rusqlite::Result<ScheduledTask> {
    Ok(ScheduledTask {
        id: row.get(0)?,
        title: row.get(1)?,
        day: row.get(2)?,
        start_time: minute_column(row, 3)?,
        end_time: minute_column(row, 4)?,
        date: row.get(5)?,
        completed: row.get(6)?,
    })
}

fn minute_column(row: &Row<'_>, index: usize) -> rusqlite::Result<TimeOfDay> {
    let minutes: u16 = row.get(index)?;
    TimeOfDay::from_minutes(minutes).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(
            index,
            rusqlite::types::Type::Integer,
            Box::new(e),
        )
    })
}

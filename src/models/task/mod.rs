// Task module
// Scheduled and unscheduled todo models for the weekly time grid

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::utils::date::WeekWindow;

/// Identifier of a todo, shared by its scheduled and unscheduled forms.
pub type TaskId = i64;

pub const MINUTES_PER_DAY: u16 = 24 * 60;
pub const DAYS_PER_WEEK: u8 = 7;

/// Validation failures for task data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaskError {
    #[error("Task title cannot be empty")]
    EmptyTitle,
    #[error("Day index {0} is outside the week (0-6)")]
    InvalidDay(u8),
    #[error("'{0}' is not a valid HH:MM time of day")]
    InvalidTime(String),
    #[error("Task end time must be after start time")]
    EndBeforeStart,
    #[error("Task lasts {actual} minutes, shorter than the {minimum} minute minimum")]
    TooShort { actual: u16, minimum: u16 },
}

/// Minute-granular time of day, `00:00` through `24:00` inclusive.
///
/// `24:00` only exists so a task can end at midnight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay(u16);

impl TimeOfDay {
    pub const END_OF_DAY: TimeOfDay = TimeOfDay(MINUTES_PER_DAY);

    pub fn from_minutes(minutes: u16) -> Result<Self, TaskError> {
        if minutes > MINUTES_PER_DAY {
            return Err(TaskError::InvalidTime(format!("{} minutes", minutes)));
        }
        Ok(Self(minutes))
    }

    /// Builds a time from any minute count, pinning it into the day.
    pub fn saturating(minutes: u32) -> Self {
        Self(minutes.min(MINUTES_PER_DAY as u32) as u16)
    }

    pub fn from_hm(hour: u16, minute: u16) -> Result<Self, TaskError> {
        if minute >= 60 {
            return Err(TaskError::InvalidTime(format!("{}:{:02}", hour, minute)));
        }
        let total = hour
            .checked_mul(60)
            .and_then(|h| h.checked_add(minute))
            .ok_or_else(|| TaskError::InvalidTime(format!("{}:{:02}", hour, minute)))?;
        Self::from_minutes(total)
    }

    pub fn minutes(self) -> u16 {
        self.0
    }

    pub fn hour(self) -> u16 {
        self.0 / 60
    }

    pub fn minute(self) -> u16 {
        self.0 % 60
    }

    pub fn plus_minutes(self, minutes: u16) -> Self {
        Self::saturating(self.0 as u32 + minutes as u32)
    }

    /// Minutes from `self` until `later`, zero if `later` is not after `self`.
    pub fn minutes_until(self, later: TimeOfDay) -> u16 {
        later.0.saturating_sub(self.0)
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for TimeOfDay {
    type Err = TaskError;

    /// Accepts `H:MM` and `HH:MM`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || TaskError::InvalidTime(s.to_string());
        let (hour, minute) = s.trim().split_once(':').ok_or_else(invalid)?;
        if minute.len() != 2 {
            return Err(invalid());
        }
        let hour: u16 = hour.parse().map_err(|_| invalid())?;
        let minute: u16 = minute.parse().map_err(|_| invalid())?;
        Self::from_hm(hour, minute).map_err(|_| invalid())
    }
}

impl Serialize for TimeOfDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TimeOfDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

/// A todo placed on the weekly grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledTask {
    pub id: TaskId,
    pub title: String,
    /// Column index into the displayed week.
    pub day: u8,
    pub start_time: TimeOfDay,
    pub end_time: TimeOfDay,
    /// Calendar date of this occurrence; same weekday as `day`.
    pub date: NaiveDate,
    #[serde(default)]
    pub completed: bool,
}

impl ScheduledTask {
    /// Create a scheduled task, validating title, day and time order.
    ///
    /// # Examples
    /// ```
    /// use week_scheduler::models::task::{ScheduledTask, TimeOfDay};
    /// use chrono::NaiveDate;
    ///
    /// let date = NaiveDate::from_ymd_opt(2025, 3, 4).unwrap();
    /// let start: TimeOfDay = "09:00".parse().unwrap();
    /// let end: TimeOfDay = "10:30".parse().unwrap();
    /// let task = ScheduledTask::new(7, "Write report", 2, start, end, date).unwrap();
    /// assert_eq!(task.duration_minutes(), 90);
    /// ```
    pub fn new(
        id: TaskId,
        title: impl Into<String>,
        day: u8,
        start_time: TimeOfDay,
        end_time: TimeOfDay,
        date: NaiveDate,
    ) -> Result<Self, TaskError> {
        let task = Self {
            id,
            title: title.into(),
            day,
            start_time,
            end_time,
            date,
            completed: false,
        };
        task.validate()?;
        Ok(task)
    }

    pub fn validate(&self) -> Result<(), TaskError> {
        if self.title.trim().is_empty() {
            return Err(TaskError::EmptyTitle);
        }
        if self.day >= DAYS_PER_WEEK {
            return Err(TaskError::InvalidDay(self.day));
        }
        if self.end_time <= self.start_time {
            return Err(TaskError::EndBeforeStart);
        }
        Ok(())
    }

    /// Validate and additionally require at least `minimum` minutes of duration.
    pub fn validate_with_minimum(&self, minimum: u16) -> Result<(), TaskError> {
        self.validate()?;
        let actual = self.duration_minutes();
        if actual < minimum {
            return Err(TaskError::TooShort { actual, minimum });
        }
        Ok(())
    }

    pub fn duration_minutes(&self) -> u16 {
        self.start_time.minutes_until(self.end_time)
    }

    /// Whether `date` is the calendar date of column `day` in `week`.
    pub fn matches_week(&self, week: &WeekWindow) -> bool {
        week.day_index(self.date) == Some(self.day)
    }

    pub fn same_slot(&self, other: &ScheduledTask) -> bool {
        self.day == other.day
            && self.start_time == other.start_time
            && self.end_time == other.end_time
            && self.date == other.date
    }
}

/// A todo from the side list that has not been placed on the grid yet.
///
/// Travels as JSON drag data, e.g. `{"id":3,"title":"Gym","duration":45}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnscheduledTask {
    pub id: TaskId,
    pub title: String,
    /// Requested length in minutes; the grid default applies when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u16>,
}

impl UnscheduledTask {
    pub fn new(id: TaskId, title: impl Into<String>, duration: Option<u16>) -> Self {
        Self {
            id,
            title: title.into(),
            duration,
        }
    }

    pub fn from_drag_data(data: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(data)
    }

    pub fn to_drag_data(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

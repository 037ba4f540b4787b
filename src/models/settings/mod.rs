// Settings module
// Grid configuration shared by geometry, drag handling and rendering

use chrono::Weekday;
use serde::{Deserialize, Serialize};

/// Shortest span a scheduled task may cover, in minutes.
pub const DEFAULT_MINIMUM_DURATION: u16 = 30;

/// Read-only layout and snapping parameters for the weekly grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub pixels_per_minute: f32,
    pub day_column_width: f32,
    /// Hour shown at the top edge of the grid.
    pub grid_origin_hour: u8,
    /// Hour shown at the bottom edge of the grid (24 = midnight).
    pub last_visible_hour: u8,
    /// Snap used when moving or dropping a task.
    pub snap_increment_minutes: u16,
    /// Snap used for the end time while resizing.
    pub resize_snap_minutes: u16,
    pub minimum_duration_minutes: u16,
    /// Length given to dropped todos that do not carry a duration.
    pub default_drop_duration_minutes: u16,
    /// Weekday shown in column 0.
    pub first_day_of_week: Weekday,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            pixels_per_minute: 1.0,
            day_column_width: 120.0,
            grid_origin_hour: 0,
            last_visible_hour: 24,
            snap_increment_minutes: 5,
            resize_snap_minutes: 5,
            minimum_duration_minutes: DEFAULT_MINIMUM_DURATION,
            default_drop_duration_minutes: 60,
            first_day_of_week: Weekday::Sun,
        }
    }
}

impl GridConfig {
    pub fn visible_start_minute(&self) -> u16 {
        self.grid_origin_hour as u16 * 60
    }

    pub fn visible_end_minute(&self) -> u16 {
        self.last_visible_hour as u16 * 60
    }

    pub fn visible_minutes(&self) -> u16 {
        self.visible_end_minute()
            .saturating_sub(self.visible_start_minute())
    }

    pub fn grid_height(&self) -> f32 {
        self.visible_minutes() as f32 * self.pixels_per_minute
    }

    pub fn grid_width(&self) -> f32 {
        7.0 * self.day_column_width
    }

    pub fn validate(&self) -> Result<(), String> {
        if !(self.pixels_per_minute.is_finite() && self.pixels_per_minute > 0.0) {
            return Err("pixels_per_minute must be a positive number".to_string());
        }
        if !(self.day_column_width.is_finite() && self.day_column_width > 0.0) {
            return Err("day_column_width must be a positive number".to_string());
        }
        if self.last_visible_hour > 24 {
            return Err("last_visible_hour cannot be later than 24".to_string());
        }
        if self.grid_origin_hour >= self.last_visible_hour {
            return Err("grid_origin_hour must be before last_visible_hour".to_string());
        }
        if self.snap_increment_minutes == 0 || self.resize_snap_minutes == 0 {
            return Err("Snap increments must be at least one minute".to_string());
        }
        if self.minimum_duration_minutes == 0 {
            return Err("minimum_duration_minutes must be at least one minute".to_string());
        }
        if self.minimum_duration_minutes > self.visible_minutes() {
            return Err("minimum_duration_minutes does not fit in the visible hours".to_string());
        }
        Ok(())
    }
}

//! Time-slot geometry for the weekly grid.
//!
//! Pure conversions between `(day, minute-of-day)` slots and grid-local pixel
//! coordinates, where `(0, 0)` is the top-left corner of the first day column
//! at `grid_origin_hour`. Pointer positions are clamped, never rejected: a fast
//! drag may leave the grid and must still map to a slot.

use egui::{pos2, vec2, Pos2, Rect};

use crate::models::settings::GridConfig;
use crate::models::task::{ScheduledTask, TimeOfDay, DAYS_PER_WEEK};

/// Ratios are rounded to this many steps per unit before flooring, so a
/// block edge maps back to its own minute without pulling in nearby points.
const RATIO_STEPS: f64 = 1e4;

/// An addressable `(day, minute-of-day)` position on the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Slot {
    pub day: u8,
    pub minute_of_day: u16,
}

/// Pixel rectangle of a task block.
pub fn task_to_rect(task: &ScheduledTask, config: &GridConfig) -> Rect {
    block_rect(task.day, task.start_time, task.end_time, config)
}

pub fn block_rect(day: u8, start: TimeOfDay, end: TimeOfDay, config: &GridConfig) -> Rect {
    let top = minute_to_y(start.minutes(), config);
    let height = start.minutes_until(end) as f32 * config.pixels_per_minute;
    let left = day_to_x(day, config);
    Rect::from_min_size(pos2(left, top), vec2(config.day_column_width, height))
}

/// Slot under a grid-local point. No snapping is applied.
pub fn point_to_slot(point: Pos2, config: &GridConfig) -> Slot {
    let column = settled_floor(point.x, config.day_column_width);
    let day = column.clamp(0.0, (DAYS_PER_WEEK - 1) as f32) as u8;

    let first = config.visible_start_minute() as f32;
    let last = config.visible_end_minute() as f32;
    let offset = settled_floor(point.y, config.pixels_per_minute);
    let minute_of_day = (first + offset).clamp(first, last) as u16;

    Slot { day, minute_of_day }
}

fn settled_floor(value: f32, unit: f32) -> f32 {
    let ratio = value as f64 / unit as f64;
    ((ratio * RATIO_STEPS).round() / RATIO_STEPS).floor() as f32
}

/// Round to the nearest multiple of `increment`; exact halves round down.
pub fn snap(minute_of_day: u16, increment: u16) -> u16 {
    if increment == 0 {
        return minute_of_day;
    }
    let minute = minute_of_day as u32;
    let increment = increment as u32;
    let remainder = minute % increment;
    let snapped = if remainder * 2 > increment {
        minute - remainder + increment
    } else {
        minute - remainder
    };
    snapped.min(u16::MAX as u32) as u16
}

pub fn minute_to_y(minute_of_day: u16, config: &GridConfig) -> f32 {
    (minute_of_day as f32 - config.visible_start_minute() as f32) * config.pixels_per_minute
}

pub fn day_to_x(day: u8, config: &GridConfig) -> f32 {
    day as f32 * config.day_column_width
}

/// Local rect covering all seven columns and the visible hours.
pub fn grid_rect(config: &GridConfig) -> Rect {
    Rect::from_min_size(Pos2::ZERO, vec2(config.grid_width(), config.grid_height()))
}

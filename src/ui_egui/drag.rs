//! Drag/drop coordinator for the weekly grid.
//!
//! Pointer input arrives as [`GridEvent`]s in grid-local coordinates. The
//! coordinator is a small state machine:
//!
//! - Idle → pointer-down on a block body → Moving
//! - Idle → pointer-down on a block's resize handle → Resizing
//! - Idle → external item enters the grid → ExternalHover
//! - pointer-move → same state; only the pointer position is recorded
//! - pointer-up / drop → Idle, emitting at most one [`ScheduleCommit`]
//! - cancel → Idle, emitting nothing
//!
//! The candidate placement is derived from the recorded pointer position on
//! demand, so any number of move frames can be dropped or coalesced.

use egui::{pos2, Pos2, Vec2};

use super::geometry::{point_to_slot, snap, task_to_rect};
use super::resize::{hit_test, HitTarget};
use crate::models::schedule::ScheduleCommit;
use crate::models::settings::GridConfig;
use crate::models::task::{ScheduledTask, TaskId, TimeOfDay, UnscheduledTask};
use crate::utils::date::WeekWindow;

/// Pointer travel (px) below which a press-and-release counts as a click.
pub const CLICK_TOLERANCE: f32 = 4.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GestureKind {
    Move,
    Resize,
    ExternalDrop,
}

/// The gesture in progress and what it acts on.
#[derive(Clone, Debug, PartialEq)]
pub enum Gesture {
    Move { original: ScheduledTask },
    Resize { original: ScheduledTask },
    ExternalDrop { payload: UnscheduledTask },
}

/// Ephemeral state of an active gesture.
#[derive(Clone, Debug, PartialEq)]
pub struct DragState {
    pub gesture: Gesture,
    /// Pointer position relative to the block origin at press time.
    pub pointer_offset: Vec2,
    pub press_pos: Pos2,
    pub pointer_pos: Pos2,
    /// Set once the pointer has left the click tolerance.
    pub moved: bool,
}

impl DragState {
    pub fn kind(&self) -> GestureKind {
        match self.gesture {
            Gesture::Move { .. } => GestureKind::Move,
            Gesture::Resize { .. } => GestureKind::Resize,
            Gesture::ExternalDrop { .. } => GestureKind::ExternalDrop,
        }
    }

    pub fn subject_id(&self) -> TaskId {
        match &self.gesture {
            Gesture::Move { original } | Gesture::Resize { original } => original.id,
            Gesture::ExternalDrop { payload } => payload.id,
        }
    }

    pub fn original_task(&self) -> Option<&ScheduledTask> {
        match &self.gesture {
            Gesture::Move { original } | Gesture::Resize { original } => Some(original),
            Gesture::ExternalDrop { .. } => None,
        }
    }
}

/// Pointer and drag-and-drop input, in grid-local pixels.
#[derive(Clone, Debug, PartialEq)]
pub enum GridEvent {
    PointerDown(Pos2),
    PointerMove(Pos2),
    PointerUp(Pos2),
    /// An item dragged from outside entered the grid. `data` is its raw
    /// drag payload, if the source provided one.
    ExternalEnter { data: Option<String>, pos: Pos2 },
    ExternalDrop(Pos2),
    /// Escape, focus loss, or the pointer leaving the window.
    Cancel,
}

/// Result of a finished gesture.
#[derive(Clone, Debug, PartialEq)]
pub enum GestureOutcome {
    Commit(ScheduleCommit),
    /// A block was clicked rather than dragged.
    Selected(TaskId),
}

pub struct DragCoordinator {
    config: GridConfig,
    week: WeekWindow,
    active: Option<DragState>,
}

impl DragCoordinator {
    pub fn new(config: GridConfig, week: WeekWindow) -> Self {
        Self {
            config,
            week,
            active: None,
        }
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn week(&self) -> WeekWindow {
        self.week
    }

    /// Switch the displayed week. Any gesture in flight is abandoned.
    pub fn set_week(&mut self, week: WeekWindow) {
        if self.active.take().is_some() {
            log::debug!("Week changed mid-gesture; gesture cancelled");
        }
        self.week = week;
    }

    pub fn active(&self) -> Option<&DragState> {
        self.active.as_ref()
    }

    pub fn is_idle(&self) -> bool {
        self.active.is_none()
    }

    /// Feed one input event. `tasks` are the blocks currently on the grid.
    pub fn handle(&mut self, event: GridEvent, tasks: &[ScheduledTask]) -> Option<GestureOutcome> {
        match event {
            GridEvent::PointerDown(pos) => {
                self.begin_press(pos, tasks);
                None
            }
            GridEvent::ExternalEnter { data, pos } => {
                self.begin_external(data.as_deref(), pos);
                None
            }
            GridEvent::PointerMove(pos) => {
                if let Some(state) = self.active.as_mut() {
                    state.pointer_pos = pos;
                    if (pos - state.press_pos).length() > CLICK_TOLERANCE {
                        state.moved = true;
                    }
                }
                None
            }
            GridEvent::PointerUp(pos) | GridEvent::ExternalDrop(pos) => self.finish(pos),
            GridEvent::Cancel => {
                if let Some(state) = self.active.take() {
                    log::debug!(
                        "Cancelled {:?} gesture for task {}",
                        state.kind(),
                        state.subject_id()
                    );
                }
                None
            }
        }
    }

    /// Where the subject would land if released now.
    ///
    /// For moves and resizes this is the original task while the pointer has
    /// not left its slot.
    pub fn preview(&self) -> Option<ScheduledTask> {
        self.active.as_ref().map(|state| self.candidate(state))
    }

    fn begin_press(&mut self, pos: Pos2, tasks: &[ScheduledTask]) {
        if let Some(state) = &self.active {
            log::debug!(
                "Ignoring pointer-down during active {:?} gesture",
                state.kind()
            );
            return;
        }
        let Some((task, target)) = hit_test(tasks, pos, &self.config) else {
            return;
        };

        let pointer_offset = pos - task_to_rect(task, &self.config).min;
        let gesture = match target {
            HitTarget::Body => Gesture::Move {
                original: task.clone(),
            },
            HitTarget::ResizeHandle => Gesture::Resize {
                original: task.clone(),
            },
        };
        log::debug!("Starting {:?} on task {}", target, task.id);
        self.active = Some(DragState {
            gesture,
            pointer_offset,
            press_pos: pos,
            pointer_pos: pos,
            moved: false,
        });
    }

    fn begin_external(&mut self, data: Option<&str>, pos: Pos2) {
        if self.active.is_some() {
            log::debug!("Ignoring external drag while a gesture is active");
            return;
        }
        let Some(data) = data else {
            log::debug!("External drag carried no payload");
            return;
        };
        let payload = match UnscheduledTask::from_drag_data(data) {
            Ok(payload) => payload,
            Err(err) => {
                log::debug!("Ignoring unreadable drag payload: {}", err);
                return;
            }
        };
        self.active = Some(DragState {
            gesture: Gesture::ExternalDrop { payload },
            pointer_offset: Vec2::ZERO,
            press_pos: pos,
            pointer_pos: pos,
            moved: true,
        });
    }

    fn finish(&mut self, pos: Pos2) -> Option<GestureOutcome> {
        let mut state = self.active.take()?;
        state.pointer_pos = pos;
        if (pos - state.press_pos).length() > CLICK_TOLERANCE {
            state.moved = true;
        }
        if !state.moved {
            if let Some(original) = state.original_task() {
                return Some(GestureOutcome::Selected(original.id));
            }
        }
        let candidate = self.candidate(&state);

        match state.gesture {
            Gesture::Move { original } => {
                if candidate.same_slot(&original) {
                    return None;
                }
                log::debug!(
                    "Relocating task {} to day {} {}-{}",
                    original.id,
                    candidate.day,
                    candidate.start_time,
                    candidate.end_time
                );
                Some(GestureOutcome::Commit(ScheduleCommit::Relocate {
                    task_id: original.id,
                    day: candidate.day,
                    start_time: candidate.start_time,
                    end_time: candidate.end_time,
                    date: candidate.date,
                    original,
                }))
            }
            Gesture::Resize { original } => {
                if candidate.end_time == original.end_time {
                    return None;
                }
                log::debug!(
                    "Resizing task {} to end at {}",
                    original.id,
                    candidate.end_time
                );
                Some(GestureOutcome::Commit(ScheduleCommit::Resize {
                    task_id: original.id,
                    end_time: candidate.end_time,
                    original,
                }))
            }
            Gesture::ExternalDrop { payload } => {
                log::debug!(
                    "Scheduling todo {} on day {} at {}",
                    payload.id,
                    candidate.day,
                    candidate.start_time
                );
                Some(GestureOutcome::Commit(ScheduleCommit::ScheduleNew {
                    task: candidate,
                }))
            }
        }
    }

    fn candidate(&self, state: &DragState) -> ScheduledTask {
        let pos = state.pointer_pos;
        match &state.gesture {
            Gesture::Move { original } => {
                // Column under the pointer; block top stays at the grabbed offset.
                let day = point_to_slot(pos, &self.config).day;
                let top = pos2(pos.x, pos.y - state.pointer_offset.y);
                let minute = point_to_slot(top, &self.config).minute_of_day;
                let (start_time, end_time) = self.place(minute, original.duration_minutes());
                ScheduledTask {
                    day,
                    start_time,
                    end_time,
                    date: self.week.date_for_day(day),
                    ..original.clone()
                }
            }
            Gesture::Resize { original } => ScheduledTask {
                end_time: self.resized_end(original, pos),
                ..original.clone()
            },
            Gesture::ExternalDrop { payload } => {
                let slot = point_to_slot(pos, &self.config);
                let duration = payload
                    .duration
                    .unwrap_or(self.config.default_drop_duration_minutes)
                    .max(self.config.minimum_duration_minutes);
                let (start_time, end_time) = self.place(slot.minute_of_day, duration);
                ScheduledTask {
                    id: payload.id,
                    title: payload.title.clone(),
                    day: slot.day,
                    start_time,
                    end_time,
                    date: self.week.date_for_day(slot.day),
                    completed: false,
                }
            }
        }
    }

    /// Snap a start minute and keep the whole block inside the visible hours.
    fn place(&self, minute: u16, duration: u16) -> (TimeOfDay, TimeOfDay) {
        let first = self.config.visible_start_minute();
        let latest = self
            .config
            .visible_end_minute()
            .saturating_sub(duration)
            .max(first);
        let start = snap(minute, self.config.snap_increment_minutes).clamp(first, latest);
        let start_time = TimeOfDay::saturating(start as u32);
        (start_time, start_time.plus_minutes(duration))
    }

    fn resized_end(&self, original: &ScheduledTask, pos: Pos2) -> TimeOfDay {
        let pointer_minute = point_to_slot(pos, &self.config).minute_of_day;
        let snapped = snap(pointer_minute, self.config.resize_snap_minutes)
            .min(self.config.visible_end_minute());
        let floor = original
            .start_time
            .plus_minutes(self.config.minimum_duration_minutes);
        TimeOfDay::saturating(snapped as u32).max(floor)
    }
}

//! Weekly time grid rendering.
//!
//! Paints day headers, hour lines, task blocks and the drag preview, and
//! turns each frame's pointer input into [`GridEvent`]s for the
//! [`DragCoordinator`]. Blocks are painted in list order, so later tasks
//! cover earlier ones where they overlap.

use egui::{pos2, vec2, Align2, Color32, CursorIcon, FontId, Pos2, Rect, Sense, Stroke, Ui};

use super::drag::{DragCoordinator, GestureKind, GestureOutcome, GridEvent};
use super::geometry::{day_to_x, grid_rect, minute_to_y, task_to_rect};
use super::resize::{draw_handle, hit_test, HitTarget};
use crate::models::task::ScheduledTask;
use crate::services::schedule::ScheduleStore;

pub const TIME_LABEL_WIDTH: f32 = 52.0;
pub const HEADER_HEIGHT: f32 = 36.0;
pub const COMPLETED_FILL: Color32 = Color32::from_rgb(209, 213, 219);
const COMPLETED_TEXT: Color32 = Color32::from_rgb(75, 85, 99);

/// One frame of pointer state, in grid-local coordinates.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameInput {
    pub pointer: Option<Pos2>,
    pub over_grid: bool,
    pub pressed: bool,
    pub released: bool,
    pub escape: bool,
    pub focused: bool,
    /// Payload of an egui drag-and-drop in progress, if any.
    pub external: Option<String>,
}

/// Translate a frame of input into coordinator events.
///
/// `active` is the gesture in progress when the frame starts. A press and
/// release landing in the same frame yield both events.
pub fn frame_events(input: &FrameInput, active: Option<GestureKind>) -> Vec<GridEvent> {
    let mut events = Vec::new();

    if input.escape || !input.focused {
        if active.is_some() {
            events.push(GridEvent::Cancel);
        }
        return events;
    }
    let Some(pos) = input.pointer else {
        if active.is_some() {
            events.push(GridEvent::Cancel);
        }
        return events;
    };

    match active {
        None => {
            if let Some(data) = &input.external {
                if input.over_grid {
                    events.push(GridEvent::ExternalEnter {
                        data: Some(data.clone()),
                        pos,
                    });
                    if input.released {
                        events.push(GridEvent::ExternalDrop(pos));
                    }
                }
            } else if input.pressed && input.over_grid {
                events.push(GridEvent::PointerDown(pos));
                if input.released {
                    events.push(GridEvent::PointerUp(pos));
                }
            }
        }
        Some(GestureKind::ExternalDrop) => {
            if input.external.is_none() || !input.over_grid {
                events.push(GridEvent::Cancel);
            } else if input.released {
                events.push(GridEvent::ExternalDrop(pos));
            } else {
                events.push(GridEvent::PointerMove(pos));
            }
        }
        Some(_) => {
            if input.released {
                events.push(GridEvent::PointerUp(pos));
            } else {
                events.push(GridEvent::PointerMove(pos));
            }
        }
    }

    events
}

/// Render the week and feed this frame's input to `coordinator`.
///
/// Returns the outcome of a gesture that finished during this frame.
pub fn render_week_grid(
    ui: &mut Ui,
    store: &ScheduleStore,
    coordinator: &mut DragCoordinator,
) -> Option<GestureOutcome> {
    let config = coordinator.config().clone();
    let local_grid = grid_rect(&config);
    let total = vec2(
        TIME_LABEL_WIDTH + local_grid.width(),
        HEADER_HEIGHT + local_grid.height(),
    );
    let (outer, response) = ui.allocate_exact_size(total, Sense::click_and_drag());
    let origin = outer.min + vec2(TIME_LABEL_WIDTH, HEADER_HEIGHT);
    let screen_grid = local_grid.translate(origin.to_vec2());
    let to_local = |p: Pos2| (p - origin).to_pos2();
    let to_screen = |r: Rect| r.translate(origin.to_vec2());

    // Input
    let ctx = ui.ctx().clone();
    let input = ui.input(|i| {
        let pointer = i.pointer.latest_pos();
        FrameInput {
            pointer: pointer.map(to_local),
            over_grid: pointer.is_some_and(|p| screen_grid.contains(p)),
            pressed: i.pointer.primary_pressed(),
            released: i.pointer.primary_released(),
            escape: i.key_pressed(egui::Key::Escape),
            focused: i.focused,
            external: None,
        }
    });
    let input = FrameInput {
        external: egui::DragAndDrop::payload::<String>(&ctx).map(|p| p.as_ref().clone()),
        ..input
    };

    let mut outcome = None;
    for event in frame_events(&input, coordinator.active().map(|s| s.kind())) {
        let dropped = matches!(event, GridEvent::ExternalDrop(_));
        if let Some(result) = coordinator.handle(event, store.tasks()) {
            outcome = Some(result);
        }
        if dropped {
            egui::DragAndDrop::clear_payload(&ctx);
        }
    }
    if !coordinator.is_idle() {
        ctx.request_repaint();
    }

    // Painting
    let painter = ui.painter_at(outer);
    let visuals = ui.visuals().clone();
    let line = visuals.widgets.noninteractive.bg_stroke;
    let text_color = visuals.text_color();

    painter.rect_filled(screen_grid, 0.0, visuals.extreme_bg_color);

    for (day, date) in coordinator.week().dates().enumerate() {
        let x = origin.x + day_to_x(day as u8, &config);
        painter.text(
            pos2(x + config.day_column_width / 2.0, outer.top() + HEADER_HEIGHT / 2.0),
            Align2::CENTER_CENTER,
            date.format("%a %-d %b").to_string(),
            FontId::proportional(13.0),
            text_color,
        );
        painter.line_segment(
            [pos2(x, screen_grid.top()), pos2(x, screen_grid.bottom())],
            line,
        );
    }
    painter.line_segment(
        [
            pos2(screen_grid.right(), screen_grid.top()),
            pos2(screen_grid.right(), screen_grid.bottom()),
        ],
        line,
    );

    for hour in config.grid_origin_hour..=config.last_visible_hour {
        let y = origin.y + minute_to_y(hour as u16 * 60, &config);
        painter.line_segment(
            [pos2(screen_grid.left(), y), pos2(screen_grid.right(), y)],
            line,
        );
        if hour < config.last_visible_hour {
            painter.text(
                pos2(screen_grid.left() - 6.0, y + 2.0),
                Align2::RIGHT_TOP,
                format!("{:02}:00", hour),
                FontId::proportional(11.0),
                Color32::GRAY,
            );
        }
    }

    let active = coordinator.active();
    let dragged_id = active
        .and_then(|s| s.original_task())
        .map(|task| task.id);
    let accent = visuals.selection.bg_fill;

    for task in store.tasks() {
        let block = to_screen(task_to_rect(task, &config));
        let fill = block_fill(task, accent, Some(task.id) == dragged_id);
        let selected = store.selected_task_id() == Some(task.id);
        paint_block(&painter, block, task, fill, selected, &visuals);
    }

    // Hover feedback only while idle.
    if coordinator.is_idle() && response.hovered() {
        if let Some(local) = input.pointer {
            if let Some((task, target)) = hit_test(store.tasks(), local, &config) {
                let block = to_screen(task_to_rect(task, &config));
                let on_handle = target == HitTarget::ResizeHandle;
                draw_handle(&painter, block, on_handle, accent);
                ctx.set_cursor_icon(if on_handle {
                    CursorIcon::ResizeVertical
                } else {
                    CursorIcon::Grab
                });
            }
        }
    }

    if let (Some(state), Some(preview)) = (active, coordinator.preview()) {
        let ghost = to_screen(task_to_rect(&preview, &config));
        let fill = accent.gamma_multiply(0.6);
        paint_block(&painter, ghost, &preview, fill, false, &visuals);
        painter.rect_stroke(ghost, 4.0, Stroke::new(2.0, visuals.selection.stroke.color));
        ctx.set_cursor_icon(match state.kind() {
            GestureKind::Resize => CursorIcon::ResizeVertical,
            GestureKind::Move => CursorIcon::Grabbing,
            GestureKind::ExternalDrop => CursorIcon::Copy,
        });
    }

    outcome
}

/// Block colour: muted grey once done, faded while being dragged.
pub fn block_fill(task: &ScheduledTask, accent: Color32, dragged: bool) -> Color32 {
    let base = if task.completed { COMPLETED_FILL } else { accent };
    if dragged {
        base.gamma_multiply(0.35)
    } else {
        base
    }
}

fn paint_block(
    painter: &egui::Painter,
    block: Rect,
    task: &ScheduledTask,
    fill: Color32,
    selected: bool,
    visuals: &egui::Visuals,
) {
    let inner = block.shrink2(vec2(2.0, 0.5));
    painter.rect_filled(inner, 4.0, fill);
    if selected {
        painter.rect_stroke(inner, 4.0, Stroke::new(2.0, visuals.strong_text_color()));
    }

    let text_color = if task.completed {
        COMPLETED_TEXT
    } else {
        visuals.selection.stroke.color
    };
    let label_painter = painter.with_clip_rect(inner.intersect(painter.clip_rect()));
    label_painter.text(
        inner.left_top() + vec2(4.0, 2.0),
        Align2::LEFT_TOP,
        &task.title,
        FontId::proportional(12.0),
        text_color,
    );
    if inner.height() >= 30.0 {
        label_painter.text(
            inner.left_top() + vec2(4.0, 16.0),
            Align2::LEFT_TOP,
            format!("{}-{}", task.start_time, task.end_time),
            FontId::proportional(11.0),
            text_color,
        );
    }
}

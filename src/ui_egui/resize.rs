// Task Resize Handles
//
// Task blocks carry a resize handle along their bottom edge. Pressing inside
// it starts a resize; pressing anywhere else on the block starts a move.

use egui::{Color32, Painter, Pos2, Rect, Stroke, Vec2};

use super::geometry::task_to_rect;
use crate::models::settings::GridConfig;
use crate::models::task::ScheduledTask;

/// Height of the resize handle hit area
pub const HANDLE_SIZE: f32 = 8.0;
/// Visual size of the handle bar
pub const HANDLE_VISUAL_SIZE: f32 = 4.0;

/// Which part of a task block the pointer pressed
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HitTarget {
    Body,
    ResizeHandle,
}

/// Bottom-edge hit zone of a task block.
///
/// Short blocks give the handle a quarter of their height so the body
/// stays grabbable.
pub fn handle_rect(block: Rect) -> Rect {
    let zone_height = if block.height() < HANDLE_SIZE * 4.0 {
        block.height() / 4.0
    } else {
        HANDLE_SIZE
    };
    Rect::from_min_size(
        Pos2::new(block.left(), block.bottom() - zone_height),
        Vec2::new(block.width(), zone_height),
    )
}

/// Find the topmost task under a grid-local point.
///
/// Later tasks are painted over earlier ones, so the search runs back to front.
pub fn hit_test<'a>(
    tasks: &'a [ScheduledTask],
    pos: Pos2,
    config: &GridConfig,
) -> Option<(&'a ScheduledTask, HitTarget)> {
    tasks.iter().rev().find_map(|task| {
        let block = task_to_rect(task, config);
        if !block.contains(pos) {
            return None;
        }
        if handle_rect(block).contains(pos) {
            Some((task, HitTarget::ResizeHandle))
        } else {
            Some((task, HitTarget::Body))
        }
    })
}

/// Draw the resize handle bar on a block.
pub fn draw_handle(painter: &Painter, block: Rect, hovered: bool, color: Color32) {
    let zone = handle_rect(block);
    let bar_width = (block.width() * 0.3).min(30.0);
    let bar = Rect::from_center_size(
        Pos2::new(zone.center().x, zone.bottom() - HANDLE_VISUAL_SIZE),
        Vec2::new(bar_width, HANDLE_VISUAL_SIZE),
    );
    let fill = if hovered {
        Color32::WHITE
    } else {
        Color32::from_rgba_unmultiplied(
            color.r().saturating_add(60),
            color.g().saturating_add(60),
            color.b().saturating_add(60),
            color.a(),
        )
    };
    painter.rect_filled(bar, 2.0, fill);
    painter.rect_stroke(bar, 2.0, Stroke::new(1.0, color.linear_multiply(0.6)));
}

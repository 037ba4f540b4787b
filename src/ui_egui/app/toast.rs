//! Brief, non-blocking notices shown in the bottom-right corner.
//!
//! Failed schedule saves surface here after the grid has reverted them.

use std::time::{Duration, Instant};

use egui::{Color32, Context, Pos2, RichText};

const FADE: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Success,
    Warning,
    Error,
}

impl ToastLevel {
    fn icon(self) -> &'static str {
        match self {
            ToastLevel::Success => "✓",
            ToastLevel::Warning => "⚠",
            ToastLevel::Error => "✗",
        }
    }

    fn colors(self, dark: bool) -> (Color32, Color32) {
        match (self, dark) {
            (ToastLevel::Success, true) => (Color32::from_rgb(30, 70, 40), Color32::from_rgb(100, 220, 120)),
            (ToastLevel::Warning, true) => (Color32::from_rgb(80, 60, 20), Color32::from_rgb(255, 200, 80)),
            (ToastLevel::Error, true) => (Color32::from_rgb(80, 30, 30), Color32::from_rgb(255, 120, 120)),
            (ToastLevel::Success, false) => (Color32::from_rgb(220, 255, 220), Color32::from_rgb(30, 120, 50)),
            (ToastLevel::Warning, false) => (Color32::from_rgb(255, 245, 200), Color32::from_rgb(150, 100, 0)),
            (ToastLevel::Error, false) => (Color32::from_rgb(255, 220, 220), Color32::from_rgb(180, 40, 40)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    pub level: ToastLevel,
    created_at: Instant,
    duration: Duration,
}

impl Toast {
    pub fn new(message: impl Into<String>, level: ToastLevel) -> Self {
        let duration = match level {
            ToastLevel::Error => Duration::from_secs(5),
            _ => Duration::from_secs(3),
        };
        Self {
            message: message.into(),
            level,
            created_at: Instant::now(),
            duration,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.created_at.elapsed() >= self.duration
    }

    /// 1.0 until the last half second, then fades linearly to 0.0.
    fn opacity(&self) -> f32 {
        let remaining = self.duration.saturating_sub(self.created_at.elapsed());
        (remaining.as_secs_f32() / FADE.as_secs_f32()).clamp(0.0, 1.0)
    }
}

#[derive(Debug, Default)]
pub struct ToastManager {
    toasts: Vec<Toast>,
}

impl ToastManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.toasts.push(Toast::new(message, ToastLevel::Success));
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.toasts.push(Toast::new(message, ToastLevel::Warning));
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.toasts.push(Toast::new(message, ToastLevel::Error));
    }

    pub fn len(&self) -> usize {
        self.toasts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }

    pub fn render(&mut self, ctx: &Context) {
        self.toasts.retain(|t| !t.is_expired());
        if self.toasts.is_empty() {
            return;
        }
        ctx.request_repaint();

        let dark = ctx.style().visuals.dark_mode;
        let screen = ctx.screen_rect();
        let width = 320.0;
        let height = 40.0;
        let margin = 10.0;

        for (i, toast) in self.toasts.iter().enumerate() {
            let opacity = toast.opacity();
            let pos = Pos2::new(
                screen.right() - width - margin,
                screen.bottom() - margin - (i as f32 + 1.0) * (height + 5.0),
            );
            let (bg, fg) = toast.level.colors(dark);
            let bg = bg.gamma_multiply(0.9 * opacity);
            let fg = fg.gamma_multiply(opacity);

            egui::Area::new(egui::Id::new(("toast", i)))
                .fixed_pos(pos)
                .order(egui::Order::Foreground)
                .show(ctx, |ui| {
                    egui::Frame::none()
                        .fill(bg)
                        .rounding(6.0)
                        .inner_margin(egui::Margin::symmetric(12.0, 8.0))
                        .stroke(egui::Stroke::new(1.0, fg.gamma_multiply(0.3)))
                        .show(ui, |ui| {
                            ui.set_min_width(width - 24.0);
                            ui.horizontal(|ui| {
                                ui.label(RichText::new(toast.level.icon()).color(fg).strong());
                                ui.label(RichText::new(&toast.message).color(fg));
                            });
                        });
                });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_toast_is_opaque() {
        let toast = Toast::new("Saved", ToastLevel::Success);
        assert!(!toast.is_expired());
        assert_eq!(toast.opacity(), 1.0);
    }

    #[test]
    fn test_errors_linger_longer() {
        let error = Toast::new("Failed", ToastLevel::Error);
        let warning = Toast::new("Careful", ToastLevel::Warning);
        assert!(error.duration > warning.duration);
    }

    #[test]
    fn test_manager_collects_toasts() {
        let mut manager = ToastManager::new();
        assert!(manager.is_empty());
        manager.error("Could not save");
        manager.success("Saved");
        assert_eq!(manager.len(), 2);
    }
}

use super::ScheduleApp;
use crate::utils::date::WeekWindow;
use chrono::Local;

impl ScheduleApp {
    pub(super) fn navigate_previous(&mut self) {
        self.show_week(self.coordinator.week().previous());
    }

    pub(super) fn navigate_next(&mut self) {
        self.show_week(self.coordinator.week().next());
    }

    pub(super) fn jump_to_today(&mut self) {
        let first_day = self.coordinator.config().first_day_of_week;
        self.show_week(WeekWindow::containing(Local::now().date_naive(), first_day));
    }

    fn show_week(&mut self, week: WeekWindow) {
        if week == self.coordinator.week() {
            return;
        }
        log::info!("Showing week {} to {}", week.start(), week.end());
        self.coordinator.set_week(week);
        self.reload();
    }

    pub(super) fn render_top_bar(&mut self, ctx: &egui::Context) {
        let typing = ctx.wants_keyboard_input();
        let (previous, next, today) = ctx.input(|i| {
            let plain = !typing && !i.modifiers.any();
            (
                plain && i.key_pressed(egui::Key::ArrowLeft),
                plain && i.key_pressed(egui::Key::ArrowRight),
                plain && i.key_pressed(egui::Key::T),
            )
        });

        egui::TopBottomPanel::top("week_nav").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let week = self.coordinator.week();
                if ui.button("◀").on_hover_text("Previous week").clicked() || previous {
                    self.navigate_previous();
                }
                if ui.button("Today").clicked() || today {
                    self.jump_to_today();
                }
                if ui.button("▶").on_hover_text("Next week").clicked() || next {
                    self.navigate_next();
                }
                ui.separator();
                ui.heading(format!(
                    "{} - {}",
                    week.start().format("%-d %b"),
                    week.end().format("%-d %b %Y")
                ));
            });
        });
    }
}

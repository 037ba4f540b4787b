//! Todo list panel. Unscheduled todos are drag sources for the grid.

use super::ScheduleApp;
use crate::services::schedule::ScheduleService;
use egui::RichText;

const SIDEBAR_MIN_WIDTH: f32 = 180.0;
const SIDEBAR_DEFAULT_WIDTH: f32 = 220.0;

impl ScheduleApp {
    pub(super) fn render_sidebar(&mut self, ctx: &egui::Context) {
        egui::SidePanel::left("todos")
            .default_width(SIDEBAR_DEFAULT_WIDTH)
            .min_width(SIDEBAR_MIN_WIDTH)
            .resizable(true)
            .show(ctx, |ui| {
                self.render_new_todo(ui);
                ui.separator();
                self.render_unscheduled(ui);
                ui.separator();
                self.render_selection(ui);
            });
    }

    fn render_new_todo(&mut self, ui: &mut egui::Ui) {
        ui.heading("Todos");
        let submitted = ui
            .text_edit_singleline(&mut self.new_todo_title)
            .lost_focus()
            && ui.input(|i| i.key_pressed(egui::Key::Enter));
        ui.horizontal(|ui| {
            ui.add(
                egui::DragValue::new(&mut self.new_todo_duration)
                    .clamp_range(5..=480)
                    .speed(5)
                    .suffix(" min"),
            );
            if ui.button("Add").clicked() || submitted {
                self.add_todo();
            }
        });
    }

    fn add_todo(&mut self) {
        let title = self.new_todo_title.trim().to_string();
        if title.is_empty() {
            return;
        }
        let service = ScheduleService::new(self.database.connection());
        match service.create_todo(&title, Some(self.new_todo_duration)) {
            Ok(todo) => {
                log::info!("Created todo {} '{}'", todo.id, todo.title);
                self.unscheduled.push(todo);
                self.new_todo_title.clear();
            }
            Err(e) => {
                log::error!("Failed to create todo: {:#}", e);
                self.toasts.error("Could not create todo");
            }
        }
    }

    fn render_unscheduled(&mut self, ui: &mut egui::Ui) {
        if self.unscheduled.is_empty() {
            ui.label(RichText::new("Nothing left to schedule").weak());
            return;
        }
        ui.label(RichText::new("Drag onto the grid").small().weak());

        for todo in &self.unscheduled {
            let payload = match todo.to_drag_data() {
                Ok(payload) => payload,
                Err(e) => {
                    log::warn!("Cannot drag todo {}: {}", todo.id, e);
                    continue;
                }
            };
            let minutes = todo
                .duration
                .unwrap_or(self.coordinator.config().default_drop_duration_minutes);
            ui.dnd_drag_source(egui::Id::new(("todo", todo.id)), payload, |ui| {
                egui::Frame::group(ui.style()).show(ui, |ui| {
                    ui.set_min_width(ui.available_width());
                    ui.label(&todo.title);
                    ui.label(RichText::new(format!("{} min", minutes)).small().weak());
                });
            });
        }
    }

    fn render_selection(&mut self, ui: &mut egui::Ui) {
        let Some(task) = self.store.selected_task().cloned() else {
            ui.label(RichText::new("Click a task to select it").weak());
            return;
        };

        ui.label(RichText::new(&task.title).strong());
        ui.label(format!(
            "{} {}-{}",
            task.date.format("%a %-d %b"),
            task.start_time,
            task.end_time
        ));
        ui.horizontal(|ui| {
            let toggle_label = if task.completed { "Mark not done" } else { "Mark done" };
            if ui.button(toggle_label).clicked() {
                let result = ScheduleService::new(self.database.connection())
                    .set_completed(task.id, !task.completed);
                match result {
                    Ok(()) => self.reload(),
                    Err(e) => {
                        log::error!("Failed to update completion of task {}: {:#}", task.id, e);
                        self.toasts.error("Could not update task");
                    }
                }
            }
            if ui.button("Unschedule").clicked() {
                let result = ScheduleService::new(self.database.connection()).unschedule(task.id);
                match result {
                    Ok(()) => {
                        self.store.select(None);
                        self.reload();
                    }
                    Err(e) => {
                        log::error!("Failed to unschedule task {}: {:#}", task.id, e);
                        self.toasts.error("Could not unschedule task");
                    }
                }
            }
            if ui.button("Deselect").clicked() {
                self.store.select(None);
            }
        });
    }
}

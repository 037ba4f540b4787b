mod navigation;
mod sidebar;
mod toast;

use anyhow::{Context, Result};
use chrono::Local;
use tokio::runtime::Runtime;

use self::toast::ToastManager;
use crate::models::schedule::ScheduleCommit;
use crate::models::settings::GridConfig;
use crate::models::task::UnscheduledTask;
use crate::services::database::Database;
use crate::services::schedule::{CommitResult, ScheduleService, ScheduleStore};
use crate::ui_egui::drag::{DragCoordinator, GestureOutcome};
use crate::ui_egui::time_grid::render_week_grid;
use crate::utils::date::WeekWindow;

pub struct ScheduleApp {
    database: Database,
    store: ScheduleStore,
    coordinator: DragCoordinator,
    /// Todos waiting in the sidebar
    unscheduled: Vec<UnscheduledTask>,
    new_todo_title: String,
    new_todo_duration: u16,
    /// Drives the async persistence calls from the UI thread
    runtime: Runtime,
    toasts: ToastManager,
}

impl eframe::App for ScheduleApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.render_top_bar(ctx);
        self.render_sidebar(ctx);

        let outcome = egui::CentralPanel::default()
            .show(ctx, |ui| {
                egui::ScrollArea::both()
                    .drag_to_scroll(false)
                    .auto_shrink([false, false])
                    .show(ui, |ui| render_week_grid(ui, &self.store, &mut self.coordinator))
                    .inner
            })
            .inner;

        if let Some(outcome) = outcome {
            self.handle_outcome(outcome);
        }

        for failure in self.store.take_failures() {
            self.toasts.error(failure.message());
        }
        self.toasts.render(ctx);
    }
}

impl ScheduleApp {
    pub fn new(config: GridConfig, database: Database) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .context("Failed to start async runtime")?;
        let week = WeekWindow::containing(Local::now().date_naive(), config.first_day_of_week);
        let new_todo_duration = config.default_drop_duration_minutes;
        let minimum_duration = config.minimum_duration_minutes;

        let mut app = Self {
            database,
            store: ScheduleStore::new().with_minimum_duration(minimum_duration),
            coordinator: DragCoordinator::new(config, week),
            unscheduled: Vec::new(),
            new_todo_title: String::new(),
            new_todo_duration,
            runtime,
            toasts: ToastManager::new(),
        };
        app.reload();
        Ok(app)
    }

    /// Re-read the visible week and the todo list from the database.
    fn reload(&mut self) {
        let service = ScheduleService::new(self.database.connection());
        let week = self.coordinator.week();

        match self.runtime.block_on(self.store.refresh(&service, week)) {
            Ok(count) => log::debug!("Loaded {} task(s) for week of {}", count, week.start()),
            Err(e) => {
                log::error!("Failed to load week of {}: {:#}", week.start(), e);
                self.toasts.error("Could not load this week's tasks");
            }
        }

        match service.list_unscheduled() {
            Ok(todos) => self.unscheduled = todos,
            Err(e) => {
                log::error!("Failed to load todos: {:#}", e);
                self.toasts.error("Could not load todos");
            }
        }
    }

    fn handle_outcome(&mut self, outcome: GestureOutcome) {
        match outcome {
            GestureOutcome::Selected(id) => self.store.select(Some(id)),
            GestureOutcome::Commit(commit) => self.commit(commit),
        }
    }

    fn commit(&mut self, commit: ScheduleCommit) {
        let service = ScheduleService::new(self.database.connection())
            .with_minimum_duration(self.store.minimum_duration());
        let scheduled_new = matches!(commit, ScheduleCommit::ScheduleNew { .. });

        match self.runtime.block_on(self.store.commit(commit, &service)) {
            CommitResult::Confirmed(task) => {
                if scheduled_new {
                    self.unscheduled.retain(|todo| todo.id != task.id);
                    self.toasts
                        .success(format!("Scheduled '{}' at {}", task.title, task.start_time));
                }
                self.store.select(Some(task.id));
            }
            // The failure notice is picked up with the rest of the queue.
            CommitResult::Reverted(_) => {}
            CommitResult::Dropped => {}
        }
    }
}

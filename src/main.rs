// Week Scheduler Application
// Main entry point

use anyhow::{anyhow, Context, Result};
use week_scheduler::services::database::Database;
use week_scheduler::services::settings::{default_database_path, ConfigService};
use week_scheduler::ui_egui::ScheduleApp;

fn main() -> Result<()> {
    env_logger::init();

    log::info!("Starting Week Scheduler");

    let config = ConfigService::from_project_dirs().load()?;

    let db_path = default_database_path();
    if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let database = Database::new(&db_path.to_string_lossy())?;
    database.initialize_schema()?;

    let app = ScheduleApp::new(config, database)?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([800.0, 600.0])
            .with_title("Week Scheduler"),
        ..Default::default()
    };

    eframe::run_native(
        "Week Scheduler",
        options,
        Box::new(move |_cc| Ok(Box::new(app))),
    )
    .map_err(|e| anyhow!("Window error: {}", e))
}

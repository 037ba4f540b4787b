mod app;
pub mod drag;
pub mod geometry;
pub mod resize;
pub mod time_grid;

pub use app::ScheduleApp;

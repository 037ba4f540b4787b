// Service module exports

pub mod database;
pub mod schedule;
pub mod settings;

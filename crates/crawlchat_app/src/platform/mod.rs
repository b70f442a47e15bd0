mod app;
pub(crate) mod config;
mod effects;
mod persistence;
mod ui;

pub use app::run_app;

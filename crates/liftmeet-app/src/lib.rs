//! Application service layer - use cases, config

pub mod app;
pub mod config;
pub mod repository;

pub use app::{ImportSummary, MeetService, ResultsReport};
pub use config::Config;

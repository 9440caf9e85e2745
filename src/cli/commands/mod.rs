pub mod analyze;
pub mod clone;
pub mod config;

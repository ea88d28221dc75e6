//! Shared utilities for the smarthome crew
//!
//! This crate provides common functionality used across the workspace:
//! tracing setup and the project path configuration.

pub mod config;
pub mod logging;

pub use config::ProjectConfig;
pub use logging::init_tracing;

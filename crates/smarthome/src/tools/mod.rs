//! Tools available to the smarthome agents

pub mod highest_value;
pub mod serper;

pub use highest_value::HighestValuePositionTool;
pub use serper::{SerperConfig, SerperDevTool};

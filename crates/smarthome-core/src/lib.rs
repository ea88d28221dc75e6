//! Core abstractions for the smarthome crew
//!
//! This crate defines the fundamental traits and types the other crates
//! build on: the [`Agent`] trait, the execution [`Context`], the error type
//! and `{placeholder}` interpolation of crew inputs.

pub mod agent;
pub mod context;
pub mod error;
pub mod template;

pub use agent::Agent;
pub use context::{Context, Inputs};
pub use error::{Error, Result};
pub use template::interpolate;

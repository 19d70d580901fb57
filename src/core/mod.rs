//! Core module - shared infrastructure for Switchboard
//!
//! This module contains foundational types, configuration, and error handling
//! used throughout the engine.

pub mod config;
pub mod error;
pub mod types;

pub use config::Config;
pub use error::{EngineError, Result};
pub use types::*;

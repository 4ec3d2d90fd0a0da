//! Configuration module for FinanZen
//!
//! This module provides configuration management including:
//! - Data directory resolution
//! - User settings persistence

pub mod paths;
pub mod settings;

pub use paths::FinanzenPaths;
pub use settings::Settings;

//! Configuration module for envelope-rollover
//!
//! - Base/data directory resolution
//! - User settings persistence

pub mod paths;
pub mod settings;

pub use paths::RolloverPaths;
pub use settings::Settings;

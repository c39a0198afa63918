//! envelope-rollover - budget period lifecycle engine
//!
//! Tracks expenses within recurring monthly budget periods and, when a new
//! period begins, lets the user archive the previous period or continue
//! with the current data.
//!
//! # Architecture
//!
//! - `services::period`: period boundaries and identifiers for an instant
//! - `services::detector`: compares "now" with the last-acknowledged marker
//! - `services::archive`: archive and acknowledge transitions
//! - `storage`: the `PersistenceGateway` contract with memory and JSON stores
//! - `prompt`: runs the check on load and executes the user's choice
//! - `audit`, `export`, `display`, `cli`: supporting surfaces
//!
//! # Example
//!
//! ```rust,ignore
//! use envelope_rollover::clock::SystemClock;
//! use envelope_rollover::prompt::{PromptController, RolloverChoice};
//! use envelope_rollover::storage::MemoryStore;
//!
//! let store = MemoryStore::new();
//! let controller = PromptController::new(&store, &SystemClock, 1);
//! controller.execute(&uid, RolloverChoice::Archive).await?;
//! ```

pub mod audit;
pub mod cli;
pub mod clock;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod logging;
pub mod models;
pub mod prompt;
pub mod services;
pub mod storage;

pub use error::{RolloverError, RolloverResult};

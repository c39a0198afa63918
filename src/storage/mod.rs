//! Storage layer for envelope-rollover
//!
//! Defines the `PersistenceGateway` contract the engine consumes and two
//! implementations: an in-memory store and a JSON file store with atomic
//! writes.

pub mod file_io;
pub mod gateway;
pub mod json;
pub mod memory;

pub use gateway::PersistenceGateway;
pub use json::JsonStore;
pub use memory::{MemoryStore, StoreOp};

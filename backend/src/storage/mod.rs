//! # Storage Module
//!
//! Persistence boundary for the planner. The domain layer never touches
//! files directly; it hands the full state to a [`StateRepository`] after
//! every change.
//!
//! - **traits**: the [`KeyValueStorage`] abstraction
//! - **json_file**: one JSON file per key under a data directory
//! - **memory**: in-process map, used by tests and throwaway runs
//! - **state_repository**: (de)serialization of the state blob

pub mod json_file;
pub mod memory;
pub mod state_repository;
pub mod traits;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;
pub use state_repository::StateRepository;
pub use traits::KeyValueStorage;

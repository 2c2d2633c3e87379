//! # vigil-store
//!
//! `KeyValueStore` backends for the VIGIL runtime.
//!
//! - `MemoryStore`: shared in-memory map, for tests and single-process runs
//! - `FileStore`: one JSON file per key, survives process restarts
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use vigil_store::FileStore;
//!
//! let store = Arc::new(FileStore::open("./assessment-data")?);
//! ```

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

//! # Storage Layer
//!
//! todoz persists through a plain key-value byte store. The [`KeyValueStore`]
//! trait is the only thing the rest of the library knows about storage; what
//! the bytes mean is decided in [`crate::persistence`].
//!
//! ## Implementations
//!
//! - [`fs::FileStore`]: one file per key in a data directory
//!   - `todo-storage.json`, `todo-settings.json`, `todo-backup.json`
//!   - writes go to a temp file first and are renamed into place
//!
//! - [`memory::InMemoryStore`]: in-memory storage for testing
//!   - no persistence
//!   - can be told to fail writes, to exercise the degraded paths
//!
//! ## Failure Policy
//!
//! Implementations report failures as errors. It is the caller's job to
//! decide they are not fatal: the API logs a warning and keeps working on
//! its in-memory state.

use crate::error::Result;

pub mod fs;
pub mod memory;

/// Abstract interface for raw storage I/O.
///
/// All methods take `&self`; backends that need mutation use interior
/// mutability (todoz is single-threaded).
pub trait KeyValueStore {
    /// Read the bytes stored under `key`, `None` if nothing is stored.
    fn load(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Store `bytes` under `key`, replacing any previous value.
    fn save(&self, key: &str, bytes: &[u8]) -> Result<()>;

    /// Remove `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<()>;

    /// All keys currently stored.
    fn keys(&self) -> Result<Vec<String>>;
}

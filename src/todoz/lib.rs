//! # Todoz Architecture
//!
//! Todoz is a **UI-agnostic to-do list library**. The `todoz` binary is one
//! client of it; nothing below the CLI knows about terminals.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses arguments, formats output, runs the shell         │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Owns the session: tasks, history, filter, settings       │
//! │  - Resolves indexes to UUIDs                                │
//! │  - Records a snapshot and saves after every mutation        │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - Business logic over the repository and friends           │
//! │  - Returns CmdResult, never prints                          │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Core (repository, filter, sort, stats, history)            │
//! │  Storage (store/, persistence.rs, settings.rs)              │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Data Flow of a Mutation
//!
//! validate -> repository mutation -> history snapshot -> save (best effort).
//! A failed save is logged and reported; the session carries on in memory.
//!
//! ## Indexes
//!
//! The CLI addresses tasks by 1-based position in the canonical listing.
//! See [`index`].
//!
//! ## Testing Strategy
//!
//! 1. **Core and commands**: unit tests next to the code, using
//!    [`store::memory::InMemoryStore`].
//! 2. **API** (`api.rs`): dispatch, history and persistence wiring.
//! 3. **Binary** (`tests/`): end-to-end runs against a temporary data dir.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade and session owner
//! - [`commands`]: Business logic for each command
//! - [`model`]: `Task`, `Priority`, drafts and patches
//! - [`validate`]: Input bounds checks
//! - [`repository`]: The ordered task list and the selection set
//! - [`filter`]: Filter criteria and evaluation
//! - [`sort`]: Display ordering
//! - [`stats`]: Counts and completion rate
//! - [`history`]: Bounded undo/redo log
//! - [`store`]: Key-value storage trait and implementations
//! - [`persistence`]: Stored payload shapes, backup and import
//! - [`settings`]: User preferences
//! - [`index`]: Display indexes and selectors
//! - [`editor`]: External editor integration
//! - [`error`]: Error types
//! - `cli`: Argument parsing, printing and the interactive shell (binary only)

pub mod api;
pub mod commands;
pub mod editor;
pub mod error;
pub mod filter;
pub mod history;
pub mod index;
pub mod model;
pub mod persistence;
pub mod repository;
pub mod settings;
pub mod sort;
pub mod stats;
pub mod store;
pub mod validate;

//! # Repository Pattern Implementations
//!
//! Each repository wraps a `SqlitePool` clone and owns the SQL for one
//! table. Callers go through [`crate::Database`] accessors rather than
//! constructing repositories directly.
//!
//! ## Repositories
//!
//! - [`vault`] - The single-row credential vault
//! - [`queue`] - The pending action outbox
//! - [`settings`] - Key/value runtime settings

pub mod queue;
pub mod settings;
pub mod vault;

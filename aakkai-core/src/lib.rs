//! Core library for the Aakkai portal.
//!
//! This crate provides the record types and the SQLite-backed store for the
//! portal, independent of any transport layer (HTTP, CLI) and of the identity
//! provider.
//!
//! # Usage
//!
//! ```no_run
//! use aakkai_core::db::Database;
//!
//! let db = Database::open_default()?;
//! db.migrate()?;
//!
//! let team = db.list_profiles()?;
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod db;
pub mod models;

// Re-export commonly used types at crate root
pub use db::{Database, StoreError, StoreResult};

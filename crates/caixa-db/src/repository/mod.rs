//! # Repository Module
//!
//! ```text
//! pos-api command
//!      │  db.snapshots().save(key, &state)
//!      ▼
//! SnapshotRepository ── load / save / delete / keys
//!      │
//!      ▼
//! kv_store (SQLite)
//! ```
//!
//! ## Available Repositories
//!
//! - [`SnapshotRepository`](snapshot::SnapshotRepository) - Keyed JSON documents

pub mod snapshot;

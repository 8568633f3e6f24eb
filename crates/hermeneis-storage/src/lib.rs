// SPDX-FileCopyrightText: 2026 Hermeneis Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite message store for Hermeneis.
//!
//! Provides WAL-mode SQLite storage with an idempotent schema, a single-writer
//! concurrency model via `tokio-rusqlite`, and typed operations for channels,
//! messages, translation parameter identities and cached translations.

pub mod adapter;
pub mod database;
pub mod models;
pub mod queries;

pub use adapter::SqliteStorage;
pub use database::{Database, BUILTIN_SCHEMA};
pub use models::*;

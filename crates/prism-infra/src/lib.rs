//! Infrastructure layer for PRISM.
//!
//! Contains the SQLite implementations of the repository traits defined in
//! `prism-core` and the `config.toml` loader.

pub mod config;
pub mod sqlite;

//! Shared domain types for PRISM.
//!
//! The five record categories (memories, identity traits, emotional
//! context, goals, thoughts), the tool-call request/response envelopes,
//! configuration, and the error enums shared by every other crate.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror.

pub mod config;
pub mod emotion;
pub mod error;
pub mod goal;
pub mod identity;
pub mod memory;
pub mod thought;
pub mod tool;
pub mod user;

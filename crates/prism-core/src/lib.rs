//! Business logic and repository trait definitions for PRISM.
//!
//! This crate defines the "ports" (repository traits) that the infrastructure
//! layer implements, plus the tool dispatcher that routes inbound tool calls
//! to them. It depends only on `prism-types` -- never on `prism-infra` or
//! any database/IO crate.

pub mod repository;
pub mod service;
pub mod tool;

#[cfg(test)]
pub(crate) mod testing;

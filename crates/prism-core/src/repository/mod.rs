//! Repository trait definitions (ports).
//!
//! These traits define the storage interface that the infrastructure layer
//! (prism-infra) implements. Every write stamps its own server-side
//! timestamp; callers never supply one.

pub mod emotion;
pub mod goal;
pub mod identity;
pub mod memory;
pub mod thought;

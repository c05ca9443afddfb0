//! Services composing several repositories.

pub mod identity;

//! Tool-call handling: parameter parsing, caller resolution and dispatch.

pub mod action;
pub mod caller;
pub mod dispatcher;
pub mod params;

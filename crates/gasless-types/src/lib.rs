//! Shared types for the gasless vault operation system.
//!
//! This crate defines the data model every other crate builds on: deposit and
//! withdraw intents, signed authorizations, terminal operation results, and
//! the error taxonomy surfaced to callers.

pub mod errors;
pub mod intents;
pub mod result;

pub use errors::*;
pub use intents::*;
pub use result::*;

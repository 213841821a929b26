//! Orchestration of gasless vault operations.
//!
//! Composes the nonce source, authorization builder, and relay client into a
//! single user-facing action per operation, owning the error policy and the
//! per-user single-flight guarantee.

pub mod error;
pub mod orchestrator;

pub use error::BuildError;
pub use orchestrator::{
	GaslessOrchestrator, OperationCallbacks, OperationPhase, OrchestratorBuilder,
};

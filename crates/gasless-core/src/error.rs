use thiserror::Error;

/// Errors raised while assembling an orchestrator.
#[derive(Debug, Error)]
pub enum BuildError {
	#[error("Missing component: {0}")]
	MissingComponent(&'static str),
}

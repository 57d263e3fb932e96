//! Error definitions for the navigation engine.
//!
//! Per-frame failures (missing affordances, nothing selected, conflicting
//! pad input) are deliberately not errors: they resolve to logged no-ops and
//! the frame loop never halts. These variants only cover initialization and
//! task-boundary failures.

use thiserror::Error;

use crate::input::SamplerError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Initialization error: {0}")]
    InitializationError(String),

    #[error("Sampler error: {0}")]
    SamplerError(#[from] SamplerError),

    #[error("Channel error: {0}")]
    ChannelError(String),

    #[error("Task error: {0}")]
    TaskError(String),
}

//! Pipeline-specific error types.

use crate::id::StageId;
use thiserror::Error;

/// Errors that can occur while building or running a pipeline.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// `add` was called on a frozen pipeline.
    #[error("Pipeline is frozen, call unfreeze() before adding new stages")]
    FrozenPipeline,

    /// `collect` was called on a pipeline that already ran and was not resumed.
    #[error("Pipeline has already been consumed, call resume() before running it again")]
    AlreadyConsumed,

    /// A stage-detached event was raised by something other than an
    /// intermediate stage. This is an internal-consistency failure.
    #[error("Only intermediate stages may detach, event was raised by {0}")]
    InvalidDetachSource(StageId),

    /// An element reaching a stage did not have the type the stage was
    /// constructed for.
    #[error("Element type mismatch: expected {expected}")]
    ElementType { expected: &'static str },

    /// A collector that requires at least one element received none.
    #[error("Collector {collector} received no elements")]
    EmptyPipeline { collector: &'static str },
}

pub type PipelineResult<T> = std::result::Result<T, PipelineError>;

//! A reusable, lazily-evaluated, push-based data pipeline.
//!
//! A [`LazyPipeline`] is built once from a source and a chain of
//! intermediate stages, then driven by a terminal stage. Nothing runs until
//! [`LazyPipeline::collect`] (or [`LazyPipeline::to_vec`]) is called; the
//! source elements are then pushed through the chain one by one. Stages can
//! short-circuit a run by broadcasting [`PipelineEvent::TerminatePipeline`]
//! or excise themselves with [`PipelineEvent::StageDetached`], and a
//! finished pipeline can be rewound with [`LazyPipeline::resume`] and
//! re-pointed at fresh data with [`LazyPipeline::read_from`].
//!
//! ```
//! use lazypipe::operators::{filter, map};
//! use lazypipe::{LazyPipeline, PipelineResult};
//!
//! fn main() -> PipelineResult<()> {
//!     let mut pipeline = LazyPipeline::from([1, 2, 3, 4, 5]);
//!     pipeline
//!         .add(filter(|n: &i32| n % 2 == 1))?
//!         .add(map(|n: i32| n * 10))?;
//!
//!     assert_eq!(pipeline.to_vec()?, vec![10, 30, 50]);
//!
//!     // Rewind and run the same stages over a different source.
//!     pipeline.resume();
//!     pipeline.read_from([7, 8]);
//!     assert_eq!(pipeline.to_vec()?, vec![70]);
//!     Ok(())
//! }
//! ```

pub mod collectors;
pub mod element;
pub mod error;
pub mod event;
pub mod id;
pub mod operators;
pub mod pipeline;
pub mod stage;

pub use element::Element;
pub use error::{PipelineError, PipelineResult};
pub use event::{EventChannel, EventListener, PipelineEvent};
pub use id::StageId;
pub use pipeline::LazyPipeline;
pub use stage::{IntermediateHandle, Stage, StageContext, TerminalHandle, TerminalStage};

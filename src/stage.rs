//! Stage abstractions for the pipeline.
//!
//! Two-layer design:
//! - **`Stage` / `TerminalStage` traits**: the contracts every unit of
//!   computation implements, including user-defined stages.
//! - **`IntermediateHandle` / `TerminalHandle`**: typed wrappers produced by
//!   the operator constructors. Runtime storage is uniformly type-erased;
//!   the handles track the input/output types only at the call site so stage
//!   compositions read as typed code.
//!
//! Stages communicate exclusively through the [`StageContext`] passed to
//! `consume`: forwarded elements, broadcast events, detachment, and cascades
//! are all recorded there and applied by the pipeline once the call returns.

use crate::element::{boxed, Element};
use crate::error::PipelineResult;
use crate::event::PipelineEvent;
use std::marker::PhantomData;

/// Per-call scratch state a stage writes its effects into.
#[derive(Default)]
pub struct StageContext {
    pub(crate) outputs: Vec<(Element, bool)>,
    pub(crate) events: Vec<PipelineEvent>,
    pub(crate) cascades: Vec<PipelineEvent>,
    pub(crate) detach_requested: bool,
}

impl StageContext {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Push an element to the downstream stage, tagged with whether more
    /// elements will follow it in the current run.
    pub fn forward(&mut self, element: Element, has_more_upstream: bool) {
        self.outputs.push((element, has_more_upstream));
    }

    /// Convenience for [`forward`](Self::forward) that boxes the value.
    pub fn forward_value<T: 'static>(&mut self, value: T, has_more_upstream: bool) {
        self.forward(boxed(value), has_more_upstream);
    }

    /// Broadcast an event on this stage's channel once `consume` returns.
    pub fn broadcast(&mut self, event: PipelineEvent) {
        self.events.push(event);
    }

    /// Forward an event along the live downstream chain, giving each
    /// remaining intermediate stage a chance to react via
    /// [`Stage::on_cascade`].
    pub fn cascade(&mut self, event: PipelineEvent) {
        self.cascades.push(event);
    }

    /// Flip this stage's detachment flag. Stages that detach should follow
    /// up with `broadcast(PipelineEvent::StageDetached)` so the pipeline
    /// splices them out of the live chain.
    pub fn detach(&mut self) {
        self.detach_requested = true;
    }
}

/// A unit of computation in the pipeline.
///
/// `consume` receives one element at a time plus a flag indicating whether
/// more elements will follow from upstream in the current run. The flag is
/// the only end-of-stream signal a stage gets; buffering stages (sort,
/// grouping) flush when it is `false`.
pub trait Stage {
    /// Process one element. Results are communicated through `ctx`, never
    /// returned: push to the downstream via `ctx.forward`, or accumulate
    /// internal state retrieved later through [`TerminalStage::finish`].
    fn consume(
        &mut self,
        element: Element,
        has_more_upstream: bool,
        ctx: &mut StageContext,
    ) -> PipelineResult<()>;

    /// Restore this stage to a fresh, reusable state for the next run.
    fn resume(&mut self) {}

    /// React to an event cascaded from an upstream stage. The default
    /// implementation ignores it.
    fn on_cascade(
        &mut self,
        _event: PipelineEvent,
        _ctx: &mut StageContext,
    ) -> PipelineResult<()> {
        Ok(())
    }
}

/// The sink stage producing the pipeline's final result.
pub trait TerminalStage: Stage {
    /// Move the accumulated result out. Called exactly once per run, after
    /// all consumption completes or the run terminates early.
    fn finish(&mut self) -> PipelineResult<Element>;
}

/// A boxed intermediate stage, typed by its input and output element types.
///
/// The type parameters have no runtime effect; they exist so operator
/// compositions are checked where they are written. A mismatch that slips
/// through (e.g. a hand-built handle) surfaces as an
/// [`ElementType`](crate::PipelineError::ElementType) error when the
/// pipeline runs.
pub struct IntermediateHandle<I, O> {
    pub(crate) stage: Box<dyn Stage>,
    _types: PhantomData<fn(I) -> O>,
}

impl<I, O> IntermediateHandle<I, O> {
    /// Wrap a custom stage implementation.
    pub fn new(stage: impl Stage + 'static) -> Self {
        Self {
            stage: Box::new(stage),
            _types: PhantomData,
        }
    }
}

/// A boxed terminal stage, typed by its input element type and result type.
pub struct TerminalHandle<I, R> {
    pub(crate) stage: Box<dyn TerminalStage>,
    _types: PhantomData<fn(I) -> R>,
}

impl<I, R> TerminalHandle<I, R> {
    /// Wrap a custom terminal stage implementation.
    pub fn new(stage: impl TerminalStage + 'static) -> Self {
        Self {
            stage: Box::new(stage),
            _types: PhantomData,
        }
    }
}

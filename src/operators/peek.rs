use crate::element::{downcast, Element};
use crate::error::PipelineResult;
use crate::stage::{IntermediateHandle, Stage, StageContext};
use std::marker::PhantomData;

struct PeekStage<F, A> {
    inspect: F,
    _input: PhantomData<fn(A)>,
}

impl<A, F> Stage for PeekStage<F, A>
where
    A: 'static,
    F: FnMut(&A) + 'static,
{
    fn consume(
        &mut self,
        element: Element,
        has_more_upstream: bool,
        ctx: &mut StageContext,
    ) -> PipelineResult<()> {
        let value = downcast::<A>(element)?;
        (self.inspect)(&value);
        ctx.forward_value(value, has_more_upstream);
        Ok(())
    }
}

/// Observe each element without altering the stream. Useful for debugging
/// and for counting how often a point in the chain is reached.
pub fn peek<A, F>(inspect: F) -> IntermediateHandle<A, A>
where
    A: 'static,
    F: FnMut(&A) + 'static,
{
    IntermediateHandle::new(PeekStage {
        inspect,
        _input: PhantomData,
    })
}

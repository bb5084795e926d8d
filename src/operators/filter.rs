use crate::element::{downcast, Element};
use crate::error::PipelineResult;
use crate::stage::{IntermediateHandle, Stage, StageContext};
use std::marker::PhantomData;

struct FilterStage<F, A> {
    predicate: F,
    _input: PhantomData<fn(A)>,
}

impl<A, F> Stage for FilterStage<F, A>
where
    A: 'static,
    F: FnMut(&A) -> bool + 'static,
{
    fn consume(
        &mut self,
        element: Element,
        has_more_upstream: bool,
        ctx: &mut StageContext,
    ) -> PipelineResult<()> {
        let value = downcast::<A>(element)?;
        if (self.predicate)(&value) {
            ctx.forward_value(value, has_more_upstream);
        }
        Ok(())
    }
}

/// Keep only elements for which `predicate` returns true. The end-of-stream
/// flag passes through unchanged; a rejected final element means downstream
/// stages never observe it.
pub fn filter<A, F>(predicate: F) -> IntermediateHandle<A, A>
where
    A: 'static,
    F: FnMut(&A) -> bool + 'static,
{
    IntermediateHandle::new(FilterStage {
        predicate,
        _input: PhantomData,
    })
}

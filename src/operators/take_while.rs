use crate::element::{downcast, Element};
use crate::error::PipelineResult;
use crate::event::PipelineEvent;
use crate::stage::{IntermediateHandle, Stage, StageContext};
use std::marker::PhantomData;

struct TakeWhileStage<F, A> {
    predicate: F,
    done: bool,
    _input: PhantomData<fn(A)>,
}

impl<A, F> Stage for TakeWhileStage<F, A>
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
        if self.done {
            return Ok(());
        }
        let value = downcast::<A>(element)?;
        if (self.predicate)(&value) {
            ctx.forward_value(value, has_more_upstream);
        } else {
            self.done = true;
            ctx.broadcast(PipelineEvent::TerminatePipeline);
        }
        Ok(())
    }

    fn resume(&mut self) {
        self.done = false;
    }
}

/// Forward elements until `predicate` first fails, then terminate the run.
pub fn take_while<A, F>(predicate: F) -> IntermediateHandle<A, A>
where
    A: 'static,
    F: FnMut(&A) -> bool + 'static,
{
    IntermediateHandle::new(TakeWhileStage {
        predicate,
        done: false,
        _input: PhantomData,
    })
}

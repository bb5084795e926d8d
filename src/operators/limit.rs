use crate::element::{downcast, Element};
use crate::error::PipelineResult;
use crate::event::PipelineEvent;
use crate::stage::{IntermediateHandle, Stage, StageContext};
use std::marker::PhantomData;

/// Forwards at most `limit` elements. Reaching the cap terminates the run
/// and cascades the terminate downstream so buffering stages flush before
/// the terminal finishes. Upstream stages may still push a buffered batch
/// after the cap; the surplus is swallowed here.
struct LimitStage<A> {
    limit: usize,
    seen: usize,
    _input: PhantomData<fn(A)>,
}

impl<A: 'static> Stage for LimitStage<A> {
    fn consume(
        &mut self,
        element: Element,
        has_more_upstream: bool,
        ctx: &mut StageContext,
    ) -> PipelineResult<()> {
        if self.seen < self.limit {
            self.seen += 1;
            let value = downcast::<A>(element)?;
            ctx.forward_value(value, has_more_upstream && self.seen < self.limit);
        }
        if self.seen >= self.limit {
            ctx.broadcast(PipelineEvent::TerminatePipeline);
            ctx.cascade(PipelineEvent::TerminatePipeline);
        }
        Ok(())
    }

    fn resume(&mut self) {
        self.seen = 0;
    }
}

/// Pass through at most `limit` elements, then terminate the run early.
pub fn limit<A: 'static>(limit: usize) -> IntermediateHandle<A, A> {
    IntermediateHandle::new(LimitStage::<A> {
        limit,
        seen: 0,
        _input: PhantomData,
    })
}

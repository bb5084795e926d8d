use crate::element::{downcast, Element};
use crate::error::PipelineResult;
use crate::event::PipelineEvent;
use crate::stage::{IntermediateHandle, Stage, StageContext};
use std::marker::PhantomData;

/// Drops elements while `predicate` holds. The first failing element is
/// forwarded, then the stage detaches: everything after bypasses both the
/// stage and its predicate.
struct DropWhileStage<F, A> {
    predicate: F,
    dropping: bool,
    _input: PhantomData<fn(A)>,
}

impl<A, F> Stage for DropWhileStage<F, A>
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
        if self.dropping && (self.predicate)(&value) {
            return Ok(());
        }
        self.dropping = false;
        ctx.forward_value(value, has_more_upstream);
        ctx.detach();
        ctx.broadcast(PipelineEvent::StageDetached);
        Ok(())
    }

    fn resume(&mut self) {
        self.dropping = true;
    }
}

/// Skip elements while `predicate` holds, then pass the rest through.
pub fn drop_while<A, F>(predicate: F) -> IntermediateHandle<A, A>
where
    A: 'static,
    F: FnMut(&A) -> bool + 'static,
{
    IntermediateHandle::new(DropWhileStage {
        predicate,
        dropping: true,
        _input: PhantomData,
    })
}

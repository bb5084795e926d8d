use crate::element::{boxed, downcast, Element};
use crate::error::PipelineResult;
use crate::stage::{Stage, StageContext, TerminalHandle, TerminalStage};
use std::marker::PhantomData;

struct CountStage<A> {
    total: usize,
    _input: PhantomData<fn(A)>,
}

impl<A: 'static> Stage for CountStage<A> {
    fn consume(
        &mut self,
        element: Element,
        _has_more_upstream: bool,
        _ctx: &mut StageContext,
    ) -> PipelineResult<()> {
        downcast::<A>(element)?;
        self.total += 1;
        Ok(())
    }

    fn resume(&mut self) {
        self.total = 0;
    }
}

impl<A: 'static> TerminalStage for CountStage<A> {
    fn finish(&mut self) -> PipelineResult<Element> {
        Ok(boxed(std::mem::take(&mut self.total)))
    }
}

/// Count the elements reaching the sink.
pub fn count<A: 'static>() -> TerminalHandle<A, usize> {
    TerminalHandle::new(CountStage::<A> {
        total: 0,
        _input: PhantomData,
    })
}

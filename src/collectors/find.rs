use crate::element::{boxed, downcast, Element};
use crate::error::PipelineResult;
use crate::event::PipelineEvent;
use crate::stage::{Stage, StageContext, TerminalHandle, TerminalStage};

struct FindFirstStage<F, A> {
    predicate: F,
    found: Option<A>,
}

impl<A, F> Stage for FindFirstStage<F, A>
where
    A: 'static,
    F: FnMut(&A) -> bool + 'static,
{
    fn consume(
        &mut self,
        element: Element,
        _has_more_upstream: bool,
        ctx: &mut StageContext,
    ) -> PipelineResult<()> {
        if self.found.is_some() {
            return Ok(());
        }
        let value = downcast::<A>(element)?;
        if (self.predicate)(&value) {
            self.found = Some(value);
            ctx.broadcast(PipelineEvent::TerminatePipeline);
        }
        Ok(())
    }

    fn resume(&mut self) {
        self.found = None;
    }
}

impl<A, F> TerminalStage for FindFirstStage<F, A>
where
    A: 'static,
    F: FnMut(&A) -> bool + 'static,
{
    fn finish(&mut self) -> PipelineResult<Element> {
        Ok(boxed(self.found.take()))
    }
}

/// First element matching `predicate`; terminates the run on the match.
pub fn find_first<A, F>(predicate: F) -> TerminalHandle<A, Option<A>>
where
    A: 'static,
    F: FnMut(&A) -> bool + 'static,
{
    TerminalHandle::new(FindFirstStage {
        predicate,
        found: None,
    })
}

struct FindLastStage<F, A> {
    predicate: F,
    found: Option<A>,
}

impl<A, F> Stage for FindLastStage<F, A>
where
    A: 'static,
    F: FnMut(&A) -> bool + 'static,
{
    fn consume(
        &mut self,
        element: Element,
        has_more_upstream: bool,
        _ctx: &mut StageContext,
    ) -> PipelineResult<()> {
        // Matches only the element flagged as the end of the stream; an
        // upstream stage that withholds that flag yields None.
        if has_more_upstream {
            return Ok(());
        }
        let value = downcast::<A>(element)?;
        if (self.predicate)(&value) {
            self.found = Some(value);
        }
        Ok(())
    }

    fn resume(&mut self) {
        self.found = None;
    }
}

impl<A, F> TerminalStage for FindLastStage<F, A>
where
    A: 'static,
    F: FnMut(&A) -> bool + 'static,
{
    fn finish(&mut self) -> PipelineResult<Element> {
        Ok(boxed(self.found.take()))
    }
}

/// The final element of the stream if it matches `predicate`, keyed off the
/// end-of-stream flag rather than a buffer of candidates.
pub fn find_last<A, F>(predicate: F) -> TerminalHandle<A, Option<A>>
where
    A: 'static,
    F: FnMut(&A) -> bool + 'static,
{
    TerminalHandle::new(FindLastStage {
        predicate,
        found: None,
    })
}

use crate::element::{boxed, downcast, Element};
use crate::error::{PipelineError, PipelineResult};
use crate::stage::{Stage, StageContext, TerminalHandle, TerminalStage};

struct ReduceStage<F, A> {
    combine: F,
    accumulated: Option<A>,
}

impl<A, F> Stage for ReduceStage<F, A>
where
    A: 'static,
    F: FnMut(A, A) -> A + 'static,
{
    fn consume(
        &mut self,
        element: Element,
        _has_more_upstream: bool,
        _ctx: &mut StageContext,
    ) -> PipelineResult<()> {
        let value = downcast::<A>(element)?;
        self.accumulated = Some(match self.accumulated.take() {
            Some(accumulated) => (self.combine)(accumulated, value),
            None => value,
        });
        Ok(())
    }

    fn resume(&mut self) {
        self.accumulated = None;
    }
}

impl<A, F> TerminalStage for ReduceStage<F, A>
where
    A: 'static,
    F: FnMut(A, A) -> A + 'static,
{
    fn finish(&mut self) -> PipelineResult<Element> {
        match self.accumulated.take() {
            Some(accumulated) => Ok(boxed(accumulated)),
            None => Err(PipelineError::EmptyPipeline {
                collector: "reduce",
            }),
        }
    }
}

/// Seedless left reduction. Reducing an empty stream fails with
/// [`PipelineError::EmptyPipeline`].
pub fn reduce<A, F>(combine: F) -> TerminalHandle<A, A>
where
    A: 'static,
    F: FnMut(A, A) -> A + 'static,
{
    TerminalHandle::new(ReduceStage {
        combine,
        accumulated: None,
    })
}

struct FoldStage<F, A, B> {
    seed: B,
    combine: F,
    accumulated: Option<B>,
    _input: std::marker::PhantomData<fn(A)>,
}

impl<A, B, F> Stage for FoldStage<F, A, B>
where
    A: 'static,
    B: Clone + 'static,
    F: FnMut(B, A) -> B + 'static,
{
    fn consume(
        &mut self,
        element: Element,
        _has_more_upstream: bool,
        _ctx: &mut StageContext,
    ) -> PipelineResult<()> {
        let value = downcast::<A>(element)?;
        let accumulated = self
            .accumulated
            .take()
            .unwrap_or_else(|| self.seed.clone());
        self.accumulated = Some((self.combine)(accumulated, value));
        Ok(())
    }

    fn resume(&mut self) {
        self.accumulated = None;
    }
}

impl<A, B, F> TerminalStage for FoldStage<F, A, B>
where
    A: 'static,
    B: Clone + 'static,
    F: FnMut(B, A) -> B + 'static,
{
    fn finish(&mut self) -> PipelineResult<Element> {
        let accumulated = self
            .accumulated
            .take()
            .unwrap_or_else(|| self.seed.clone());
        Ok(boxed(accumulated))
    }
}

/// Seeded left fold; an empty stream yields the seed.
pub fn fold<A, B, F>(seed: B, combine: F) -> TerminalHandle<A, B>
where
    A: 'static,
    B: Clone + 'static,
    F: FnMut(B, A) -> B + 'static,
{
    TerminalHandle::new(FoldStage {
        seed,
        combine,
        accumulated: None,
        _input: std::marker::PhantomData,
    })
}

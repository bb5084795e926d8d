use crate::element::{downcast, Element};
use crate::error::PipelineResult;
use crate::stage::{IntermediateHandle, Stage, StageContext};
use std::marker::PhantomData;

struct MapStage<F, A> {
    transform: F,
    _input: PhantomData<fn(A)>,
}

impl<A, B, F> Stage for MapStage<F, A>
where
    A: 'static,
    B: 'static,
    F: FnMut(A) -> B + 'static,
{
    fn consume(
        &mut self,
        element: Element,
        has_more_upstream: bool,
        ctx: &mut StageContext,
    ) -> PipelineResult<()> {
        let value = downcast::<A>(element)?;
        ctx.forward_value((self.transform)(value), has_more_upstream);
        Ok(())
    }
}

/// Transform each element with `transform`.
pub fn map<A, B, F>(transform: F) -> IntermediateHandle<A, B>
where
    A: 'static,
    B: 'static,
    F: FnMut(A) -> B + 'static,
{
    IntermediateHandle::new(MapStage {
        transform,
        _input: PhantomData,
    })
}

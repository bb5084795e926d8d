use crate::element::{downcast, Element};
use crate::error::PipelineResult;
use crate::stage::{IntermediateHandle, Stage, StageContext};
use std::marker::PhantomData;

struct FlatMapStage<F, A> {
    expand: F,
    _input: PhantomData<fn(A)>,
}

impl<A, B, I, F> Stage for FlatMapStage<F, A>
where
    A: 'static,
    B: 'static,
    I: IntoIterator<Item = B>,
    F: FnMut(A) -> I + 'static,
{
    fn consume(
        &mut self,
        element: Element,
        has_more_upstream: bool,
        ctx: &mut StageContext,
    ) -> PipelineResult<()> {
        let value = downcast::<A>(element)?;
        let expanded: Vec<B> = (self.expand)(value).into_iter().collect();
        let last = expanded.len().saturating_sub(1);
        for (position, item) in expanded.into_iter().enumerate() {
            // Only the final item of the final expansion closes the stream.
            ctx.forward_value(item, has_more_upstream || position != last);
        }
        Ok(())
    }
}

/// Expand each element into zero or more elements.
pub fn flat_map<A, B, I, F>(expand: F) -> IntermediateHandle<A, B>
where
    A: 'static,
    B: 'static,
    I: IntoIterator<Item = B>,
    F: FnMut(A) -> I + 'static,
{
    IntermediateHandle::new(FlatMapStage {
        expand,
        _input: PhantomData,
    })
}

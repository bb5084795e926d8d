use crate::element::{downcast, Element};
use crate::error::PipelineResult;
use crate::event::PipelineEvent;
use crate::stage::{IntermediateHandle, Stage, StageContext};
use std::cmp::Ordering;

/// Buffers the whole stream and emits it sorted once the end-of-stream flag
/// arrives. Early termination reaches a buffering stage only as a cascaded
/// event; a plain terminate broadcast leaves the buffer unflushed.
struct SortedStage<A, F> {
    compare: F,
    buffer: Vec<A>,
}

impl<A, F> SortedStage<A, F>
where
    A: 'static,
    F: FnMut(&A, &A) -> Ordering + 'static,
{
    fn flush(&mut self, ctx: &mut StageContext) {
        let mut drained = std::mem::take(&mut self.buffer);
        drained.sort_by(|a, b| (self.compare)(a, b));
        let last = drained.len().saturating_sub(1);
        for (position, item) in drained.into_iter().enumerate() {
            ctx.forward_value(item, position != last);
        }
    }
}

impl<A, F> Stage for SortedStage<A, F>
where
    A: 'static,
    F: FnMut(&A, &A) -> Ordering + 'static,
{
    fn consume(
        &mut self,
        element: Element,
        has_more_upstream: bool,
        ctx: &mut StageContext,
    ) -> PipelineResult<()> {
        self.buffer.push(downcast::<A>(element)?);
        if !has_more_upstream {
            self.flush(ctx);
        }
        Ok(())
    }

    fn resume(&mut self) {
        self.buffer.clear();
    }

    fn on_cascade(
        &mut self,
        event: PipelineEvent,
        ctx: &mut StageContext,
    ) -> PipelineResult<()> {
        if event == PipelineEvent::TerminatePipeline && !self.buffer.is_empty() {
            self.flush(ctx);
        }
        Ok(())
    }
}

/// Sort the stream ascending by its natural order.
pub fn sorted<A>() -> IntermediateHandle<A, A>
where
    A: Ord + 'static,
{
    sorted_by(|a: &A, b: &A| a.cmp(b))
}

/// Sort the stream with a caller-supplied comparator (stable).
pub fn sorted_by<A, F>(compare: F) -> IntermediateHandle<A, A>
where
    A: 'static,
    F: FnMut(&A, &A) -> Ordering + 'static,
{
    IntermediateHandle::new(SortedStage {
        compare,
        buffer: Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::LazyPipeline;

    #[test]
    fn test_sorted_emits_ascending_order() {
        let mut pipeline = LazyPipeline::from([5, 1, 4, 2, 3]);
        pipeline.add(sorted::<i32>()).unwrap();
        assert_eq!(pipeline.to_vec().unwrap(), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_sorted_by_honors_the_comparator() {
        let mut pipeline = LazyPipeline::from([5, 1, 4, 2, 3]);
        pipeline.add(sorted_by(|a: &i32, b: &i32| b.cmp(a))).unwrap();
        assert_eq!(pipeline.to_vec().unwrap(), vec![5, 4, 3, 2, 1]);
    }

    #[test]
    fn test_sorted_buffer_clears_on_resume() {
        let mut pipeline = LazyPipeline::from([3, 1, 2]);
        pipeline.add(sorted::<i32>()).unwrap();
        assert_eq!(pipeline.to_vec().unwrap(), vec![1, 2, 3]);

        pipeline.resume();
        pipeline.read_from([9, 7, 8]);
        assert_eq!(pipeline.to_vec().unwrap(), vec![7, 8, 9]);
    }
}

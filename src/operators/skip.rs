use crate::element::{downcast, Element};
use crate::error::PipelineResult;
use crate::event::PipelineEvent;
use crate::stage::{IntermediateHandle, Stage, StageContext};
use std::marker::PhantomData;

/// Drops the first `count` elements, then detaches itself so the remainder
/// of the stream bypasses it entirely. The element that completes the count
/// is the last one this stage ever sees, and it is dropped with the rest.
struct SkipStage<A> {
    count: usize,
    skipped: usize,
    _input: PhantomData<fn(A)>,
}

impl<A: 'static> Stage for SkipStage<A> {
    fn consume(
        &mut self,
        element: Element,
        has_more_upstream: bool,
        ctx: &mut StageContext,
    ) -> PipelineResult<()> {
        let value = downcast::<A>(element)?;
        if self.skipped < self.count {
            self.skipped += 1;
            if self.skipped == self.count {
                ctx.detach();
                ctx.broadcast(PipelineEvent::StageDetached);
            }
        } else {
            // Only reachable with count == 0: the stage never detaches and
            // passes everything through.
            ctx.forward_value(value, has_more_upstream);
        }
        Ok(())
    }

    fn resume(&mut self) {
        self.skipped = 0;
    }
}

/// Skip the first `count` elements of the stream.
pub fn skip<A: 'static>(count: usize) -> IntermediateHandle<A, A> {
    IntermediateHandle::new(SkipStage::<A> {
        count,
        skipped: 0,
        _input: PhantomData,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::LazyPipeline;

    #[test]
    fn test_skip_drops_the_leading_elements() {
        let mut pipeline = LazyPipeline::from([0, 2, 1, 5, 4, 6, 8]);
        pipeline.add(skip::<i32>(3)).unwrap();
        assert_eq!(pipeline.to_vec().unwrap(), vec![5, 4, 6, 8]);
    }

    #[test]
    fn test_skip_zero_forwards_everything() {
        let mut pipeline = LazyPipeline::from([1, 2, 3]);
        pipeline.add(skip::<i32>(0)).unwrap();
        assert_eq!(pipeline.to_vec().unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_skip_longer_than_the_stream_yields_empty() {
        let mut pipeline = LazyPipeline::from([1, 2]);
        pipeline.add(skip::<i32>(5)).unwrap();
        assert_eq!(pipeline.to_vec().unwrap(), Vec::<i32>::new());
    }
}

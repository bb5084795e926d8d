use crate::element::{boxed, downcast, Element};
use crate::error::{PipelineError, PipelineResult};
use crate::stage::{Stage, StageContext, TerminalHandle, TerminalStage};
use std::ops::Add;

struct SumStage<A> {
    total: A,
}

impl<A> Stage for SumStage<A>
where
    A: Add<Output = A> + Default + 'static,
{
    fn consume(
        &mut self,
        element: Element,
        _has_more_upstream: bool,
        _ctx: &mut StageContext,
    ) -> PipelineResult<()> {
        let value = downcast::<A>(element)?;
        self.total = std::mem::take(&mut self.total) + value;
        Ok(())
    }

    fn resume(&mut self) {
        self.total = A::default();
    }
}

impl<A> TerminalStage for SumStage<A>
where
    A: Add<Output = A> + Default + 'static,
{
    fn finish(&mut self) -> PipelineResult<Element> {
        Ok(boxed(std::mem::take(&mut self.total)))
    }
}

/// Sum the stream, starting from `A::default()`. An empty stream sums to
/// the default value.
pub fn sum<A>() -> TerminalHandle<A, A>
where
    A: Add<Output = A> + Default + 'static,
{
    TerminalHandle::new(SumStage::<A> {
        total: A::default(),
    })
}

struct AverageStage<A> {
    total: f64,
    seen: usize,
    _input: std::marker::PhantomData<fn(A)>,
}

impl<A> Stage for AverageStage<A>
where
    A: Into<f64> + 'static,
{
    fn consume(
        &mut self,
        element: Element,
        _has_more_upstream: bool,
        _ctx: &mut StageContext,
    ) -> PipelineResult<()> {
        let value = downcast::<A>(element)?;
        self.total += value.into();
        self.seen += 1;
        Ok(())
    }

    fn resume(&mut self) {
        self.total = 0.0;
        self.seen = 0;
    }
}

impl<A> TerminalStage for AverageStage<A>
where
    A: Into<f64> + 'static,
{
    fn finish(&mut self) -> PipelineResult<Element> {
        if self.seen == 0 {
            return Err(PipelineError::EmptyPipeline {
                collector: "average",
            });
        }
        let mean = self.total / self.seen as f64;
        self.total = 0.0;
        self.seen = 0;
        Ok(boxed(mean))
    }
}

/// Arithmetic mean of the stream as `f64`. Averaging an empty stream fails
/// with [`PipelineError::EmptyPipeline`].
pub fn average<A>() -> TerminalHandle<A, f64>
where
    A: Into<f64> + 'static,
{
    TerminalHandle::new(AverageStage::<A> {
        total: 0.0,
        seen: 0,
        _input: std::marker::PhantomData,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::LazyPipeline;

    #[test]
    fn test_sum_adds_the_stream() {
        let mut pipeline = LazyPipeline::from([1, 2, 3, 4]);
        assert_eq!(pipeline.collect(sum::<i32>()).unwrap(), 10);
    }

    #[test]
    fn test_sum_of_an_empty_stream_is_the_default() {
        let mut pipeline = LazyPipeline::from(Vec::<i32>::new());
        assert_eq!(pipeline.collect(sum::<i32>()).unwrap(), 0);
    }

    #[test]
    fn test_average_divides_by_the_element_count() {
        let mut pipeline = LazyPipeline::from([1, 2, 3, 4]);
        let mean = pipeline.collect(average::<i32>()).unwrap();
        assert!((mean - 2.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_average_of_an_empty_stream_fails() {
        let mut pipeline = LazyPipeline::from(Vec::<i32>::new());
        let err = pipeline.collect(average::<i32>()).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::EmptyPipeline { collector: "average" }
        ));
    }
}

use crate::element::{boxed, downcast, Element};
use crate::error::PipelineResult;
use crate::stage::{Stage, StageContext, TerminalHandle, TerminalStage};
use std::cmp::Ordering;

struct ExtremumStage<A, F> {
    compare: F,
    /// Keep the incoming element when the comparator returns this ordering
    /// against the current best.
    keep_on: Ordering,
    best: Option<A>,
}

impl<A, F> Stage for ExtremumStage<A, F>
where
    A: 'static,
    F: FnMut(&A, &A) -> Ordering + 'static,
{
    fn consume(
        &mut self,
        element: Element,
        _has_more_upstream: bool,
        _ctx: &mut StageContext,
    ) -> PipelineResult<()> {
        let value = downcast::<A>(element)?;
        match &self.best {
            Some(current) if (self.compare)(&value, current) != self.keep_on => {}
            _ => self.best = Some(value),
        }
        Ok(())
    }

    fn resume(&mut self) {
        self.best = None;
    }
}

impl<A, F> TerminalStage for ExtremumStage<A, F>
where
    A: 'static,
    F: FnMut(&A, &A) -> Ordering + 'static,
{
    fn finish(&mut self) -> PipelineResult<Element> {
        Ok(boxed(self.best.take()))
    }
}

fn extremum<A, F>(compare: F, keep_on: Ordering) -> TerminalHandle<A, Option<A>>
where
    A: 'static,
    F: FnMut(&A, &A) -> Ordering + 'static,
{
    TerminalHandle::new(ExtremumStage {
        compare,
        keep_on,
        best: None,
    })
}

/// Smallest element by natural order, or `None` for an empty stream.
pub fn min<A: Ord + 'static>() -> TerminalHandle<A, Option<A>> {
    min_by(|a: &A, b: &A| a.cmp(b))
}

/// Smallest element by `compare`. Ties keep the earlier element.
pub fn min_by<A, F>(compare: F) -> TerminalHandle<A, Option<A>>
where
    A: 'static,
    F: FnMut(&A, &A) -> Ordering + 'static,
{
    extremum(compare, Ordering::Less)
}

/// Largest element by natural order, or `None` for an empty stream.
pub fn max<A: Ord + 'static>() -> TerminalHandle<A, Option<A>> {
    max_by(|a: &A, b: &A| a.cmp(b))
}

/// Largest element by `compare`. Ties keep the earlier element.
pub fn max_by<A, F>(compare: F) -> TerminalHandle<A, Option<A>>
where
    A: 'static,
    F: FnMut(&A, &A) -> Ordering + 'static,
{
    extremum(compare, Ordering::Greater)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::LazyPipeline;

    #[test]
    fn test_min_and_max_find_the_extremes() {
        let mut pipeline = LazyPipeline::from([5, 2, 8, 1, 9]);
        assert_eq!(pipeline.collect(min::<i32>()).unwrap(), Some(1));

        let mut pipeline = LazyPipeline::from([5, 2, 8, 1, 9]);
        assert_eq!(pipeline.collect(max::<i32>()).unwrap(), Some(9));
    }

    #[test]
    fn test_extremes_of_an_empty_stream_are_none() {
        let mut pipeline = LazyPipeline::from(Vec::<i32>::new());
        assert_eq!(pipeline.collect(min::<i32>()).unwrap(), None);
    }

    #[test]
    fn test_min_by_uses_the_comparator() {
        let mut pipeline = LazyPipeline::from(["owl", "ox", "heron"]);
        let shortest = pipeline
            .collect(min_by(|a: &&str, b: &&str| a.len().cmp(&b.len())))
            .unwrap();
        assert_eq!(shortest, Some("ox"));
    }
}

use crate::element::{boxed, downcast, Element};
use crate::error::PipelineResult;
use crate::event::PipelineEvent;
use crate::stage::{Stage, StageContext, TerminalHandle, TerminalStage};

/// Shared short-circuiting quantifier: starts at `initial` and flips to
/// `!initial` on the first element where `trigger` agrees with the
/// predicate's verdict, terminating the run.
struct MatchStage<F, A> {
    predicate: F,
    initial: bool,
    trigger: bool,
    verdict: bool,
    _input: std::marker::PhantomData<fn(A)>,
}

impl<A, F> Stage for MatchStage<F, A>
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
        let value = downcast::<A>(element)?;
        if self.verdict == self.initial && (self.predicate)(&value) == self.trigger {
            self.verdict = !self.initial;
            ctx.broadcast(PipelineEvent::TerminatePipeline);
        }
        Ok(())
    }

    fn resume(&mut self) {
        self.verdict = self.initial;
    }
}

impl<A, F> TerminalStage for MatchStage<F, A>
where
    A: 'static,
    F: FnMut(&A) -> bool + 'static,
{
    fn finish(&mut self) -> PipelineResult<Element> {
        let verdict = self.verdict;
        self.verdict = self.initial;
        Ok(boxed(verdict))
    }
}

fn quantifier<A, F>(predicate: F, initial: bool, trigger: bool) -> TerminalHandle<A, bool>
where
    A: 'static,
    F: FnMut(&A) -> bool + 'static,
{
    TerminalHandle::new(MatchStage {
        predicate,
        initial,
        trigger,
        verdict: initial,
        _input: std::marker::PhantomData,
    })
}

/// `true` iff every element matches; short-circuits on the first failure.
/// Vacuously `true` for an empty stream.
pub fn all_match<A, F>(predicate: F) -> TerminalHandle<A, bool>
where
    A: 'static,
    F: FnMut(&A) -> bool + 'static,
{
    quantifier(predicate, true, false)
}

/// `true` iff any element matches; short-circuits on the first match.
pub fn any_match<A, F>(predicate: F) -> TerminalHandle<A, bool>
where
    A: 'static,
    F: FnMut(&A) -> bool + 'static,
{
    quantifier(predicate, false, true)
}

/// `true` iff no element matches; short-circuits on the first match.
pub fn none_match<A, F>(predicate: F) -> TerminalHandle<A, bool>
where
    A: 'static,
    F: FnMut(&A) -> bool + 'static,
{
    quantifier(predicate, true, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::LazyPipeline;

    #[test]
    fn test_all_match_fails_on_the_first_counterexample() {
        let mut pipeline = LazyPipeline::from([2, 4, 6, 8, 1, 3]);
        assert!(!pipeline.collect(all_match(|n: &i32| n % 2 == 0)).unwrap());
    }

    #[test]
    fn test_all_match_is_vacuously_true_on_empty() {
        let mut pipeline = LazyPipeline::from(Vec::<i32>::new());
        assert!(pipeline.collect(all_match(|n: &i32| n % 2 == 0)).unwrap());
    }

    #[test]
    fn test_any_match_finds_a_single_witness() {
        let mut pipeline = LazyPipeline::from([1, 3, 4, 5]);
        assert!(pipeline.collect(any_match(|n: &i32| n % 2 == 0)).unwrap());
    }

    #[test]
    fn test_none_match_rejects_on_a_witness() {
        let mut pipeline = LazyPipeline::from([1, 3, 5]);
        assert!(pipeline.collect(none_match(|n: &i32| n % 2 == 0)).unwrap());

        let mut pipeline = LazyPipeline::from([1, 3, 4]);
        assert!(!pipeline.collect(none_match(|n: &i32| n % 2 == 0)).unwrap());
    }
}

use crate::element::{downcast, Element};
use crate::error::PipelineResult;
use crate::stage::{IntermediateHandle, Stage, StageContext};
use std::collections::HashSet;
use std::hash::Hash;
use std::marker::PhantomData;

struct DistinctStage<F, A, K> {
    key: F,
    seen: HashSet<K>,
    _input: PhantomData<fn(A)>,
}

impl<A, K, F> Stage for DistinctStage<F, A, K>
where
    A: 'static,
    K: Eq + Hash + 'static,
    F: FnMut(&A) -> K + 'static,
{
    fn consume(
        &mut self,
        element: Element,
        has_more_upstream: bool,
        ctx: &mut StageContext,
    ) -> PipelineResult<()> {
        let value = downcast::<A>(element)?;
        if self.seen.insert((self.key)(&value)) {
            ctx.forward_value(value, has_more_upstream);
        }
        Ok(())
    }

    fn resume(&mut self) {
        self.seen.clear();
    }
}

/// Drop duplicate elements, keeping first occurrences in order.
pub fn distinct<A>() -> IntermediateHandle<A, A>
where
    A: Clone + Eq + Hash + 'static,
{
    distinct_by(|value: &A| value.clone())
}

/// Drop elements whose `key` has already been seen this run.
pub fn distinct_by<A, K, F>(key: F) -> IntermediateHandle<A, A>
where
    A: 'static,
    K: Eq + Hash + 'static,
    F: FnMut(&A) -> K + 'static,
{
    IntermediateHandle::new(DistinctStage {
        key,
        seen: HashSet::new(),
        _input: PhantomData,
    })
}

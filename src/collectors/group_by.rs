use crate::element::{boxed, downcast, Element};
use crate::error::PipelineResult;
use crate::stage::{Stage, StageContext, TerminalHandle, TerminalStage};
use std::collections::HashMap;
use std::hash::Hash;
use std::marker::PhantomData;

struct GroupByStage<FK, FV, A, K, V> {
    key: FK,
    value: FV,
    groups: HashMap<K, Vec<V>>,
    _input: PhantomData<fn(A)>,
}

impl<A, K, V, FK, FV> Stage for GroupByStage<FK, FV, A, K, V>
where
    A: 'static,
    K: Eq + Hash + 'static,
    V: 'static,
    FK: FnMut(&A) -> K + 'static,
    FV: FnMut(A) -> V + 'static,
{
    fn consume(
        &mut self,
        element: Element,
        _has_more_upstream: bool,
        _ctx: &mut StageContext,
    ) -> PipelineResult<()> {
        let item = downcast::<A>(element)?;
        let key = (self.key)(&item);
        self.groups.entry(key).or_default().push((self.value)(item));
        Ok(())
    }

    fn resume(&mut self) {
        self.groups.clear();
    }
}

impl<A, K, V, FK, FV> TerminalStage for GroupByStage<FK, FV, A, K, V>
where
    A: 'static,
    K: Eq + Hash + 'static,
    V: 'static,
    FK: FnMut(&A) -> K + 'static,
    FV: FnMut(A) -> V + 'static,
{
    fn finish(&mut self) -> PipelineResult<Element> {
        Ok(boxed(std::mem::take(&mut self.groups)))
    }
}

/// Group elements by `key`, preserving arrival order within each group.
pub fn group_by<A, K, FK>(key: FK) -> TerminalHandle<A, HashMap<K, Vec<A>>>
where
    A: 'static,
    K: Eq + Hash + 'static,
    FK: FnMut(&A) -> K + 'static,
{
    group_by_with(key, |item| item)
}

/// Group a projection of each element by `key`.
pub fn group_by_with<A, K, V, FK, FV>(
    key: FK,
    value: FV,
) -> TerminalHandle<A, HashMap<K, Vec<V>>>
where
    A: 'static,
    K: Eq + Hash + 'static,
    V: 'static,
    FK: FnMut(&A) -> K + 'static,
    FV: FnMut(A) -> V + 'static,
{
    TerminalHandle::new(GroupByStage {
        key,
        value,
        groups: HashMap::new(),
        _input: PhantomData,
    })
}

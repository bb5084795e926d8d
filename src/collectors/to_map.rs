use crate::element::{boxed, downcast, Element};
use crate::error::PipelineResult;
use crate::stage::{Stage, StageContext, TerminalHandle, TerminalStage};
use std::collections::HashMap;
use std::hash::Hash;
use std::marker::PhantomData;

struct ToMapStage<FK, FV, A, K, V> {
    key: FK,
    value: FV,
    entries: HashMap<K, V>,
    _input: PhantomData<fn(A)>,
}

impl<A, K, V, FK, FV> Stage for ToMapStage<FK, FV, A, K, V>
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
        // Duplicate keys keep the most recent value.
        self.entries.insert(key, (self.value)(item));
        Ok(())
    }

    fn resume(&mut self) {
        self.entries.clear();
    }
}

impl<A, K, V, FK, FV> TerminalStage for ToMapStage<FK, FV, A, K, V>
where
    A: 'static,
    K: Eq + Hash + 'static,
    V: 'static,
    FK: FnMut(&A) -> K + 'static,
    FV: FnMut(A) -> V + 'static,
{
    fn finish(&mut self) -> PipelineResult<Element> {
        Ok(boxed(std::mem::take(&mut self.entries)))
    }
}

/// Build a map from key and value projections; the last write wins on
/// duplicate keys.
pub fn to_map<A, K, V, FK, FV>(key: FK, value: FV) -> TerminalHandle<A, HashMap<K, V>>
where
    A: 'static,
    K: Eq + Hash + 'static,
    V: 'static,
    FK: FnMut(&A) -> K + 'static,
    FV: FnMut(A) -> V + 'static,
{
    TerminalHandle::new(ToMapStage {
        key,
        value,
        entries: HashMap::new(),
        _input: PhantomData,
    })
}

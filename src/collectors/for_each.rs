use crate::element::{boxed, downcast, Element};
use crate::error::PipelineResult;
use crate::stage::{Stage, StageContext, TerminalHandle, TerminalStage};
use std::marker::PhantomData;

struct ForEachStage<F, A> {
    action: F,
    _input: PhantomData<fn(A)>,
}

impl<A, F> Stage for ForEachStage<F, A>
where
    A: 'static,
    F: FnMut(A) + 'static,
{
    fn consume(
        &mut self,
        element: Element,
        _has_more_upstream: bool,
        _ctx: &mut StageContext,
    ) -> PipelineResult<()> {
        (self.action)(downcast::<A>(element)?);
        Ok(())
    }
}

impl<A, F> TerminalStage for ForEachStage<F, A>
where
    A: 'static,
    F: FnMut(A) + 'static,
{
    fn finish(&mut self) -> PipelineResult<Element> {
        Ok(boxed(()))
    }
}

/// Run `action` for every element; the pipeline result is `()`.
pub fn for_each<A, F>(action: F) -> TerminalHandle<A, ()>
where
    A: 'static,
    F: FnMut(A) + 'static,
{
    TerminalHandle::new(ForEachStage {
        action,
        _input: PhantomData,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::LazyPipeline;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_for_each_visits_every_element() {
        let visited = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&visited);

        let mut pipeline = LazyPipeline::from([1, 2, 3]);
        pipeline
            .collect(for_each(move |n: i32| sink.borrow_mut().push(n)))
            .unwrap();
        assert_eq!(*visited.borrow(), vec![1, 2, 3]);
    }
}

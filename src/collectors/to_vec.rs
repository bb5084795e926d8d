use crate::element::{boxed, downcast, Element};
use crate::error::PipelineResult;
use crate::stage::{Stage, StageContext, TerminalHandle, TerminalStage};

struct ToVecStage<A> {
    collected: Vec<A>,
}

impl<A: 'static> Stage for ToVecStage<A> {
    fn consume(
        &mut self,
        element: Element,
        _has_more_upstream: bool,
        _ctx: &mut StageContext,
    ) -> PipelineResult<()> {
        self.collected.push(downcast::<A>(element)?);
        Ok(())
    }

    fn resume(&mut self) {
        self.collected.clear();
    }
}

impl<A: 'static> TerminalStage for ToVecStage<A> {
    fn finish(&mut self) -> PipelineResult<Element> {
        Ok(boxed(std::mem::take(&mut self.collected)))
    }
}

/// Collect every element into a `Vec`, in arrival order.
pub fn to_vec<A: 'static>() -> TerminalHandle<A, Vec<A>> {
    TerminalHandle::new(ToVecStage::<A> {
        collected: Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::LazyPipeline;

    #[test]
    fn test_to_vec_preserves_order() {
        let mut pipeline = LazyPipeline::from([3, 1, 2]);
        assert_eq!(pipeline.collect(to_vec::<i32>()).unwrap(), vec![3, 1, 2]);
    }

    #[test]
    fn test_to_vec_of_an_empty_source_is_empty() {
        let mut pipeline = LazyPipeline::from(Vec::<i32>::new());
        assert_eq!(pipeline.to_vec().unwrap(), Vec::<i32>::new());
    }
}

use crate::element::{boxed, downcast, Element};
use crate::error::PipelineResult;
use crate::stage::{Stage, StageContext, TerminalHandle, TerminalStage};
use std::fmt::Display;
use std::fmt::Write as _;
use std::marker::PhantomData;

struct JoinStage<A> {
    delimiter: String,
    joined: String,
    first: bool,
    _input: PhantomData<fn(A)>,
}

impl<A> Stage for JoinStage<A>
where
    A: Display + 'static,
{
    fn consume(
        &mut self,
        element: Element,
        _has_more_upstream: bool,
        _ctx: &mut StageContext,
    ) -> PipelineResult<()> {
        let value = downcast::<A>(element)?;
        if !self.first {
            self.joined.push_str(&self.delimiter);
        }
        self.first = false;
        // Writing into a String cannot fail.
        let _ = write!(self.joined, "{value}");
        Ok(())
    }

    fn resume(&mut self) {
        self.joined.clear();
        self.first = true;
    }
}

impl<A> TerminalStage for JoinStage<A>
where
    A: Display + 'static,
{
    fn finish(&mut self) -> PipelineResult<Element> {
        self.first = true;
        Ok(boxed(std::mem::take(&mut self.joined)))
    }
}

/// Concatenate the `Display` renderings of the stream, separated by
/// `delimiter`. An empty stream joins to an empty string.
pub fn join<A>(delimiter: impl Into<String>) -> TerminalHandle<A, String>
where
    A: Display + 'static,
{
    TerminalHandle::new(JoinStage::<A> {
        delimiter: delimiter.into(),
        joined: String::new(),
        first: true,
        _input: PhantomData,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::LazyPipeline;

    #[test]
    fn test_join_separates_with_the_delimiter() {
        let mut pipeline = LazyPipeline::from([1, 2, 3]);
        assert_eq!(pipeline.collect(join::<i32>(", ")).unwrap(), "1, 2, 3");
    }

    #[test]
    fn test_join_of_a_single_element_has_no_delimiter() {
        let mut pipeline = LazyPipeline::from([7]);
        assert_eq!(pipeline.collect(join::<i32>(",")).unwrap(), "7");
    }

    #[test]
    fn test_join_of_an_empty_stream_is_empty() {
        let mut pipeline = LazyPipeline::from(Vec::<i32>::new());
        assert_eq!(pipeline.collect(join::<i32>(",")).unwrap(), "");
    }
}

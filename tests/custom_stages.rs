//! User-defined stages plugged in through the public `Stage` and
//! `TerminalStage` traits.

use lazypipe::element::{boxed, downcast};
use lazypipe::{
    Element, IntermediateHandle, LazyPipeline, PipelineError, PipelineEvent, PipelineResult,
    Stage, StageContext, TerminalHandle, TerminalStage,
};
use std::cell::Cell;
use std::rc::Rc;

/// A hand-rolled skip that counts how often it is invoked.
struct CountingSkip {
    count: usize,
    skipped: usize,
    invocations: Rc<Cell<usize>>,
}

impl Stage for CountingSkip {
    fn consume(
        &mut self,
        element: Element,
        has_more_upstream: bool,
        ctx: &mut StageContext,
    ) -> PipelineResult<()> {
        self.invocations.set(self.invocations.get() + 1);
        let value = downcast::<i32>(element)?;
        if self.skipped < self.count {
            self.skipped += 1;
            if self.skipped == self.count {
                ctx.detach();
                ctx.broadcast(PipelineEvent::StageDetached);
            }
        } else {
            ctx.forward_value(value, has_more_upstream);
        }
        Ok(())
    }

    fn resume(&mut self) {
        self.skipped = 0;
    }
}

#[test]
fn test_custom_stage_detaches_after_its_quota() {
    let invocations = Rc::new(Cell::new(0));

    let mut pipeline = LazyPipeline::from([0, 2, 1, 5, 4, 6, 8]);
    pipeline
        .add(IntermediateHandle::<i32, i32>::new(CountingSkip {
            count: 3,
            skipped: 0,
            invocations: Rc::clone(&invocations),
        }))
        .unwrap();

    assert_eq!(pipeline.to_vec().unwrap(), vec![5, 4, 6, 8]);
    // Once detached, the remaining four elements bypass the stage.
    assert_eq!(invocations.get(), 3);
}

/// A sink that misbehaves by announcing its own detachment.
struct DetachingSink;

impl Stage for DetachingSink {
    fn consume(
        &mut self,
        _element: Element,
        _has_more_upstream: bool,
        ctx: &mut StageContext,
    ) -> PipelineResult<()> {
        ctx.broadcast(PipelineEvent::StageDetached);
        Ok(())
    }
}

impl TerminalStage for DetachingSink {
    fn finish(&mut self) -> PipelineResult<Element> {
        Ok(boxed(()))
    }
}

#[test]
fn test_terminal_detachment_is_rejected() {
    let mut pipeline = LazyPipeline::from([1, 2, 3]);
    let err = pipeline
        .collect(TerminalHandle::<i32, ()>::new(DetachingSink))
        .unwrap_err();
    assert!(matches!(err, PipelineError::InvalidDetachSource(id) if id.is_terminal()));
}

/// A custom sink: keeps the running maximum of absolute values.
struct AbsMaxSink {
    best: Option<i32>,
}

impl Stage for AbsMaxSink {
    fn consume(
        &mut self,
        element: Element,
        _has_more_upstream: bool,
        _ctx: &mut StageContext,
    ) -> PipelineResult<()> {
        let value = downcast::<i32>(element)?.abs();
        if self.best.map_or(true, |best| value > best) {
            self.best = Some(value);
        }
        Ok(())
    }

    fn resume(&mut self) {
        self.best = None;
    }
}

impl TerminalStage for AbsMaxSink {
    fn finish(&mut self) -> PipelineResult<Element> {
        Ok(boxed(self.best.take()))
    }
}

#[test]
fn test_custom_terminal_produces_its_result() {
    let mut pipeline = LazyPipeline::from([3, -7, 5]);
    let best = pipeline
        .collect(TerminalHandle::<i32, Option<i32>>::new(AbsMaxSink {
            best: None,
        }))
        .unwrap();
    assert_eq!(best, Some(7));
}

#[test]
fn test_type_mismatch_surfaces_as_an_error() {
    // The handle's type annotations are call-site sugar only; a stage fed
    // the wrong element type reports it at run time.
    let mut pipeline = LazyPipeline::from(["not", "numbers"]);
    let err = pipeline
        .collect(TerminalHandle::<&str, Option<i32>>::new(AbsMaxSink {
            best: None,
        }))
        .unwrap_err();
    assert!(matches!(err, PipelineError::ElementType { .. }));
}

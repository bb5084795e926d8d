//! The pipeline orchestrator: stage graph construction, the element feed
//! loop, and the reuse lifecycle.
//!
//! # Architecture
//!
//! ```text
//! [source adapter] ──► [stage 1] ──► [stage 2] ──► ... ──► [terminal]
//! ```
//!
//! Stages live in an arena (`Vec<StageSlot>`, slot 0 being the pipeline
//! itself acting as the source adapter) that is separate from the live
//! forwarding chain (`Vec<Link>`, one forward pointer per slot). Detaching a
//! stage mutates only its predecessor's forward pointer, never the arena, so
//! `resume` can reconstruct the full chain by re-walking the arena.
//!
//! Every wired stage carries an [`EventChannel`] with the orchestrator's
//! watcher subscribed. A `TerminatePipeline` broadcast stops the feed loop
//! before the next source element; a `StageDetached` broadcast splices the
//! origin out of the live chain.

use crate::collectors::to_vec;
use crate::element::{downcast, Element};
use crate::error::{PipelineError, PipelineResult};
use crate::event::{EventChannel, EventListener, PipelineEvent};
use crate::id::StageId;
use crate::stage::{IntermediateHandle, Stage, StageContext, TerminalHandle, TerminalStage};
use std::cell::RefCell;
use std::rc::Rc;

/// A forward pointer in the live chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Link {
    Stage(StageId),
    Terminal,
}

/// A slot holding one intermediate stage and its per-run bookkeeping.
struct StageSlot {
    stage: Box<dyn Stage>,
    channel: EventChannel,
    /// Set when the stage excised itself from the live chain this run.
    detached: bool,
}

impl StageSlot {
    fn new(stage: Box<dyn Stage>) -> Self {
        Self {
            stage,
            channel: EventChannel::new(),
            detached: false,
        }
    }
}

/// The terminal stage, stored outside the arena.
struct TerminalSlot {
    stage: Box<dyn TerminalStage>,
    channel: EventChannel,
}

/// Run state shared between the orchestrator and its event watcher.
#[derive(Default)]
struct RunControl {
    terminated: bool,
    pending_detaches: Vec<StageId>,
}

/// The source adapter occupying slot 0: forwards every element unchanged.
struct SourceStage;

impl Stage for SourceStage {
    fn consume(
        &mut self,
        element: Element,
        has_more_upstream: bool,
        ctx: &mut StageContext,
    ) -> PipelineResult<()> {
        ctx.forward(element, has_more_upstream);
        Ok(())
    }
}

/// A reusable pipeline that lazily evaluates its stages: nothing runs until
/// a terminal stage is triggered through [`collect`](Self::collect) or
/// [`to_vec`](Self::to_vec).
///
/// After a run the pipeline is frozen and terminated; call
/// [`resume`](Self::resume) before triggering another terminal stage,
/// optionally re-pointing it at a new source with
/// [`read_from`](Self::read_from).
pub struct LazyPipeline<T> {
    /// The data source to operate upon, snapshotted as an owned sequence.
    source: Vec<T>,
    slots: Vec<StageSlot>,
    links: Vec<Link>,
    terminal: Option<TerminalSlot>,
    frozen: bool,
    control: Rc<RefCell<RunControl>>,
}

impl<T: Clone + 'static> LazyPipeline<T> {
    /// Build a pipeline over a snapshot of `source`.
    pub fn from(source: impl IntoIterator<Item = T>) -> Self {
        Self {
            source: source.into_iter().collect(),
            slots: vec![StageSlot::new(Box::new(SourceStage))],
            links: vec![Link::Terminal],
            terminal: None,
            frozen: false,
            control: Rc::new(RefCell::new(RunControl::default())),
        }
    }

    /// Append an intermediate stage to the chain.
    ///
    /// Fails with [`PipelineError::FrozenPipeline`] once the pipeline is
    /// frozen (implicitly after a run, or explicitly via
    /// [`freeze`](Self::freeze)). Returns `&mut Self` for chaining.
    pub fn add<A: 'static, B: 'static>(
        &mut self,
        handle: IntermediateHandle<A, B>,
    ) -> PipelineResult<&mut Self> {
        if self.frozen {
            return Err(PipelineError::FrozenPipeline);
        }

        let id = StageId(self.slots.len() as u32);
        let mut slot = StageSlot::new(handle.stage);
        slot.channel.subscribe(self.watcher());

        // Wire the current tail (slot 0 on the very first add) to the new stage.
        let tail = self.links.len() - 1;
        self.links[tail] = Link::Stage(id);
        self.slots.push(slot);
        self.links.push(Link::Terminal);
        Ok(self)
    }

    /// Run the pipeline into `terminal` and return its result.
    ///
    /// Feeds each source element through the chain in order, flagging every
    /// element except the last as having more upstream data, and stopping
    /// early once a `TerminatePipeline` event lands. Afterwards the pipeline
    /// is frozen and terminated.
    pub fn collect<A: 'static, R: 'static>(
        &mut self,
        terminal: TerminalHandle<A, R>,
    ) -> PipelineResult<R> {
        if self.control.borrow().terminated {
            return Err(PipelineError::AlreadyConsumed);
        }

        let tail = self.links.len() - 1;
        self.links[tail] = Link::Terminal;

        let mut terminal = TerminalSlot {
            stage: terminal.stage,
            channel: EventChannel::new(),
        };
        terminal.channel.subscribe(self.watcher());

        tracing::debug!(
            elements = self.source.len(),
            stages = self.slots.len() - 1,
            "starting pipeline collection"
        );

        let fed = self.feed_source(&mut terminal);
        let finished = match fed {
            Ok(()) => {
                self.frozen = true;
                self.control.borrow_mut().terminated = true;
                terminal.stage.finish()
            }
            Err(err) => Err(err),
        };
        // Stored regardless of outcome so resume can clear its listeners.
        self.terminal = Some(terminal);
        downcast::<R>(finished?)
    }

    /// Sugar for [`collect`](Self::collect) with a `Vec` collector over the
    /// source element type.
    ///
    /// Runtime storage is type-erased, so this sugar cannot follow a stage
    /// that changes the element type; such chains fail with
    /// [`PipelineError::ElementType`] and should collect explicitly through
    /// `collect(to_vec::<U>())` with the final output type.
    pub fn to_vec(&mut self) -> PipelineResult<Vec<T>> {
        self.collect(to_vec::<T>())
    }

    /// Restore the pipeline so it can be driven again: clears the terminated
    /// flag, drops the stored terminal's event subscribers, re-links every
    /// stage into a straight chain (undoing detach splices), and resumes
    /// every stage. Does not unfreeze.
    pub fn resume(&mut self) {
        {
            let mut control = self.control.borrow_mut();
            control.terminated = false;
            control.pending_detaches.clear();
        }
        if let Some(terminal) = &mut self.terminal {
            terminal.channel.remove_all_listeners();
        }
        self.relink();
        for slot in &mut self.slots[1..] {
            slot.detached = false;
            slot.stage.resume();
        }
        if let Some(terminal) = &mut self.terminal {
            terminal.stage.resume();
        }
        tracing::trace!("pipeline resumed");
    }

    /// Replace the owned source snapshot. Stage wiring and lifecycle flags
    /// are untouched.
    pub fn read_from(&mut self, new_source: impl IntoIterator<Item = T>) {
        self.source = new_source.into_iter().collect();
    }

    /// Prevent further [`add`](Self::add) calls.
    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    /// Permit [`add`](Self::add) calls again.
    pub fn unfreeze(&mut self) {
        self.frozen = false;
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    pub fn is_terminated(&self) -> bool {
        self.control.borrow().terminated
    }

    /// Number of intermediate stages added so far.
    pub fn stage_count(&self) -> usize {
        self.slots.len() - 1
    }

    // ── Event watcher ──

    fn watcher(&self) -> EventListener {
        let control = Rc::clone(&self.control);
        Box::new(move |event, origin| {
            let mut control = control.borrow_mut();
            match event {
                PipelineEvent::TerminatePipeline => control.terminated = true,
                PipelineEvent::StageDetached => control.pending_detaches.push(origin),
            }
        })
    }

    // ── Feed loop ──

    fn feed_source(&mut self, terminal: &mut TerminalSlot) -> PipelineResult<()> {
        let total = self.source.len();
        for index in 0..total {
            if self.control.borrow().terminated {
                tracing::debug!(fed = index, total, "pipeline terminated early");
                return Ok(());
            }
            let element: Element = Box::new(self.source[index].clone());
            self.dispatch(
                Link::Stage(StageId::SOURCE),
                element,
                index != total - 1,
                terminal,
            )?;
        }
        Ok(())
    }

    /// Deliver one element to `link`, then apply the stage's recorded
    /// effects: detachment, downstream forwards (depth-first), event
    /// broadcasts, splices, and cascades, in that order, so forwarded
    /// elements reach the sink before the events they precede.
    fn dispatch(
        &mut self,
        link: Link,
        element: Element,
        has_more_upstream: bool,
        terminal: &mut TerminalSlot,
    ) -> PipelineResult<()> {
        match link {
            Link::Stage(id) => {
                let mut ctx = StageContext::new();
                self.slots[id.index()]
                    .stage
                    .consume(element, has_more_upstream, &mut ctx)?;
                self.settle(id, ctx, terminal)
            }
            Link::Terminal => {
                let mut ctx = StageContext::new();
                terminal
                    .stage
                    .consume(element, has_more_upstream, &mut ctx)?;
                for event in ctx.events.drain(..) {
                    terminal.channel.broadcast(event, StageId::TERMINAL);
                }
                // A terminal raising StageDetached is caught here.
                self.apply_pending_detaches()
            }
        }
    }

    fn settle(
        &mut self,
        id: StageId,
        mut ctx: StageContext,
        terminal: &mut TerminalSlot,
    ) -> PipelineResult<()> {
        let index = id.index();
        if ctx.detach_requested {
            self.slots[index].detached = true;
        }

        let next = self.links[index];
        for (element, has_more) in ctx.outputs.drain(..) {
            self.dispatch(next, element, has_more, terminal)?;
        }
        for event in ctx.events.drain(..) {
            self.slots[index].channel.broadcast(event, id);
        }
        self.apply_pending_detaches()?;
        for event in ctx.cascades.drain(..) {
            self.cascade_from(id, event, terminal)?;
        }
        Ok(())
    }

    // ── Detach splicing ──

    fn apply_pending_detaches(&mut self) -> PipelineResult<()> {
        let pending: Vec<StageId> = {
            let mut control = self.control.borrow_mut();
            if control.pending_detaches.is_empty() {
                return Ok(());
            }
            control.pending_detaches.drain(..).collect()
        };
        for origin in pending {
            self.splice_out(origin)?;
        }
        Ok(())
    }

    /// Excise `origin` from the live chain: the nearest non-detached
    /// predecessor is re-wired directly to the nearest non-detached
    /// successor, or to the terminal if none remains. The arena itself is
    /// untouched so `resume` can re-link.
    fn splice_out(&mut self, origin: StageId) -> PipelineResult<()> {
        let index = origin.index();
        if origin.is_terminal() || index == 0 || index >= self.slots.len() {
            return Err(PipelineError::InvalidDetachSource(origin));
        }

        let mut before = index - 1;
        while before > 0 && self.slots[before].detached {
            before -= 1;
        }
        let mut after = Link::Terminal;
        for candidate in index + 1..self.slots.len() {
            if !self.slots[candidate].detached {
                after = Link::Stage(StageId(candidate as u32));
                break;
            }
        }

        tracing::debug!(stage = ?origin, ?after, "splicing detached stage out of the live chain");
        self.links[before] = after;
        Ok(())
    }

    // ── Cascades ──

    /// Walk the live chain downstream of `origin`, offering `event` to each
    /// remaining intermediate stage and forwarding whatever it emits in
    /// response (buffering stages flush here when a run ends early).
    fn cascade_from(
        &mut self,
        origin: StageId,
        event: PipelineEvent,
        terminal: &mut TerminalSlot,
    ) -> PipelineResult<()> {
        let mut cursor = self.links[origin.index()];
        while let Link::Stage(id) = cursor {
            let index = id.index();
            let mut ctx = StageContext::new();
            self.slots[index].stage.on_cascade(event, &mut ctx)?;

            if ctx.detach_requested {
                self.slots[index].detached = true;
            }
            let next = self.links[index];
            for (element, has_more) in ctx.outputs.drain(..) {
                self.dispatch(next, element, has_more, terminal)?;
            }
            for broadcast in ctx.events.drain(..) {
                self.slots[index].channel.broadcast(broadcast, id);
            }
            self.apply_pending_detaches()?;
            cursor = self.links[index];
        }
        Ok(())
    }

    // ── Re-linking ──

    /// Rebuild the straight chain in arena order, ending at the terminal.
    fn relink(&mut self) {
        let count = self.slots.len();
        for index in 0..count - 1 {
            self.links[index] = Link::Stage(StageId((index + 1) as u32));
        }
        self.links[count - 1] = Link::Terminal;
    }
}

impl<T> std::fmt::Debug for LazyPipeline<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LazyPipeline")
            .field("source_len", &self.source.len())
            .field("stages", &(self.slots.len() - 1))
            .field("frozen", &self.frozen)
            .field("terminated", &self.control.borrow().terminated)
            .finish()
    }
}

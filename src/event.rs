//! Control events and the per-stage publish/subscribe channel.
//!
//! Every stage owns an [`EventChannel`]; the pipeline subscribes its internal
//! watcher to each stage it wires up. Broadcasting is synchronous and
//! in-process with no queuing: listeners run in subscription order before
//! `broadcast` returns.

use crate::id::StageId;

/// The closed set of control signals a stage may broadcast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineEvent {
    /// Stop feeding further source elements and return the result.
    TerminatePipeline,
    /// The broadcasting stage has detached itself and must be spliced out
    /// of the live forwarding chain for the remainder of the run.
    StageDetached,
}

/// A registered event listener. Receives the event and the originating stage.
pub type EventListener = Box<dyn FnMut(PipelineEvent, StageId)>;

/// An ordered list of listeners attached to one stage.
#[derive(Default)]
pub struct EventChannel {
    listeners: Vec<EventListener>,
}

impl EventChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener for every subsequent broadcast on this channel.
    pub fn subscribe(&mut self, listener: EventListener) {
        self.listeners.push(listener);
    }

    /// Notify all listeners of `event`, in subscription order.
    /// Broadcasting with no subscribers is a no-op.
    pub fn broadcast(&mut self, event: PipelineEvent, origin: StageId) {
        for listener in &mut self.listeners {
            listener(event, origin);
        }
    }

    /// Drop every registered listener.
    pub fn remove_all_listeners(&mut self) {
        self.listeners.clear();
    }

    pub fn subscriber_count(&self) -> usize {
        self.listeners.len()
    }
}

impl std::fmt::Debug for EventChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventChannel")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

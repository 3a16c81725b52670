//! Streaming bridge between a running turn and a consumer.
//!
//! [`spawn_turn`] runs the loop on a worker task and hands back a receiver
//! that yields every event in emission order, followed by exactly one
//! [`StreamItem::End`]. The consumer never waits for the whole turn before
//! seeing the first event.

use std::sync::Arc;

use agentdev_core::event::{AgentEvent, EventSink};
use serde::Serialize;
use tokio::sync::mpsc;
use tracing::error;

use crate::history::History;
use crate::loop_runner::{AgentLoop, RunReport};

/// One item on a turn's stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "content", rename_all = "snake_case")]
pub enum StreamItem {
    Event(AgentEvent),
    /// Always last. `None` when the worker died before producing a report.
    End(Option<RunReport>),
}

impl StreamItem {
    /// SSE event name for this item.
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::Event(event) => event.event_type(),
            Self::End(_) => "end",
        }
    }
}

/// An [`EventSink`] that forwards into an unbounded channel.
///
/// Send errors mean the consumer went away; the turn keeps running and its
/// events are dropped.
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<StreamItem>,
}

impl ChannelSink {
    pub fn new(tx: mpsc::UnboundedSender<StreamItem>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelSink {
    fn emit(&self, event: AgentEvent) {
        let _ = self.tx.send(StreamItem::Event(event));
    }
}

/// Run one turn on a background task and stream its events.
pub fn spawn_turn(
    agent: Arc<AgentLoop>,
    goal: impl Into<String>,
    history: History,
) -> mpsc::UnboundedReceiver<StreamItem> {
    let (tx, rx) = mpsc::unbounded_channel();
    let goal = goal.into();

    let worker_tx = tx.clone();
    let worker = tokio::spawn(async move {
        let sink = ChannelSink::new(worker_tx);
        agent.run(&goal, history, &sink).await
    });

    // The supervisor owns the end marker so it is sent even if the worker panics.
    tokio::spawn(async move {
        let end = match worker.await {
            Ok(report) => Some(report),
            Err(e) => {
                error!(error = %e, "Agent turn aborted");
                let _ = tx.send(StreamItem::Event(AgentEvent::Error(format!(
                    "An unexpected error occurred: {e}"
                ))));
                None
            }
        };
        let _ = tx.send(StreamItem::End(end));
    });

    rx
}

//! Agent events: what the loop tells the outside world while it runs.
//!
//! Every event is a `{type, content}` record. Events are handed to an
//! [`EventSink`] the moment they happen and are not retained afterwards.

use serde::{Deserialize, Serialize};
use std::sync::Mutex;

/// A single observable step of a running turn.
///
/// Serializes as `{"type": "<kind>", "content": "<display text>"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "content", rename_all = "snake_case")]
pub enum AgentEvent {
    /// The planner's reasoning for this round.
    Thought(String),
    /// A thought that opens with a goal classification.
    Classification(String),
    /// Loop status: missing tool, finish, budget exhaustion.
    Status(String),
    /// A tool is about to run.
    Action(String),
    /// A tool's output, or the clarifying question.
    Result(String),
    /// A recoverable failure.
    Error(String),
}

impl AgentEvent {
    /// Wire name of this event type.
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::Thought(_) => "thought",
            Self::Classification(_) => "classification",
            Self::Status(_) => "status",
            Self::Action(_) => "action",
            Self::Result(_) => "result",
            Self::Error(_) => "error",
        }
    }

    pub fn content(&self) -> &str {
        match self {
            Self::Thought(c)
            | Self::Classification(c)
            | Self::Status(c)
            | Self::Action(c)
            | Self::Result(c)
            | Self::Error(c) => c,
        }
    }
}

/// Receiver of agent events.
///
/// `emit` must not block: the loop calls it inline between rounds.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: AgentEvent);
}

/// Discards every event.
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&self, _event: AgentEvent) {}
}

/// Collects events in emission order.
#[derive(Default)]
pub struct EventLog {
    events: Mutex<Vec<AgentEvent>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything emitted so far.
    pub fn events(&self) -> Vec<AgentEvent> {
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn into_events(self) -> Vec<AgentEvent> {
        self.events.into_inner().unwrap_or_else(|e| e.into_inner())
    }
}

impl EventSink for EventLog {
    fn emit(&self, event: AgentEvent) {
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(event);
    }
}

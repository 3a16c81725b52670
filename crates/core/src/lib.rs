//! # AgentDev Core
//!
//! Domain types, traits, and error definitions for the AgentDev coding agent.
//! This crate has **zero framework dependencies**: it defines the domain model
//! that all other crates implement against.
//!
//! ## Design Philosophy
//!
//! Every subsystem is defined as a trait here. Implementations live in their
//! respective crates. This enables:
//! - Swapping planners via configuration
//! - Easy testing with scripted planners and stub tools
//! - Clean dependency graph (all crates depend inward on core)

pub mod error;
pub mod event;
pub mod planner;
pub mod tool;

// Re-export key types at crate root for ergonomics
pub use error::{Error, PlannerError, Result, ToolError};
pub use event::{AgentEvent, EventLog, EventSink, NullSink};
pub use planner::Planner;
pub use tool::{ParamSpec, ParamType, Tool, ToolCall, ToolDefinition, ToolKind, ToolRegistry};

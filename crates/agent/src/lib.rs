//! The agent loop for AgentDev.
//!
//! The agent follows a **Plan → Act → Observe** cycle:
//!
//! 1. **Encode** the goal, the history so far and the tool docs into a prompt
//! 2. **Plan**: send the prompt to the configured planner
//! 3. **Decode** the reply into a thought and an optional tool call
//! 4. **Act**: run the tool inside the project sandbox
//! 5. **Observe**: append the result to the history and loop back to step 1
//!
//! The loop ends when the planner calls `finish`, asks the user a question,
//! or the round budget runs out.

pub mod codec;
pub mod history;
pub mod loop_runner;
pub mod session;
pub mod stream_event;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use codec::{DEFAULT_TEMPLATE, DecodeError, Decision, PromptTemplate, decode, encode};
pub use history::History;
pub use loop_runner::{AgentLoop, DEFAULT_MAX_ROUNDS, Outcome, RunReport};
pub use session::Session;
pub use stream_event::{ChannelSink, StreamItem, spawn_turn};

//! The orchestration loop: plan, decode, dispatch, observe.
//!
//! One run is a sequence of rounds. Each round renders the prompt, calls the
//! planner once, decodes the reply and dispatches the chosen tool. Only three
//! things end a run: the `finish` tool, the clarification tool, or the round
//! budget. Every other failure (transport, malformed reply, unknown tool,
//! tool error) becomes a history entry the next round can react to.

use std::sync::Arc;

use agentdev_core::event::{AgentEvent, EventSink};
use agentdev_core::planner::Planner;
use agentdev_core::tool::{ToolCall, ToolKind, ToolRegistry};
use agentdev_tools::{DEFAULT_FINISH_REASON, finish_status};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::codec::{self, DecodeError, PromptTemplate};
use crate::history::History;

/// Default round budget per turn.
pub const DEFAULT_MAX_ROUNDS: u32 = 10;

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    /// The planner called `finish`.
    Finished { reason: String },
    /// The planner asked the user a question; the turn is over.
    Clarification { question: String },
    /// The round budget ran out without a terminal tool.
    BudgetExhausted { rounds: u32 },
}

/// Everything a finished run hands back to its caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    pub outcome: Outcome,
    /// The full history, including any seeded entries.
    pub history: History,
    /// Planner calls made.
    pub rounds: u32,
}

/// Result of a single round.
enum RoundOutcome {
    Continue,
    Finished(String),
    Clarification(String),
}

/// The core agent loop that orchestrates planner calls and tool execution.
pub struct AgentLoop {
    planner: Arc<dyn Planner>,
    tools: Arc<ToolRegistry>,
    template: PromptTemplate,
    max_rounds: u32,
}

impl AgentLoop {
    pub fn new(planner: Arc<dyn Planner>, tools: Arc<ToolRegistry>) -> Self {
        Self {
            planner,
            tools,
            template: PromptTemplate::default(),
            max_rounds: DEFAULT_MAX_ROUNDS,
        }
    }

    /// Set the round budget. Values below 1 are raised to 1.
    pub fn with_max_rounds(mut self, max_rounds: u32) -> Self {
        self.max_rounds = max_rounds.max(1);
        self
    }

    pub fn with_template(mut self, template: PromptTemplate) -> Self {
        self.template = template;
        self
    }

    pub fn max_rounds(&self) -> u32 {
        self.max_rounds
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// Run one turn toward `goal`, starting from `history`.
    ///
    /// Events are emitted to `sink` as they happen. Never fails: everything
    /// short of a terminal condition is folded into the history.
    pub async fn run(&self, goal: &str, mut history: History, sink: &dyn EventSink) -> RunReport {
        let tool_docs = self.tools.render_docs();
        info!(
            planner = %self.planner.name(),
            max_rounds = self.max_rounds,
            seeded = history.len(),
            "Starting turn"
        );

        for round in 1..=self.max_rounds {
            debug!(round, "Planning");
            let prompt = self.template.render(goal, &history.render(), &tool_docs);

            let outcome = match self.planner.plan(&prompt).await {
                Ok(reply) => self.dispatch(round, &reply, &mut history, sink).await,
                Err(e) => {
                    warn!(round, error = %e, "Planner call failed");
                    sink.emit(AgentEvent::Error(format!("An unexpected error occurred: {e}")));
                    history.push_result(&format!("Error - {e}"));
                    RoundOutcome::Continue
                }
            };

            match outcome {
                RoundOutcome::Continue => {}
                RoundOutcome::Finished(reason) => {
                    info!(round, "Turn finished");
                    return RunReport {
                        outcome: Outcome::Finished { reason },
                        history,
                        rounds: round,
                    };
                }
                RoundOutcome::Clarification(question) => {
                    info!(round, "Turn ended with a clarifying question");
                    return RunReport {
                        outcome: Outcome::Clarification { question },
                        history,
                        rounds: round,
                    };
                }
            }
        }

        warn!(rounds = self.max_rounds, "Round budget exhausted");
        sink.emit(AgentEvent::Status(format!(
            "Round budget exhausted after {} rounds without finishing.",
            self.max_rounds
        )));
        RunReport {
            outcome: Outcome::BudgetExhausted {
                rounds: self.max_rounds,
            },
            history,
            rounds: self.max_rounds,
        }
    }

    /// Decode one planner reply and act on it.
    async fn dispatch(
        &self,
        round: u32,
        reply: &str,
        history: &mut History,
        sink: &dyn EventSink,
    ) -> RoundOutcome {
        let reply = reply.trim();
        let decision = match codec::decode(reply) {
            Ok(decision) => decision,
            Err(DecodeError::NoJson { raw }) => {
                debug!(round, "Planner reply contained no JSON");
                sink.emit(AgentEvent::Thought(format!(
                    "Agent responded with non-JSON: {raw}"
                )));
                history.push_result(&format!(
                    "Agent returned a non-actionable response: {raw}"
                ));
                return RoundOutcome::Continue;
            }
            Err(DecodeError::InvalidJson { raw, reason }) => {
                warn!(round, %reason, "Planner reply was not valid JSON");
                sink.emit(AgentEvent::Error(format!(
                    "Failed to decode JSON from model response: {reason}\nResponse was:\n{raw}"
                )));
                history.push_result("Error - Invalid JSON in response.");
                return RoundOutcome::Continue;
            }
        };

        if decision
            .thought
            .to_ascii_lowercase()
            .starts_with("classification:")
        {
            sink.emit(AgentEvent::Classification(decision.thought.clone()));
        } else {
            sink.emit(AgentEvent::Thought(decision.thought.clone()));
        }
        history.push_thought(&decision.thought);

        let Some(tool_name) = decision.tool_name else {
            sink.emit(AgentEvent::Status("Agent did not specify a tool.".into()));
            history.push_result("Agent did not specify a tool.");
            return RoundOutcome::Continue;
        };

        let tool = match self.tools.lookup(&tool_name) {
            Ok(tool) => tool,
            Err(e) => {
                warn!(round, tool = %tool_name, "Planner chose an unknown tool");
                let result = format!("Error: {e}");
                sink.emit(AgentEvent::Error(result.clone()));
                history.push_result(&result);
                return RoundOutcome::Continue;
            }
        };

        let call = ToolCall {
            name: tool_name,
            arguments: decision.arguments,
        };

        match tool.kind() {
            ToolKind::Finish => {
                // Any finish call ends the run. A missing or non-string
                // reason falls back to the default.
                let reason = call
                    .arguments
                    .get("reason")
                    .and_then(|r| r.as_str())
                    .map(str::trim)
                    .filter(|r| !r.is_empty())
                    .unwrap_or(DEFAULT_FINISH_REASON)
                    .to_string();
                history.push_action(&call.name, &call.arguments);
                sink.emit(AgentEvent::Status(finish_status(&reason)));
                RoundOutcome::Finished(reason)
            }
            ToolKind::Clarify => match self.tools.execute(&call).await {
                Ok(question) => {
                    sink.emit(AgentEvent::Result(question.clone()));
                    RoundOutcome::Clarification(question)
                }
                Err(e) => {
                    self.record_failure(round, &call, &e.to_string(), history, sink);
                    RoundOutcome::Continue
                }
            },
            ToolKind::Ordinary => {
                history.push_action(&call.name, &call.arguments);
                sink.emit(AgentEvent::Action(format!(
                    "Running tool: {} with arguments: {}",
                    call.name, call.arguments
                )));
                info!(round, tool = %call.name, "Dispatching tool");

                match self.tools.execute(&call).await {
                    Ok(result) => {
                        sink.emit(AgentEvent::Result(result.clone()));
                        history.push_result(&result);
                    }
                    Err(e) => {
                        warn!(round, tool = %call.name, error = %e, "Tool failed");
                        sink.emit(AgentEvent::Error(e.to_string()));
                        history.push_result(&format!("Error - {e}"));
                    }
                }
                RoundOutcome::Continue
            }
        }
    }

    /// A clarification call whose arguments were rejected is recorded like
    /// an ordinary failed action so the planner can correct it.
    fn record_failure(
        &self,
        round: u32,
        call: &ToolCall,
        error: &str,
        history: &mut History,
        sink: &dyn EventSink,
    ) {
        warn!(round, tool = %call.name, %error, "Tool failed");
        history.push_action(&call.name, &call.arguments);
        sink.emit(AgentEvent::Error(error.to_string()));
        history.push_result(&format!("Error - {error}"));
    }
}

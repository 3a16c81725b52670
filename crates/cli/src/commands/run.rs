//! `agentdev run`: drive one turn and stream its events to stdout.

use std::path::PathBuf;
use std::sync::Arc;

use agentdev_agent::{History, Outcome, Session, StreamItem, spawn_turn};
use agentdev_core::Error;
use agentdev_core::event::AgentEvent;

/// Exit status for a turn that ended with a clarifying question.
pub const EXIT_CLARIFICATION: i32 = 2;
/// Exit status for a turn that ran out of rounds.
pub const EXIT_BUDGET_EXHAUSTED: i32 = 3;
/// Exit status when the turn died without a report.
pub const EXIT_ABORTED: i32 = 1;

pub async fn run(
    goal: String,
    root: Option<PathBuf>,
    max_rounds: Option<u32>,
    json: bool,
) -> agentdev_core::Result<i32> {
    let config = super::load_config()?;
    let root = super::project_root(root, config.sandbox.root.clone())?;
    let max_rounds = max_rounds.unwrap_or(config.agent.max_rounds);
    if max_rounds == 0 {
        return Err(Error::config("--max-rounds must be at least 1"));
    }

    let planner = agentdev_providers::build_from_config(&config)?;
    let session = Session::open(&root, planner).map_err(super::invalid_root)?;
    tracing::info!(root = %session.root().display(), max_rounds, "Running turn");

    let agent = Arc::new(session.agent(max_rounds));
    let mut rx = spawn_turn(agent, goal, History::new());

    let mut code = EXIT_ABORTED;
    while let Some(item) = rx.recv().await {
        match item {
            StreamItem::Event(event) => {
                if json {
                    println!("{}", serde_json::to_string(&event)?);
                } else {
                    println!("{}", render_event(&event));
                }
            }
            StreamItem::End(report) => {
                if let Some(report) = report {
                    if json {
                        println!("{}", serde_json::to_string(&report)?);
                    }
                    code = exit_code(&report.outcome);
                }
            }
        }
    }

    Ok(code)
}

/// Process exit status for a finished turn.
pub fn exit_code(outcome: &Outcome) -> i32 {
    match outcome {
        Outcome::Finished { .. } => 0,
        Outcome::Clarification { .. } => EXIT_CLARIFICATION,
        Outcome::BudgetExhausted { .. } => EXIT_BUDGET_EXHAUSTED,
    }
}

/// One human-readable line (or block) per event.
fn render_event(event: &AgentEvent) -> String {
    match event {
        AgentEvent::Thought(text) => format!("[thought] {text}"),
        AgentEvent::Classification(text) => format!("[classification] {text}"),
        AgentEvent::Status(text) => format!("[status] {text}"),
        AgentEvent::Action(text) => format!("[action] {text}"),
        AgentEvent::Result(text) => format!("[result]\n{}", indent(text)),
        AgentEvent::Error(text) => format!("[error] {text}"),
    }
}

fn indent(text: &str) -> String {
    text.lines()
        .map(|line| format!("    {line}"))
        .collect::<Vec<_>>()
        .join("\n")
}

//! Terminal tools. The loop recognizes these by [`ToolKind`] and ends the
//! session or the turn instead of folding a result into history.

use agentdev_core::error::ToolError;
use agentdev_core::tool::{ParamSpec, ParamType, Tool, ToolKind, parse_arguments};
use async_trait::async_trait;
use serde::Deserialize;

/// Default summary when `finish` is called without a reason.
pub const DEFAULT_FINISH_REASON: &str = "Task completed.";

/// The status line shown to the user when the agent finishes.
pub fn finish_status(reason: &str) -> String {
    format!("Agent has finished the task. {reason}")
}

pub struct FinishTool;

#[derive(Deserialize)]
struct FinishArgs {
    #[serde(default)]
    reason: Option<String>,
}

#[async_trait]
impl Tool for FinishTool {
    fn name(&self) -> &str {
        "finish"
    }

    fn description(&self) -> &str {
        "Call this when the goal is fully achieved. The reason is shown to the user as the summary of what was done."
    }

    fn parameters(&self) -> Vec<ParamSpec> {
        vec![ParamSpec::optional(
            "reason",
            ParamType::String,
            "Summary of what was done",
        )]
    }

    fn kind(&self) -> ToolKind {
        ToolKind::Finish
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<String, ToolError> {
        let args: FinishArgs = parse_arguments(self.name(), arguments)?;
        let reason = args
            .reason
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty())
            .unwrap_or_else(|| DEFAULT_FINISH_REASON.into());
        Ok(finish_status(&reason))
    }
}

pub struct AskUserTool;

#[derive(Deserialize)]
struct AskArgs {
    question: String,
}

#[async_trait]
impl Tool for AskUserTool {
    fn name(&self) -> &str {
        "ask_user_for_clarification"
    }

    fn description(&self) -> &str {
        "Ask the user a question when the goal is ambiguous or you are greeted. Ends this turn; the answer arrives in a new turn."
    }

    fn parameters(&self) -> Vec<ParamSpec> {
        vec![ParamSpec::required(
            "question",
            ParamType::String,
            "The question to show the user",
        )]
    }

    fn kind(&self) -> ToolKind {
        ToolKind::Clarify
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<String, ToolError> {
        let args: AskArgs = parse_arguments(self.name(), arguments)?;
        Ok(args.question)
    }
}

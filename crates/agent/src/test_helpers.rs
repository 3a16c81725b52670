//! Shared test helpers for the loop and bridge tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use agentdev_core::error::PlannerError;
use agentdev_core::planner::Planner;
use agentdev_core::tool::ToolRegistry;
use agentdev_sandbox::Sandbox;

/// A planner that replays a scripted sequence of replies.
///
/// Each call to `plan` pops the next reply and records the prompt it was
/// given. Panics if more calls are made than replies provided.
pub struct ScriptedPlanner {
    replies: Mutex<VecDeque<Result<String, PlannerError>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedPlanner {
    pub fn new(replies: Vec<String>) -> Self {
        Self::with_results(replies.into_iter().map(Ok).collect())
    }

    pub fn with_results(replies: Vec<Result<String, PlannerError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Planner for ScriptedPlanner {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn plan(&self, prompt: &str) -> Result<String, PlannerError> {
        let mut prompts = self.prompts.lock().unwrap();
        prompts.push(prompt.to_string());
        let call = prompts.len();
        drop(prompts);

        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("ScriptedPlanner: no more replies (call #{call})"))
    }
}

/// A well-formed planner reply choosing `tool` with `arguments`.
pub fn action(thought: &str, tool: &str, arguments: serde_json::Value) -> String {
    serde_json::json!({
        "thought": thought,
        "action": {"tool_name": tool, "arguments": arguments},
    })
    .to_string()
}

/// The default tool registry over a fresh temporary project.
pub fn sandbox_registry() -> (tempfile::TempDir, Arc<ToolRegistry>) {
    let dir = tempfile::tempdir().unwrap();
    let sandbox = Arc::new(Sandbox::new(dir.path()).unwrap());
    (dir, Arc::new(agentdev_tools::default_registry(sandbox)))
}

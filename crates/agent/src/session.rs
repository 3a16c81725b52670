//! A working session over one project directory.

use std::path::Path;
use std::sync::Arc;

use agentdev_core::planner::Planner;
use agentdev_core::tool::ToolRegistry;
use agentdev_sandbox::{Sandbox, SandboxError};

use crate::loop_runner::AgentLoop;

/// Binds a planner to a sandboxed project and its tool registry.
///
/// Nothing is shared between sessions: each one owns its sandbox root.
pub struct Session {
    sandbox: Arc<Sandbox>,
    tools: Arc<ToolRegistry>,
    planner: Arc<dyn Planner>,
}

impl Session {
    /// Open a session rooted at `root`, which must be an existing directory.
    pub fn open(root: impl AsRef<Path>, planner: Arc<dyn Planner>) -> Result<Self, SandboxError> {
        let sandbox = Arc::new(Sandbox::new(root)?);
        let tools = Arc::new(agentdev_tools::default_registry(sandbox.clone()));
        tracing::debug!(root = %sandbox.root().display(), tools = tools.len(), "Session opened");
        Ok(Self {
            sandbox,
            tools,
            planner,
        })
    }

    pub fn root(&self) -> &Path {
        self.sandbox.root()
    }

    pub fn sandbox(&self) -> &Arc<Sandbox> {
        &self.sandbox
    }

    pub fn tools(&self) -> &Arc<ToolRegistry> {
        &self.tools
    }

    /// Build a loop over this session's planner and tools.
    pub fn agent(&self, max_rounds: u32) -> AgentLoop {
        AgentLoop::new(self.planner.clone(), self.tools.clone()).with_max_rounds(max_rounds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::History;
    use crate::loop_runner::Outcome;
    use crate::test_helpers::{ScriptedPlanner, action};
    use agentdev_core::event::NullSink;

    #[test]
    fn open_rejects_missing_root() {
        let dir = tempfile::tempdir().unwrap();
        let planner = Arc::new(ScriptedPlanner::new(vec![]));
        let result = Session::open(dir.path().join("nope"), planner);
        assert!(matches!(result, Err(SandboxError::RootUnavailable { .. })));
    }

    #[test]
    fn open_registers_default_tools() {
        let dir = tempfile::tempdir().unwrap();
        let session = Session::open(dir.path(), Arc::new(ScriptedPlanner::new(vec![]))).unwrap();
        assert_eq!(session.root(), dir.path().canonicalize().unwrap());
        assert!(session.tools().get("finish").is_some());
        assert_eq!(session.tools().len(), 9);
    }

    #[tokio::test]
    async fn sessions_do_not_share_roots() {
        let a = tempfile::tempdir().unwrap();
        let b = tempfile::tempdir().unwrap();
        let write = |tag: &str| {
            vec![
                action(
                    "write",
                    "write_file",
                    serde_json::json!({"file_path": "note.txt", "content": tag}),
                ),
                action("done", "finish", serde_json::json!({})),
            ]
        };

        for (dir, tag) in [(&a, "a"), (&b, "b")] {
            let planner = Arc::new(ScriptedPlanner::new(write(tag)));
            let session = Session::open(dir.path(), planner).unwrap();
            let report = session.agent(5).run("note", History::new(), &NullSink).await;
            assert!(matches!(report.outcome, Outcome::Finished { .. }));
        }

        assert_eq!(std::fs::read_to_string(a.path().join("note.txt")).unwrap(), "a");
        assert_eq!(std::fs::read_to_string(b.path().join("note.txt")).unwrap(), "b");
    }
}

//! Built-in tool implementations for AgentDev.
//!
//! Tools are the only way the agent acts on a project: list, read and edit
//! files inside the sandbox, outline source files, or end the turn. Every
//! file tool holds the session's [`Sandbox`] and routes each path through it.

pub mod analyze_code_structure;
pub mod list_files;
pub mod project_summary;
pub mod read_file;
pub mod replace_block;
pub mod search_and_replace;
pub mod terminal;
pub mod write_file;

use std::sync::Arc;

use agentdev_core::tool::ToolRegistry;
use agentdev_sandbox::Sandbox;

pub use terminal::{DEFAULT_FINISH_REASON, finish_status};

/// Create the registry of built-in tools for one sandbox session.
///
/// Registration order is the order the tools appear in the planning prompt.
pub fn default_registry(sandbox: Arc<Sandbox>) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(Box::new(project_summary::ProjectSummaryTool::new(sandbox.clone())));
    registry.register(Box::new(list_files::ListFilesTool::new(sandbox.clone())));
    registry.register(Box::new(read_file::ReadFileTool::new(sandbox.clone())));
    registry.register(Box::new(analyze_code_structure::AnalyzeCodeStructureTool::new(
        sandbox.clone(),
    )));
    registry.register(Box::new(write_file::WriteFileTool::new(sandbox.clone())));
    registry.register(Box::new(search_and_replace::SearchAndReplaceTool::new(
        sandbox.clone(),
    )));
    registry.register(Box::new(replace_block::ReplaceBlockTool::new(sandbox)));
    registry.register(Box::new(terminal::AskUserTool));
    registry.register(Box::new(terminal::FinishTool));
    registry
}


#[cfg(test)]
mod tests {
    use super::*;
    use agentdev_core::tool::{ToolCall, ToolKind};

    #[test]
    fn registry_has_closed_tool_set() {
        let (_dir, sandbox) = test_support::sandbox();
        let registry = default_registry(sandbox);
        assert_eq!(
            registry.names(),
            vec![
                "get_project_summary",
                "list_files",
                "read_file",
                "analyze_code_structure",
                "write_file",
                "search_and_replace",
                "replace_block",
                "ask_user_for_clarification",
                "finish",
            ]
        );
        assert_eq!(registry.lookup("finish").unwrap().kind(), ToolKind::Finish);
        assert_eq!(
            registry.lookup("ask_user_for_clarification").unwrap().kind(),
            ToolKind::Clarify
        );
    }

    #[test]
    fn docs_name_parameters_exactly() {
        let (_dir, sandbox) = test_support::sandbox();
        let docs = default_registry(sandbox).render_docs();
        assert!(docs.contains("write_file(file_path: string, content: string): "));
        assert!(docs.contains(
            "replace_block(file_path: string, start_line: integer, end_line: integer, new_content: string): "
        ));
        assert!(docs.contains("get_project_summary(): "));
        assert_eq!(docs.lines().count(), 9);
    }

    #[tokio::test]
    async fn registry_rejects_wrong_keys_before_running() {
        let (dir, sandbox) = test_support::sandbox();
        let registry = default_registry(sandbox);
        let call = ToolCall {
            name: "write_file".into(),
            arguments: serde_json::json!({"path": "a.txt", "content": "x"}),
        };
        assert!(registry.execute(&call).await.is_err());
        assert!(!dir.path().join("a.txt").exists());
    }
}

//! Project summary tool: the whole sandbox tree in one fenced block.

use std::sync::Arc;

use agentdev_core::error::ToolError;
use agentdev_core::tool::{ParamSpec, Tool};
use agentdev_sandbox::Sandbox;
use async_trait::async_trait;

pub struct ProjectSummaryTool {
    sandbox: Arc<Sandbox>,
}

impl ProjectSummaryTool {
    pub fn new(sandbox: Arc<Sandbox>) -> Self {
        Self { sandbox }
    }
}

#[async_trait]
impl Tool for ProjectSummaryTool {
    fn name(&self) -> &str {
        "get_project_summary"
    }

    fn description(&self) -> &str {
        "Returns every file and directory path in the project. Use this first to orient yourself."
    }

    fn parameters(&self) -> Vec<ParamSpec> {
        Vec::new()
    }

    async fn execute(&self, _arguments: serde_json::Value) -> Result<String, ToolError> {
        let paths: Vec<_> = self
            .sandbox
            .list_all(".")
            .await
            .map_err(|e| e.into_tool_error(self.name()))?
            .into_iter()
            .map(|e| e.relative)
            .collect();

        Ok(format!(
            "Project File Structure:\n```\n{}\n```",
            paths.join("\n")
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::sandbox;

    #[tokio::test]
    async fn renders_fenced_tree() {
        let (dir, sandbox) = sandbox();
        std::fs::create_dir_all(dir.path().join("src")).unwrap();
        std::fs::write(dir.path().join("src/index.js"), "").unwrap();
        std::fs::write(dir.path().join("package.json"), "{}").unwrap();

        let output = ProjectSummaryTool::new(sandbox)
            .execute(serde_json::json!({}))
            .await
            .unwrap();
        assert_eq!(
            output,
            "Project File Structure:\n```\npackage.json\nsrc\nsrc/index.js\n```"
        );
    }

    #[test]
    fn takes_no_parameters() {
        let (_dir, sandbox) = sandbox();
        let tool = ProjectSummaryTool::new(sandbox);
        assert_eq!(tool.signature(), "");
        assert_eq!(tool.parameters_schema()["required"], serde_json::json!([]));
    }
}

//! Write file tool: create or fully overwrite a file inside the sandbox.

use std::sync::Arc;

use agentdev_core::error::ToolError;
use agentdev_core::tool::{ParamSpec, ParamType, Tool, parse_arguments};
use agentdev_sandbox::Sandbox;
use async_trait::async_trait;
use serde::Deserialize;

pub struct WriteFileTool {
    sandbox: Arc<Sandbox>,
}

impl WriteFileTool {
    pub fn new(sandbox: Arc<Sandbox>) -> Self {
        Self { sandbox }
    }
}

#[derive(Deserialize)]
struct Args {
    file_path: String,
    content: String,
}

#[async_trait]
impl Tool for WriteFileTool {
    fn name(&self) -> &str {
        "write_file"
    }

    fn description(&self) -> &str {
        "Writes content to a file, creating parent directories and overwriting any existing content."
    }

    fn parameters(&self) -> Vec<ParamSpec> {
        vec![
            ParamSpec::required(
                "file_path",
                ParamType::String,
                "File to write, relative to the project root",
            ),
            ParamSpec::required("content", ParamType::String, "The complete new file content"),
        ]
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<String, ToolError> {
        let args: Args = parse_arguments(self.name(), arguments)?;
        self.sandbox
            .write(&args.file_path, &args.content)
            .await
            .map_err(|e| e.into_tool_error(self.name()))?;
        Ok(format!("Successfully wrote to {}.", args.file_path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::sandbox;

    #[test]
    fn tool_definition() {
        let (_dir, sandbox) = sandbox();
        let tool = WriteFileTool::new(sandbox);
        let schema = tool.parameters_schema();
        assert_eq!(schema["required"], serde_json::json!(["file_path", "content"]));
        assert_eq!(tool.signature(), "file_path: string, content: string");
    }

    #[tokio::test]
    async fn write_creates_parent_dirs() {
        let (dir, sandbox) = sandbox();
        let output = WriteFileTool::new(sandbox)
            .execute(serde_json::json!({
                "file_path": "src/components/Button.jsx",
                "content": "export default () => null;\n"
            }))
            .await
            .unwrap();
        assert_eq!(output, "Successfully wrote to src/components/Button.jsx.");
        let written =
            std::fs::read_to_string(dir.path().join("src/components/Button.jsx")).unwrap();
        assert_eq!(written, "export default () => null;\n");
    }

    #[tokio::test]
    async fn overwrite_existing_file() {
        let (dir, sandbox) = sandbox();
        std::fs::write(dir.path().join("a.txt"), "old content that is longer").unwrap();
        WriteFileTool::new(sandbox)
            .execute(serde_json::json!({"file_path": "a.txt", "content": "new"}))
            .await
            .unwrap();
        assert_eq!(std::fs::read_to_string(dir.path().join("a.txt")).unwrap(), "new");
    }

    #[tokio::test]
    async fn escaping_write_is_rejected_without_side_effects() {
        let parent = tempfile::tempdir().unwrap();
        let root = parent.path().join("proj");
        std::fs::create_dir(&root).unwrap();
        let sandbox = Arc::new(Sandbox::new(&root).unwrap());

        let err = WriteFileTool::new(sandbox)
            .execute(serde_json::json!({"file_path": "../pwned.txt", "content": "x"}))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::SandboxViolation(_)));
        assert!(!parent.path().join("pwned.txt").exists());
    }
}

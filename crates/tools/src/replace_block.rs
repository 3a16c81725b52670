//! Replace block tool: swap an inclusive, 1-based line range for new content.

use std::sync::Arc;

use agentdev_core::error::ToolError;
use agentdev_core::tool::{ParamSpec, ParamType, Tool, parse_arguments};
use agentdev_sandbox::Sandbox;
use async_trait::async_trait;
use serde::Deserialize;

pub struct ReplaceBlockTool {
    sandbox: Arc<Sandbox>,
}

impl ReplaceBlockTool {
    pub fn new(sandbox: Arc<Sandbox>) -> Self {
        Self { sandbox }
    }
}

#[derive(Deserialize)]
struct Args {
    file_path: String,
    start_line: usize,
    end_line: usize,
    new_content: String,
}

#[async_trait]
impl Tool for ReplaceBlockTool {
    fn name(&self) -> &str {
        "replace_block"
    }

    fn description(&self) -> &str {
        "Replaces lines start_line through end_line (1-based, inclusive) of a file with new_content."
    }

    fn parameters(&self) -> Vec<ParamSpec> {
        vec![
            ParamSpec::required(
                "file_path",
                ParamType::String,
                "File to edit, relative to the project root",
            ),
            ParamSpec::required("start_line", ParamType::Integer, "First line to replace"),
            ParamSpec::required("end_line", ParamType::Integer, "Last line to replace"),
            ParamSpec::required("new_content", ParamType::String, "Replacement text"),
        ]
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<String, ToolError> {
        let args: Args = parse_arguments(self.name(), arguments)?;
        self.sandbox
            .replace_block(&args.file_path, args.start_line, args.end_line, &args.new_content)
            .await
            .map_err(|e| e.into_tool_error(self.name()))?;
        Ok(format!(
            "Successfully replaced lines {}-{} in {}.",
            args.start_line, args.end_line, args.file_path
        ))
    }
}

//! Read file tool.

use std::sync::Arc;

use agentdev_core::error::ToolError;
use agentdev_core::tool::{ParamSpec, ParamType, Tool, parse_arguments};
use agentdev_sandbox::Sandbox;
use async_trait::async_trait;
use serde::Deserialize;

pub struct ReadFileTool {
    sandbox: Arc<Sandbox>,
}

impl ReadFileTool {
    pub fn new(sandbox: Arc<Sandbox>) -> Self {
        Self { sandbox }
    }
}

#[derive(Deserialize)]
struct Args {
    file_path: String,
}

#[async_trait]
impl Tool for ReadFileTool {
    fn name(&self) -> &str {
        "read_file"
    }

    fn description(&self) -> &str {
        "Reads the full content of a file relative to the project root."
    }

    fn parameters(&self) -> Vec<ParamSpec> {
        vec![ParamSpec::required(
            "file_path",
            ParamType::String,
            "File to read, relative to the project root",
        )]
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<String, ToolError> {
        let args: Args = parse_arguments(self.name(), arguments)?;
        self.sandbox
            .read(&args.file_path)
            .await
            .map_err(|e| e.into_tool_error(self.name()))
    }
}

//! List files tool: recursive, ordered listing of a sandbox directory.

use std::sync::Arc;

use agentdev_core::error::ToolError;
use agentdev_core::tool::{ParamSpec, ParamType, Tool, parse_arguments};
use agentdev_sandbox::Sandbox;
use async_trait::async_trait;
use serde::Deserialize;

pub struct ListFilesTool {
    sandbox: Arc<Sandbox>,
}

impl ListFilesTool {
    pub fn new(sandbox: Arc<Sandbox>) -> Self {
        Self { sandbox }
    }
}

#[derive(Deserialize)]
struct Args {
    path: String,
}

#[async_trait]
impl Tool for ListFilesTool {
    fn name(&self) -> &str {
        "list_files"
    }

    fn description(&self) -> &str {
        "Lists all files and directories under a path relative to the project root (e.g. '.' or 'src/')."
    }

    fn parameters(&self) -> Vec<ParamSpec> {
        vec![ParamSpec::required(
            "path",
            ParamType::String,
            "Directory to list, relative to the project root",
        )]
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<String, ToolError> {
        let args: Args = parse_arguments(self.name(), arguments)?;
        let entries = self
            .sandbox
            .list_all(&args.path)
            .await
            .map_err(|e| e.into_tool_error(self.name()))?;

        tracing::debug!(path = %args.path, entries = entries.len(), "Listed directory");
        if entries.is_empty() {
            return Ok("The directory is empty.".into());
        }

        let mut output = String::from("Directory listing:\n");
        for entry in &entries {
            output.push_str(" - ");
            output.push_str(&entry.relative);
            output.push('\n');
        }
        Ok(output)
    }
}

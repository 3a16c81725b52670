//! Code structure tool: JSON outline of functions, classes, variables and
//! imports for JavaScript/TypeScript, Python and Rust sources.

use std::sync::Arc;

use agentdev_core::error::ToolError;
use agentdev_core::tool::{ParamSpec, ParamType, Tool, parse_arguments};
use agentdev_sandbox::{Sandbox, SandboxError};
use async_trait::async_trait;
use serde::Deserialize;

pub struct AnalyzeCodeStructureTool {
    sandbox: Arc<Sandbox>,
}

impl AnalyzeCodeStructureTool {
    pub fn new(sandbox: Arc<Sandbox>) -> Self {
        Self { sandbox }
    }
}

#[derive(Deserialize)]
struct Args {
    file_path: String,
}

#[async_trait]
impl Tool for AnalyzeCodeStructureTool {
    fn name(&self) -> &str {
        "analyze_code_structure"
    }

    fn description(&self) -> &str {
        "Returns a JSON outline (functions, classes, variables, imports) of a .js/.jsx/.ts/.tsx, .py or .rs file. For other files use read_file."
    }

    fn parameters(&self) -> Vec<ParamSpec> {
        vec![ParamSpec::required(
            "file_path",
            ParamType::String,
            "Source file to analyze, relative to the project root",
        )]
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<String, ToolError> {
        let args: Args = parse_arguments(self.name(), arguments)?;
        let outline = self.sandbox.outline(&args.file_path).await.map_err(|e| match e {
            SandboxError::UnsupportedLanguage { path } => ToolError::ExecutionFailed {
                tool_name: self.name().into(),
                reason: format!("cannot analyze '{path}', use read_file instead"),
            },
            other => other.into_tool_error(self.name()),
        })?;

        serde_json::to_string_pretty(&outline).map_err(|e| ToolError::ExecutionFailed {
            tool_name: self.name().into(),
            reason: e.to_string(),
        })
    }
}

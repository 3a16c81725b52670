//! Search and replace tool: verbatim, every occurrence.

use std::sync::Arc;

use agentdev_core::error::ToolError;
use agentdev_core::tool::{ParamSpec, ParamType, Tool, parse_arguments};
use agentdev_sandbox::{ReplaceOutcome, Sandbox};
use async_trait::async_trait;
use serde::Deserialize;

pub struct SearchAndReplaceTool {
    sandbox: Arc<Sandbox>,
}

impl SearchAndReplaceTool {
    pub fn new(sandbox: Arc<Sandbox>) -> Self {
        Self { sandbox }
    }
}

#[derive(Deserialize)]
struct Args {
    file_path: String,
    search_string: String,
    replace_string: String,
}

#[async_trait]
impl Tool for SearchAndReplaceTool {
    fn name(&self) -> &str {
        "search_and_replace"
    }

    fn description(&self) -> &str {
        "Replaces every exact occurrence of search_string with replace_string in a file. Leaves the file untouched if search_string is absent."
    }

    fn parameters(&self) -> Vec<ParamSpec> {
        vec![
            ParamSpec::required(
                "file_path",
                ParamType::String,
                "File to edit, relative to the project root",
            ),
            ParamSpec::required("search_string", ParamType::String, "Exact text to find"),
            ParamSpec::required("replace_string", ParamType::String, "Replacement text"),
        ]
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<String, ToolError> {
        let args: Args = parse_arguments(self.name(), arguments)?;
        if args.search_string.is_empty() {
            return Err(ToolError::InvalidArguments {
                tool_name: self.name().into(),
                reason: "search_string must not be empty".into(),
            });
        }

        let outcome = self
            .sandbox
            .search_replace(&args.file_path, &args.search_string, &args.replace_string)
            .await
            .map_err(|e| e.into_tool_error(self.name()))?;

        match outcome {
            ReplaceOutcome::NotFound => Ok(format!(
                "Error: The search string was not found in {}.",
                args.file_path
            )),
            ReplaceOutcome::Replaced { count } => {
                tracing::debug!(path = %args.file_path, count, "Replaced occurrences");
                Ok(format!(
                    "Successfully performed search and replace in {}.",
                    args.file_path
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::sandbox;

    #[tokio::test]
    async fn replaces_all_occurrences() {
        let (dir, sandbox) = sandbox();
        std::fs::write(dir.path().join("app.js"), "let a = 1;\nlet b = a;\n").unwrap();
        let output = SearchAndReplaceTool::new(sandbox)
            .execute(serde_json::json!({
                "file_path": "app.js",
                "search_string": "let",
                "replace_string": "const"
            }))
            .await
            .unwrap();
        assert_eq!(output, "Successfully performed search and replace in app.js.");
        assert_eq!(
            std::fs::read_to_string(dir.path().join("app.js")).unwrap(),
            "const a = 1;\nconst b = a;\n"
        );
    }

    #[tokio::test]
    async fn absent_search_string_is_noop() {
        let (dir, sandbox) = sandbox();
        std::fs::write(dir.path().join("app.js"), "let a = 1;\n").unwrap();
        let output = SearchAndReplaceTool::new(sandbox)
            .execute(serde_json::json!({
                "file_path": "app.js",
                "search_string": "var",
                "replace_string": "const"
            }))
            .await
            .unwrap();
        assert_eq!(output, "Error: The search string was not found in app.js.");
        assert_eq!(
            std::fs::read_to_string(dir.path().join("app.js")).unwrap(),
            "let a = 1;\n"
        );
    }

    #[tokio::test]
    async fn empty_search_string_rejected() {
        let (dir, sandbox) = sandbox();
        std::fs::write(dir.path().join("app.js"), "x").unwrap();
        let err = SearchAndReplaceTool::new(sandbox)
            .execute(serde_json::json!({
                "file_path": "app.js",
                "search_string": "",
                "replace_string": "y"
            }))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments { .. }));
    }
}

//! Tool trait: the abstraction over agent capabilities.
//!
//! Tools are the only way the agent acts on the project: list, read and
//! write files inside the sandbox, or end the turn. Every tool declares its
//! parameters, and the registry checks decoded planner arguments against
//! that declaration before the tool body ever runs.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::ToolError;

/// How the orchestration loop treats a tool once it has been chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolKind {
    /// Dispatched; the result is appended to history and the loop continues.
    Ordinary,
    /// Ends the session. Its `reason` argument is the user-visible summary.
    Finish,
    /// Ends the current turn without being folded into history.
    Clarify,
}

/// JSON type of a declared parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    String,
    Integer,
}

impl ParamType {
    fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
        }
    }

    fn accepts(self, value: &serde_json::Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Integer => value.is_u64() || value.is_i64(),
        }
    }
}

/// A single declared tool parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: ParamType,
    pub description: String,
    pub required: bool,
}

impl ParamSpec {
    pub fn required(name: &str, ty: ParamType, description: &str) -> Self {
        Self {
            name: name.into(),
            ty,
            description: description.into(),
            required: true,
        }
    }

    pub fn optional(name: &str, ty: ParamType, description: &str) -> Self {
        Self {
            required: false,
            ..Self::required(name, ty, description)
        }
    }
}

/// A request to execute a tool, as decoded from the planner's reply.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    /// Name of the tool to execute
    pub name: String,

    /// Arguments as a JSON object
    pub arguments: serde_json::Value,
}

/// Serializable description of a tool, for API listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub kind: ToolKind,
    pub signature: String,
    /// JSON Schema describing the tool's parameters
    pub parameters: serde_json::Value,
}

/// The core Tool trait.
///
/// Each built-in tool implements this trait and is registered once per
/// sandbox session. Tools receive arguments that already passed the
/// registry's declaration check; they deserialize them into their own typed
/// argument struct with [`parse_arguments`].
#[async_trait]
pub trait Tool: Send + Sync {
    /// The unique name of this tool (e.g., "read_file").
    fn name(&self) -> &str;

    /// A description of what this tool does (rendered into the prompt).
    fn description(&self) -> &str;

    /// Declared parameters, in signature order.
    fn parameters(&self) -> Vec<ParamSpec>;

    /// How the loop treats this tool.
    fn kind(&self) -> ToolKind {
        ToolKind::Ordinary
    }

    /// Execute the tool with the given arguments.
    async fn execute(&self, arguments: serde_json::Value) -> Result<String, ToolError>;

    /// `file_path: string, content: string`
    fn signature(&self) -> String {
        self.parameters()
            .iter()
            .map(|p| {
                if p.required {
                    format!("{}: {}", p.name, p.ty.as_str())
                } else {
                    format!("{}?: {}", p.name, p.ty.as_str())
                }
            })
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// JSON Schema derived from the declared parameters.
    fn parameters_schema(&self) -> serde_json::Value {
        let params = self.parameters();
        let mut properties = serde_json::Map::new();
        for p in &params {
            properties.insert(
                p.name.clone(),
                serde_json::json!({ "type": p.ty.as_str(), "description": p.description }),
            );
        }
        let required: Vec<&str> = params
            .iter()
            .filter(|p| p.required)
            .map(|p| p.name.as_str())
            .collect();
        serde_json::json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }

    /// Convert this tool into a ToolDefinition for API listings.
    fn to_definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name().to_string(),
            description: self.description().to_string(),
            kind: self.kind(),
            signature: self.signature(),
            parameters: self.parameters_schema(),
        }
    }
}

/// Deserialize checked arguments into a tool's typed argument struct.
pub fn parse_arguments<T: DeserializeOwned>(
    tool_name: &str,
    arguments: serde_json::Value,
) -> Result<T, ToolError> {
    serde_json::from_value(arguments).map_err(|e| ToolError::InvalidArguments {
        tool_name: tool_name.into(),
        reason: e.to_string(),
    })
}

/// A registry of available tools.
///
/// The agent loop uses this to:
/// 1. Render tool documentation into the planning prompt
/// 2. Look up, check and execute tools when the planner chooses one
///
/// Registration order is preserved so the rendered docs are stable.
pub struct ToolRegistry {
    tools: Vec<Box<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self { tools: Vec::new() }
    }

    /// Register a tool. Replaces any existing tool with the same name in place.
    pub fn register(&mut self, tool: Box<dyn Tool>) {
        match self.tools.iter().position(|t| t.name() == tool.name()) {
            Some(idx) => self.tools[idx] = tool,
            None => self.tools.push(tool),
        }
    }

    /// Get a tool by name.
    pub fn get(&self, name: &str) -> Option<&dyn Tool> {
        self.tools
            .iter()
            .find(|t| t.name() == name)
            .map(|t| t.as_ref())
    }

    /// Get a tool by name, failing with [`ToolError::NotFound`].
    pub fn lookup(&self, name: &str) -> Result<&dyn Tool, ToolError> {
        self.get(name).ok_or_else(|| ToolError::NotFound(name.to_string()))
    }

    /// One line per tool: `name(signature): description`.
    pub fn render_docs(&self) -> String {
        self.tools
            .iter()
            .map(|t| format!("{}({}): {}", t.name(), t.signature(), t.description()))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Get all tool definitions (for API listings).
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.iter().map(|t| t.to_definition()).collect()
    }

    /// Check arguments against a tool's declared parameters.
    ///
    /// Missing required parameters, wrongly typed values and undeclared keys
    /// are all rejected.
    pub fn check_arguments(
        tool: &dyn Tool,
        arguments: &serde_json::Value,
    ) -> Result<(), ToolError> {
        let invalid = |reason: String| ToolError::InvalidArguments {
            tool_name: tool.name().to_string(),
            reason,
        };

        let empty = serde_json::Map::new();
        let object = match arguments {
            serde_json::Value::Object(map) => map,
            serde_json::Value::Null => &empty,
            other => return Err(invalid(format!("expected an object, got {other}"))),
        };

        let params = tool.parameters();
        for p in &params {
            match object.get(&p.name) {
                Some(value) if !p.ty.accepts(value) => {
                    return Err(invalid(format!(
                        "'{}' must be a {}",
                        p.name,
                        p.ty.as_str()
                    )));
                }
                None if p.required => {
                    return Err(invalid(format!("missing required argument '{}'", p.name)));
                }
                _ => {}
            }
        }

        if let Some(unknown) = object.keys().find(|k| !params.iter().any(|p| &p.name == *k)) {
            return Err(invalid(format!("unexpected argument '{unknown}'")));
        }

        Ok(())
    }

    /// Execute a tool call after checking its arguments.
    pub async fn execute(&self, call: &ToolCall) -> Result<String, ToolError> {
        let tool = self.lookup(&call.name)?;
        Self::check_arguments(tool, &call.arguments)?;
        let arguments = match &call.arguments {
            serde_json::Value::Null => serde_json::Value::Object(serde_json::Map::new()),
            other => other.clone(),
        };
        tool.execute(arguments).await
    }

    /// List all registered tool names.
    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A simple test tool for unit tests.
    struct EchoTool;

    #[derive(Deserialize)]
    struct EchoArgs {
        text: String,
        #[serde(default)]
        times: Option<u64>,
    }

    #[async_trait]
    impl Tool for EchoTool {
        fn name(&self) -> &str {
            "echo"
        }
        fn description(&self) -> &str {
            "Echoes back the input"
        }
        fn parameters(&self) -> Vec<ParamSpec> {
            vec![
                ParamSpec::required("text", ParamType::String, "Text to echo"),
                ParamSpec::optional("times", ParamType::Integer, "Repetitions"),
            ]
        }
        async fn execute(&self, arguments: serde_json::Value) -> Result<String, ToolError> {
            let args: EchoArgs = parse_arguments(self.name(), arguments)?;
            Ok(args.text.repeat(args.times.unwrap_or(1) as usize))
        }
    }

    struct StopTool;

    #[async_trait]
    impl Tool for StopTool {
        fn name(&self) -> &str {
            "finish"
        }
        fn description(&self) -> &str {
            "Stop"
        }
        fn parameters(&self) -> Vec<ParamSpec> {
            vec![ParamSpec::required("reason", ParamType::String, "Why")]
        }
        fn kind(&self) -> ToolKind {
            ToolKind::Finish
        }
        async fn execute(&self, _arguments: serde_json::Value) -> Result<String, ToolError> {
            Ok(String::new())
        }
    }

    fn registry() -> ToolRegistry {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(EchoTool));
        registry.register(Box::new(StopTool));
        registry
    }

    #[test]
    fn registry_register_and_lookup() {
        let registry = registry();
        assert!(registry.get("echo").is_some());
        assert!(registry.get("nonexistent").is_none());
        assert!(matches!(
            registry.lookup("nonexistent"),
            Err(ToolError::NotFound(name)) if name == "nonexistent"
        ));
        assert_eq!(registry.lookup("finish").unwrap().kind(), ToolKind::Finish);
    }

    #[test]
    fn register_same_name_replaces_in_place() {
        let mut registry = registry();
        registry.register(Box::new(EchoTool));
        assert_eq!(registry.names(), vec!["echo", "finish"]);
    }

    #[test]
    fn render_docs_one_line_per_tool() {
        let docs = registry().render_docs();
        let lines: Vec<_> = docs.lines().collect();
        assert_eq!(
            lines,
            vec![
                "echo(text: string, times?: integer): Echoes back the input",
                "finish(reason: string): Stop",
            ]
        );
    }

    #[test]
    fn schema_lists_required_parameters() {
        let schema = EchoTool.parameters_schema();
        assert_eq!(schema["required"], serde_json::json!(["text"]));
        assert_eq!(schema["properties"]["times"]["type"], "integer");
    }

    #[tokio::test]
    async fn registry_execute_tool() {
        let call = ToolCall {
            name: "echo".into(),
            arguments: serde_json::json!({"text": "ab", "times": 2}),
        };
        assert_eq!(registry().execute(&call).await.unwrap(), "abab");
    }

    #[tokio::test]
    async fn registry_execute_missing_tool() {
        let call = ToolCall {
            name: "nonexistent".into(),
            arguments: serde_json::json!({}),
        };
        let err = registry().execute(&call).await.unwrap_err();
        assert!(matches!(err, ToolError::NotFound(_)));
    }

    #[tokio::test]
    async fn arguments_checked_before_invocation() {
        let registry = registry();
        for args in [
            serde_json::json!({}),
            serde_json::json!({"text": 5}),
            serde_json::json!({"text": "a", "path": "x"}),
            serde_json::json!("text"),
        ] {
            let call = ToolCall {
                name: "echo".into(),
                arguments: args,
            };
            let err = registry.execute(&call).await.unwrap_err();
            assert!(matches!(err, ToolError::InvalidArguments { .. }), "{err}");
        }
    }
}

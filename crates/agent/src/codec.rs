//! Planner protocol codec.
//!
//! **Encode** renders the planning prompt from the goal, the history and the
//! tool docs. **Decode** pulls the JSON decision out of the planner's free-text
//! reply.
//!
//! The planner is asked for exactly one JSON object:
//!
//! ```json
//! {"thought": "...", "action": {"tool_name": "read_file", "arguments": {"file_path": "src/App.jsx"}}}
//! ```
//!
//! Replies routinely wrap that object in prose or markdown fences, so decode
//! scans for balanced `{...}` spans (string literals and escapes are tracked,
//! so braces inside strings never end a span) and takes the first span that
//! parses as a JSON object.

use serde_json::Value;

/// Built-in instruction text. `{tool_definitions}`, `{goal}` and `{history}`
/// are substituted by [`PromptTemplate::render`].
pub const DEFAULT_TEMPLATE: &str = r#"You are AgentDev, a senior software engineer working inside a sandboxed project directory. Work methodically, explain your reasoning, and adapt when something fails.

RESPONSE FORMAT:
Reply with a single JSON object and nothing else:
{"thought": "<your reasoning>", "action": {"tool_name": "<tool>", "arguments": {<named arguments>}}}
Argument keys must match the parameter names below exactly.

AVAILABLE TOOLS:
{tool_definitions}

HOW TO WORK:
1. Your first thought classifies the goal and states a plan, starting with "Classification: Code Modification", "Classification: Project Summarization" or "Classification: Ambiguous Goal".
2. For actionable goals, start with get_project_summary, then inspect the relevant files before changing anything.
3. For ambiguous or conversational goals, use ask_user_for_clarification.
4. Every later thought analyzes the previous result before choosing the next step. If a tool fails, diagnose the failure and change approach instead of retrying blindly. If analyze_code_structure cannot handle a file, use read_file.
5. When the goal is achieved, call finish with a reason summarizing what you did (for summaries, the full summary).

CURRENT GOAL: {goal}
HISTORY OF ACTIONS:
{history}
Begin."#;

/// An instruction template with `{tool_definitions}`, `{goal}` and `{history}`
/// placeholders.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    text: String,
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self::new(DEFAULT_TEMPLATE)
    }
}

impl PromptTemplate {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Substitute the three blocks verbatim.
    ///
    /// Single pass over the template: placeholder text that appears inside the
    /// goal, history or docs is never substituted again.
    pub fn render(&self, goal: &str, history: &str, tool_definitions: &str) -> String {
        let slots = [
            ("{tool_definitions}", tool_definitions),
            ("{goal}", goal),
            ("{history}", history),
        ];
        let mut out = String::with_capacity(
            self.text.len() + goal.len() + history.len() + tool_definitions.len(),
        );
        let mut rest = self.text.as_str();

        while let Some(idx) = rest.find('{') {
            out.push_str(&rest[..idx]);
            let tail = &rest[idx..];
            match slots.iter().find(|(key, _)| tail.starts_with(key)) {
                Some((key, value)) => {
                    out.push_str(value);
                    rest = &tail[key.len()..];
                }
                None => {
                    out.push('{');
                    rest = &tail[1..];
                }
            }
        }
        out.push_str(rest);
        out
    }
}

/// Render the planning prompt with the built-in template.
pub fn encode(goal: &str, history: &str, tool_definitions: &str) -> String {
    PromptTemplate::default().render(goal, history, tool_definitions)
}

/// The planner's decision for one round.
#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    pub thought: String,
    /// `None` when the reply names no tool.
    pub tool_name: Option<String>,
    /// Always an object; a missing or null `arguments` decodes as `{}`.
    pub arguments: Value,
}

/// Why a reply could not be decoded. Both variants are a malformed plan.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("no JSON object in planner reply")]
    NoJson { raw: String },

    #[error("{reason}")]
    InvalidJson { raw: String, reason: String },
}

impl DecodeError {
    pub fn raw(&self) -> &str {
        match self {
            Self::NoJson { raw } | Self::InvalidJson { raw, .. } => raw,
        }
    }
}

/// Decode a raw planner reply.
///
/// Argument values are not checked against any tool's parameters here.
pub fn decode(raw: &str) -> Result<Decision, DecodeError> {
    if !(raw.contains('{') && raw.contains('}')) {
        return Err(DecodeError::NoJson { raw: raw.into() });
    }

    let mut first_error: Option<String> = None;
    let mut fallback: Option<serde_json::Map<String, Value>> = None;
    // End of the outermost span scanned so far; starts before it are nested.
    let mut covered_until = 0usize;

    for (start, _) in raw.match_indices('{') {
        let nested = start < covered_until;
        let Some(end) = balanced_end(raw, start) else {
            covered_until = raw.len();
            continue;
        };
        covered_until = covered_until.max(end);

        match serde_json::from_str::<Value>(&raw[start..end]) {
            Ok(Value::Object(object)) if is_decision(&object) => {
                return Ok(decision_from(object));
            }
            Ok(Value::Object(object)) if !nested && fallback.is_none() => {
                fallback = Some(object);
            }
            Ok(_) => {}
            Err(e) => {
                first_error.get_or_insert_with(|| e.to_string());
            }
        }
    }

    if let Some(object) = fallback {
        return Ok(decision_from(object));
    }
    Err(DecodeError::InvalidJson {
        raw: raw.into(),
        reason: first_error.unwrap_or_else(|| "unbalanced braces".into()),
    })
}

fn is_decision(object: &serde_json::Map<String, Value>) -> bool {
    object.contains_key("thought") || object.contains_key("action")
}

/// Byte index one past the `}` closing the object opened at `start`.
fn balanced_end(text: &str, start: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(start + offset + 1);
                }
            }
            _ => {}
        }
    }
    None
}

fn decision_from(object: serde_json::Map<String, Value>) -> Decision {
    let thought = match object.get("thought") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    };

    let (tool_name, arguments) = match object.get("action") {
        Some(Value::Object(action)) => {
            let tool_name = action
                .get("tool_name")
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(String::from);
            let arguments = match action.get("arguments") {
                None | Some(Value::Null) => Value::Object(serde_json::Map::new()),
                Some(value) => value.clone(),
            };
            (tool_name, arguments)
        }
        // Some planners answer `"action": "list_files"`.
        Some(Value::String(name)) if !name.trim().is_empty() => (
            Some(name.trim().to_string()),
            Value::Object(serde_json::Map::new()),
        ),
        _ => (None, Value::Object(serde_json::Map::new())),
    };

    Decision {
        thought,
        tool_name,
        arguments,
    }
}

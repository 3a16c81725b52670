//! Turn history: the append-only record rendered into every prompt.

use serde::{Deserialize, Serialize};

/// Ordered `Thought:` / `Action:` / `Result:` entries.
///
/// Entries are only ever appended; rendering joins them with newlines in
/// insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct History {
    entries: Vec<String>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_thought(&mut self, thought: &str) {
        self.entries.push(format!("Thought: {thought}"));
    }

    pub fn push_action(&mut self, tool_name: &str, arguments: &serde_json::Value) {
        self.entries.push(format!("Action: {tool_name}({arguments})"));
    }

    pub fn push_result(&mut self, result: &str) {
        self.entries.push(format!("Result: {result}"));
    }

    /// Append a line supplied by the caller, e.g. the user's answer to a
    /// clarifying question before the next turn.
    pub fn push_raw(&mut self, entry: impl Into<String>) {
        self.entries.push(entry.into());
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn render(&self) -> String {
        self.entries.join("\n")
    }

    pub fn into_entries(self) -> Vec<String> {
        self.entries
    }
}

impl From<Vec<String>> for History {
    fn from(entries: Vec<String>) -> Self {
        Self { entries }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_in_insertion_order() {
        let mut history = History::new();
        history.push_thought("look around");
        history.push_action("list_files", &serde_json::json!({"path": "."}));
        history.push_result("Directory listing:\n - a.txt");
        assert_eq!(
            history.render(),
            "Thought: look around\nAction: list_files({\"path\":\".\"})\nResult: Directory listing:\n - a.txt"
        );
        assert_eq!(history.len(), 3);
    }

    #[test]
    fn duplicates_are_kept() {
        let mut history = History::from(vec!["Result: x".to_string()]);
        history.push_result("x");
        assert_eq!(history.entries(), ["Result: x", "Result: x"]);
    }

    #[test]
    fn serializes_as_plain_list() {
        let history = History::from(vec!["Thought: a".to_string()]);
        assert_eq!(serde_json::to_string(&history).unwrap(), r#"["Thought: a"]"#);
    }
}

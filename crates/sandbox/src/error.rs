//! Sandbox error type and its mapping onto tool errors.

use agentdev_core::error::ToolError;
use std::path::PathBuf;

/// Error returned by sandboxed filesystem operations.
#[derive(Debug, thiserror::Error)]
pub enum SandboxError {
    #[error("Path '{path}' resolves outside the sandbox root")]
    Violation { path: String },

    #[error("'{path}' is not a directory")]
    NotADirectory { path: String },

    #[error("File not found at '{path}'")]
    NotFound { path: String },

    #[error("Sandbox root '{}' is unavailable: {reason}", root.display())]
    RootUnavailable { root: PathBuf, reason: String },

    #[error("Line range {start}..={end} is invalid for '{path}' ({lines} lines)")]
    InvalidRange {
        path: String,
        start: usize,
        end: usize,
        lines: usize,
    },

    #[error("Structure analysis does not support '{path}'")]
    UnsupportedLanguage { path: String },

    #[error("I/O error on '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl SandboxError {
    pub(crate) fn io(path: &str, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::NotFound { path: path.into() }
        } else {
            Self::Io {
                path: path.into(),
                source,
            }
        }
    }

    /// Map onto the tool error taxonomy on behalf of `tool_name`.
    pub fn into_tool_error(self, tool_name: &str) -> ToolError {
        match self {
            Self::Violation { path } => ToolError::SandboxViolation(path),
            Self::NotADirectory { path } => ToolError::NotADirectory(path),
            e @ Self::InvalidRange { .. } => ToolError::InvalidArguments {
                tool_name: tool_name.into(),
                reason: e.to_string(),
            },
            other => ToolError::ExecutionFailed {
                tool_name: tool_name.into(),
                reason: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn violation_maps_to_sandbox_violation() {
        let err = SandboxError::Violation {
            path: "../etc/passwd".into(),
        }
        .into_tool_error("read_file");
        assert!(matches!(err, ToolError::SandboxViolation(p) if p == "../etc/passwd"));
    }

    #[test]
    fn missing_file_is_not_found() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = SandboxError::io("a.txt", io);
        assert!(matches!(err, SandboxError::NotFound { .. }));
        let tool_err = err.into_tool_error("read_file");
        assert!(tool_err.to_string().contains("File not found at 'a.txt'"));
    }
}

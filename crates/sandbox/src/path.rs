//! Path resolution: confine every caller-supplied path to the sandbox root.
//!
//! Paths are canonicalized component by component. Existing components are
//! resolved through the filesystem, following symlinks to their real target.
//! Components that do not exist yet are appended lexically. The containment
//! check runs on the fully resolved result, never on the raw input.

use std::path::{Component, Path, PathBuf};

use crate::error::SandboxError;

/// A fixed, canonical project root that file tools are confined to.
///
/// Constructed once per session; the root never changes afterwards.
#[derive(Debug, Clone)]
pub struct Sandbox {
    root: PathBuf,
}

impl Sandbox {
    /// Open a sandbox rooted at `root`, which must be an existing directory.
    pub fn new(root: impl AsRef<Path>) -> Result<Self, SandboxError> {
        let root = root.as_ref();
        let canonical = root
            .canonicalize()
            .map_err(|e| SandboxError::RootUnavailable {
                root: root.to_path_buf(),
                reason: e.to_string(),
            })?;

        if !canonical.is_dir() {
            return Err(SandboxError::RootUnavailable {
                root: root.to_path_buf(),
                reason: "not a directory".into(),
            });
        }

        tracing::debug!(root = %canonical.display(), "Sandbox opened");
        Ok(Self { root: canonical })
    }

    /// The canonical root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve `relative` against the root.
    ///
    /// Fails with [`SandboxError::Violation`] when the canonical result is
    /// neither the root nor a descendant of it. Absolute inputs are accepted
    /// only if they land inside the root after the same resolution.
    pub fn resolve(&self, relative: &str) -> Result<PathBuf, SandboxError> {
        let input = Path::new(relative);
        let mut current = if input.has_root() {
            PathBuf::new()
        } else {
            self.root.clone()
        };

        for component in input.components() {
            match component {
                Component::Prefix(_) | Component::RootDir => {
                    current.push(component.as_os_str());
                }
                Component::CurDir => {}
                Component::ParentDir => {
                    current.pop();
                }
                Component::Normal(name) => {
                    let candidate = current.join(name);
                    // Existing entries (symlinks included) resolve to their real
                    // location; missing ones are appended as-is.
                    current = if candidate.symlink_metadata().is_ok() {
                        candidate
                            .canonicalize()
                            .map_err(|e| SandboxError::io(relative, e))?
                    } else {
                        candidate
                    };
                }
            }
        }

        if current.starts_with(&self.root) {
            Ok(current)
        } else {
            tracing::warn!(path = %relative, "Sandbox violation blocked");
            Err(SandboxError::Violation {
                path: relative.into(),
            })
        }
    }

    /// Render an absolute path under the root as a `/`-separated relative path.
    pub fn display_relative(&self, absolute: &Path) -> String {
        let relative = absolute.strip_prefix(&self.root).unwrap_or(absolute);
        let rendered = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        if rendered.is_empty() {
            ".".into()
        } else {
            rendered
        }
    }
}

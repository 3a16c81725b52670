//! File operations. Every entry point resolves its path through
//! [`Sandbox::resolve`] before touching storage.

use std::fs::{self, DirEntry};
use std::path::PathBuf;

use crate::error::SandboxError;
use crate::outline::{self, Outline};
use crate::path::Sandbox;

/// One entry produced by [`Sandbox::list`] or [`Sandbox::list_all`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListEntry {
    /// Path relative to the listed directory, `/`-separated.
    pub relative: String,
    pub is_dir: bool,
}

/// Outcome of a search-and-replace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplaceOutcome {
    /// The search text does not occur; the file was not written.
    NotFound,
    /// Every occurrence was replaced.
    Replaced { count: usize },
}

impl Sandbox {
    /// Read a UTF-8 file.
    pub async fn read(&self, relative: &str) -> Result<String, SandboxError> {
        let path = self.resolve(relative)?;
        tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| SandboxError::io(relative, e))
    }

    /// Write `content`, creating missing parent directories and replacing any
    /// previous content.
    pub async fn write(&self, relative: &str, content: &str) -> Result<(), SandboxError> {
        let path = self.resolve(relative)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| SandboxError::io(relative, e))?;
        }
        tokio::fs::write(&path, content)
            .await
            .map_err(|e| SandboxError::io(relative, e))?;
        tracing::debug!(path = %relative, bytes = content.len(), "File written");
        Ok(())
    }

    /// Enumerate everything under a directory, depth-first, children in
    /// lexicographic order.
    ///
    /// Directories are read only as the iterator reaches them. Symlinked
    /// directories are reported but not descended into.
    pub fn list(&self, relative: &str) -> Result<Listing, SandboxError> {
        let base = self.resolve(relative)?;
        let meta = fs::metadata(&base).map_err(|e| SandboxError::io(relative, e))?;
        if !meta.is_dir() {
            return Err(SandboxError::NotADirectory {
                path: relative.into(),
            });
        }

        let mut listing = Listing {
            base,
            label: relative.into(),
            pending: Vec::new(),
        };
        let root = listing.base.clone();
        listing.push_children(&root)?;
        Ok(listing)
    }

    /// Collect a whole [`Sandbox::list`] walk on the blocking pool, so a
    /// large tree does not stall the async workers other sessions share.
    pub async fn list_all(&self, relative: &str) -> Result<Vec<ListEntry>, SandboxError> {
        let sandbox = self.clone();
        let label = relative.to_string();
        tokio::task::spawn_blocking(move || -> Result<Vec<ListEntry>, SandboxError> {
            sandbox.list(&label)?.collect()
        })
        .await
        .map_err(|e| SandboxError::io(relative, std::io::Error::other(e)))?
    }

    /// Replace every verbatim occurrence of `search` with `replace`.
    pub async fn search_replace(
        &self,
        relative: &str,
        search: &str,
        replace: &str,
    ) -> Result<ReplaceOutcome, SandboxError> {
        let path = self.resolve(relative)?;
        let content = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| SandboxError::io(relative, e))?;

        let count = if search.is_empty() {
            0
        } else {
            content.matches(search).count()
        };
        if count == 0 {
            return Ok(ReplaceOutcome::NotFound);
        }

        tokio::fs::write(&path, content.replace(search, replace))
            .await
            .map_err(|e| SandboxError::io(relative, e))?;
        Ok(ReplaceOutcome::Replaced { count })
    }

    /// Replace lines `start..=end` (1-based) with `new_content`.
    ///
    /// The replacement keeps the line terminator of the last replaced line
    /// when `new_content` does not end with one.
    pub async fn replace_block(
        &self,
        relative: &str,
        start: usize,
        end: usize,
        new_content: &str,
    ) -> Result<(), SandboxError> {
        let path = self.resolve(relative)?;
        let content = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| SandboxError::io(relative, e))?;

        let lines: Vec<&str> = content.split_inclusive('\n').collect();
        if start == 0 || end < start || end > lines.len() {
            return Err(SandboxError::InvalidRange {
                path: relative.into(),
                start,
                end,
                lines: lines.len(),
            });
        }

        let mut updated = String::with_capacity(content.len() + new_content.len());
        for line in &lines[..start - 1] {
            updated.push_str(line);
        }
        updated.push_str(new_content);
        let last_replaced = lines[end - 1];
        if !new_content.is_empty() && !new_content.ends_with('\n') && last_replaced.ends_with('\n')
        {
            updated.push('\n');
        }
        for line in &lines[end..] {
            updated.push_str(line);
        }

        tokio::fs::write(&path, updated)
            .await
            .map_err(|e| SandboxError::io(relative, e))
    }

    /// Outline the functions, classes, variables and imports of a source file.
    pub async fn outline(&self, relative: &str) -> Result<Outline, SandboxError> {
        let path = self.resolve(relative)?;
        let language =
            outline::Language::from_path(&path).ok_or_else(|| SandboxError::UnsupportedLanguage {
                path: relative.into(),
            })?;
        let source = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| SandboxError::io(relative, e))?;
        Ok(outline::outline(language, &source))
    }
}

/// Lazy recursive directory listing returned by [`Sandbox::list`].
pub struct Listing {
    base: PathBuf,
    label: String,
    /// Entries still to visit, last element is next.
    pending: Vec<DirEntry>,
}

impl Listing {
    fn push_children(&mut self, dir: &std::path::Path) -> Result<(), SandboxError> {
        let mut children = fs::read_dir(dir)
            .and_then(|rd| rd.collect::<std::io::Result<Vec<_>>>())
            .map_err(|e| SandboxError::io(&self.label, e))?;
        children.sort_by_key(|entry| std::cmp::Reverse(entry.file_name()));
        self.pending.extend(children);
        Ok(())
    }

    fn relative(&self, path: &std::path::Path) -> String {
        path.strip_prefix(&self.base)
            .unwrap_or(path)
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }
}

impl Iterator for Listing {
    type Item = Result<ListEntry, SandboxError>;

    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.pending.pop()?;
        let path = entry.path();
        let file_type = match entry.file_type() {
            Ok(ft) => ft,
            Err(e) => return Some(Err(SandboxError::io(&self.label, e))),
        };

        let is_dir = file_type.is_dir();
        if is_dir {
            if let Err(e) = self.push_children(&path) {
                return Some(Err(e));
            }
        }

        Some(Ok(ListEntry {
            relative: self.relative(&path),
            is_dir,
        }))
    }
}

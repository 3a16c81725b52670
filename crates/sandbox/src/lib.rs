//! Sandboxed filesystem gateway.
//!
//! A [`Sandbox`] pins a canonical project root. Every operation (read, write,
//! list, search-replace, block-replace, outline) resolves its path through
//! [`Sandbox::resolve`] first and refuses anything that lands outside the root.

pub mod error;
pub mod ops;
pub mod outline;
pub mod path;

pub use error::SandboxError;
pub use ops::{ListEntry, Listing, ReplaceOutcome};
pub use outline::{ClassInfo, FunctionInfo, Language, Outline};
pub use path::Sandbox;

pub mod init;
pub mod run;
pub mod serve;
pub mod tools;

use std::path::PathBuf;

use agentdev_config::AppConfig;
use agentdev_core::Error;

/// Load the user config, tagging failures as configuration errors.
pub(crate) fn load_config() -> agentdev_core::Result<AppConfig> {
    AppConfig::load().map_err(|e| Error::config(format!("Failed to load config: {e}")))
}

/// Pick the project directory: explicit flag, then config, then the cwd.
pub(crate) fn project_root(
    flag: Option<PathBuf>,
    configured: Option<PathBuf>,
) -> agentdev_core::Result<PathBuf> {
    match flag.or(configured) {
        Some(root) => Ok(root),
        None => Ok(std::env::current_dir()?),
    }
}

/// A project root the sandbox cannot open is a configuration mistake.
pub(crate) fn invalid_root(e: agentdev_sandbox::SandboxError) -> Error {
    Error::config(format!("Invalid project root: {e}"))
}

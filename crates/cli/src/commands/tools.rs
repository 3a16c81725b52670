//! `agentdev tools`: Show the tool docs exactly as the planner sees them.

use std::path::PathBuf;
use std::sync::Arc;

use agentdev_sandbox::Sandbox;

pub fn run(root: Option<PathBuf>) -> agentdev_core::Result<()> {
    let config = super::load_config()?;
    let root = super::project_root(root, config.sandbox.root)?;

    let sandbox = Arc::new(Sandbox::new(&root).map_err(super::invalid_root)?);
    let registry = agentdev_tools::default_registry(sandbox);

    println!("{}", registry.render_docs());
    Ok(())
}

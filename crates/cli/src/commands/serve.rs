//! `agentdev serve`: Start the HTTP API server.

pub async fn run(port_override: Option<u16>) -> agentdev_core::Result<()> {
    let mut config = super::load_config()?;

    if let Some(port) = port_override {
        config.gateway.port = port;
    }

    println!("AgentDev Gateway");
    println!("   Listening: {}:{}", config.gateway.host, config.gateway.port);
    println!("   Planner:   {} ({})", config.planner.provider, config.planner.model);
    match &config.sandbox.root {
        Some(root) => println!("   Default project: {}", root.display()),
        None => println!("   Default project: none (requests must set project_path)"),
    }

    agentdev_gateway::start(config).await?;

    Ok(())
}

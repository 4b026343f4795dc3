//! `fugubot serve` — Start the HTTP chat gateway.

use fugubot_config::AppConfig;

pub async fn run(port_override: Option<u16>) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    if let Some(port) = port_override {
        config.gateway.port = port;
    }

    println!("🐡 Fugubot Gateway");
    println!("   Listening: {}:{}", config.gateway.host, config.gateway.port);
    println!("   Model:     {}", config.model);
    println!("   Documents: {}", config.knowledge.files.len());
    if !config.has_api_key() {
        println!("   ⚠️  No API key — accepted questions get an apology response");
    }

    fugubot_gateway::start(config).await?;

    Ok(())
}

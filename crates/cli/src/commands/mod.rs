pub mod ask;
pub mod doctor;
pub mod gateway;
pub mod onboard;
pub mod register;
pub mod status;

use padhai_agent::Orchestrator;
use padhai_config::AppConfig;

/// Load the config from disk, with a readable error.
pub fn load_config() -> Result<AppConfig, Box<dyn std::error::Error>> {
    Ok(AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?)
}

/// Wire provider, store, and agents from `config`.
pub async fn build_orchestrator(
    config: &AppConfig,
) -> Result<Orchestrator, Box<dyn std::error::Error>> {
    if !config.has_api_key() && config.provider.name == "openai" {
        eprintln!();
        eprintln!("  ERROR: No API key configured!");
        eprintln!();
        eprintln!("  Set one of these environment variables:");
        eprintln!("    PADHAI_API_KEY=sk-...");
        eprintln!("    OPENAI_API_KEY=sk-...");
        eprintln!();
        eprintln!("  Or add api_key to your config file:");
        eprintln!("    {}", AppConfig::config_dir().join("config.toml").display());
        eprintln!();
        return Err("No API key found. See above for setup instructions.".into());
    }

    let provider = padhai_providers::build_from_config(config)?;
    let store = padhai_store::open_from_config(&config.store).await?;
    Ok(Orchestrator::from_config(provider, store, config)?)
}

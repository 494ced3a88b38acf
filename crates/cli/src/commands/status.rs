//! `padhai status` — Show the effective configuration.

use padhai_config::AppConfig;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = super::load_config()?;

    println!("📚 Padhai Status");
    println!("================");
    println!("  Config dir:    {}", AppConfig::config_dir().display());
    println!("  Provider:      {} ({})", config.provider.name, config.provider.api_url);
    println!("  Model:         {}", config.default_model);
    println!("  Temperature:   {}", config.default_temperature);
    println!("  Max tokens:    {}", config.default_max_tokens);
    println!("  API key:       {}", if config.has_api_key() { "set" } else { "missing" });
    println!("  Store:         {} ({})", config.store.backend, config.store.resolved_path().display());
    println!("  Gateway:       {}:{}", config.gateway.host, config.gateway.port);
    println!("  Default tone:  {}", config.agents.default_tone);
    println!("  Discover save: {:?}", config.agents.discover_write_back);
    println!("  Sessions:      {} max, {} turns each", config.agents.max_sessions, config.agents.session_turn_limit);

    let config_path = AppConfig::config_dir().join("config.toml");
    if config_path.exists() {
        println!("\n  ✅ Config file found");
    } else {
        println!("\n  ⚠️  No config file — run `padhai onboard` first");
    }

    Ok(())
}

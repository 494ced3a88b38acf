//! `padhai doctor` — Diagnose system health.

use padhai_agent::AgentSettings;
use padhai_config::AppConfig;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("🩺 Padhai Doctor — System Diagnostics");
    println!("=====================================\n");

    let mut issues = 0;

    let config_path = AppConfig::config_dir().join("config.toml");
    if !config_path.exists() {
        println!("  ⚠️  No config file — defaults in use (run `padhai onboard`)");
        issues += 1;
    }

    let config = match AppConfig::load() {
        Ok(config) => {
            println!("  ✅ Config valid");
            config
        }
        Err(e) => {
            println!("  ❌ Config invalid: {e}");
            println!("\n  ⚠️  Fix the config before running further checks.");
            return Ok(());
        }
    };

    if let Err(e) = AgentSettings::from_config(&config.agents) {
        println!("  ❌ {e}");
        issues += 1;
    }

    if config.has_api_key() {
        println!("  ✅ API key configured");
    } else if config.provider.name == "openai" {
        println!("  ❌ No API key — set PADHAI_API_KEY or api_key in config.toml");
        issues += 1;
    } else {
        println!("  ✅ No API key needed for provider '{}'", config.provider.name);
    }

    match padhai_store::open_from_config(&config.store).await {
        Ok(store) => match store.count().await {
            Ok(n) => println!("  ✅ Store reachable ({}, {n} students)", store.name()),
            Err(e) => {
                println!("  ❌ Store query failed: {e}");
                issues += 1;
            }
        },
        Err(e) => {
            println!("  ❌ Store unavailable: {e}");
            issues += 1;
        }
    }

    println!();
    if issues == 0 {
        println!("  🎉 All checks passed!");
    } else {
        println!("  ⚠️  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}

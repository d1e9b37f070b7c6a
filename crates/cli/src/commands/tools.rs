//! `marketmind tools` — list the registered tools.

use marketmind_config::AppConfig;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let registry = marketmind_tools::default_registry(config.data_dir, config.python_bin);

    println!("Registered tools:");
    for def in registry.definitions() {
        println!("  {} — {}", def.name, def.description);
    }

    Ok(())
}

use anyhow::Result;

use sortscope_core::AppConfig;

/// Show where configuration and logs live; optionally write the defaults.
pub fn run(config: &AppConfig, init: bool) -> Result<()> {
    let path = AppConfig::config_path();

    if init {
        if path.exists() {
            println!("Config already exists: {}", path.display());
        } else {
            AppConfig::default().save()?;
            println!("Wrote default config to {}", path.display());
        }
        return Ok(());
    }

    println!("Config file: {}", path.display());
    println!("Log file:    {}", config.log_path().display());
    println!(
        "AI features: {}",
        match (config.ai.enabled, config.ai.api_key().is_some()) {
            (false, _) => "disabled",
            (true, false) => "enabled, no API key",
            (true, true) => "enabled",
        }
    );
    Ok(())
}

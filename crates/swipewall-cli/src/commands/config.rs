use std::path::Path;

use anyhow::Result;

use swipewall_core::AppConfig;

pub fn run(config: &AppConfig, path: &Path, init: bool) -> Result<()> {
    if init {
        if path.exists() {
            println!("Config already exists: {}", path.display());
        } else {
            config.save_to(path)?;
            println!("Wrote default config to {}", path.display());
        }
    }

    println!("Config file: {}", path.display());
    println!("Log file: {}", config.log_path().display());
    println!();
    print!("{}", toml::to_string_pretty(config)?);
    Ok(())
}

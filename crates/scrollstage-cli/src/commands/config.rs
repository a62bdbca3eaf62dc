use anyhow::Result;

use scrollstage_core::AppConfig;

pub fn run(config: &AppConfig, init: bool) -> Result<()> {
    let path = AppConfig::config_path();

    if init {
        if path.exists() {
            println!("Config already exists at {}", path.display());
            return Ok(());
        }
        AppConfig::default().save()?;
        println!("Wrote default config to {}", path.display());
        return Ok(());
    }

    println!("# {}", path.display());
    if !path.exists() {
        println!("# (not found, showing defaults; create it with `scrollstage config --init`)");
    }
    println!("{}", toml::to_string_pretty(config)?);
    println!("# Log file: {}", config.log_path().display());
    Ok(())
}

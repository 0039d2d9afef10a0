use anyhow::Result;

use glide_core::AppConfig;

pub fn run(config: &AppConfig, write: bool) -> Result<()> {
    if write {
        config.save()?;
        println!("Wrote {}", AppConfig::config_path().display());
        return Ok(());
    }

    println!("# {}", AppConfig::config_path().display());
    print!("{}", config.to_toml()?);
    Ok(())
}

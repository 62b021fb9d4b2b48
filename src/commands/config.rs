//! Config subcommands handler

use anyhow::Result;

use wlr::Config;

/// Show current configuration as TOML.
#[cfg(not(tarpaulin_include))]
pub fn handle_show() -> Result<()> {
    let config = Config::load()?;
    print!("{}", toml::to_string_pretty(&config)?);
    Ok(())
}

#[cfg(not(tarpaulin_include))]
pub fn handle_path() -> Result<()> {
    println!("{}", Config::config_path()?.display());
    Ok(())
}

/// Create the config file with default settings.
///
/// An existing file is left alone unless `force` is set.
#[cfg(not(tarpaulin_include))]
pub fn handle_init(force: bool) -> Result<()> {
    let config_path = Config::config_path()?;
    if config_path.exists() && !force {
        println!(
            "Config file already exists: {} (use --force to overwrite)",
            config_path.display()
        );
        return Ok(());
    }
    Config::default().save_to(&config_path)?;
    println!("Wrote {}", config_path.display());
    Ok(())
}

//! Config command - show or initialize configuration

use crate::cli::args::{ConfigAction, ConfigArgs};
use crate::config::{Config, ConfigManager};
use crate::error::{OtaError, OtaResult};
use console::style;

/// Execute the config command
pub async fn execute(args: ConfigArgs, manager: &ConfigManager, config: &Config) -> OtaResult<()> {
    match args.action {
        None | Some(ConfigAction::Show) => show_config(config)?,
        Some(ConfigAction::Path) => println!("{}", manager.path().display()),
        Some(ConfigAction::Init { force }) => init_config(manager, force).await?,
    }

    Ok(())
}

fn show_config(config: &Config) -> OtaResult<()> {
    println!("{}", toml::to_string_pretty(config)?);
    Ok(())
}

async fn init_config(manager: &ConfigManager, force: bool) -> OtaResult<()> {
    let path = manager.path();

    if path.exists() && !force {
        return Err(OtaError::ConfigExists(path.to_path_buf()));
    }

    manager.save(&Config::default()).await?;
    println!(
        "{} Configuration initialized ({})",
        style("[OK]").green(),
        style(path.display()).dim()
    );

    Ok(())
}

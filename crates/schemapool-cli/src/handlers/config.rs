//! Configuration command handlers

use crate::cli::{ConfigAction, ConfigArgs, ConfigFormat, ConfigInitArgs, ConfigShowArgs};
use crate::config::{Config, PROJECT_CONFIG_FILE};
use crate::error::{Error, Result};
use crate::output::OutputWriter;
use std::path::{Path, PathBuf};

/// Handle the config command
pub fn handle_config(args: ConfigArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    match args.action {
        ConfigAction::Init(init_args) => handle_config_init(init_args, output),
        ConfigAction::Show(show_args) => handle_config_show(show_args, config, output),
    }
}

/// Handle config init subcommand
fn handle_config_init(args: ConfigInitArgs, output: &mut OutputWriter) -> Result<()> {
    let path = if args.user {
        Config::user_config_path()
            .ok_or_else(|| Error::config("Unable to determine user config directory"))?
    } else {
        PathBuf::from(PROJECT_CONFIG_FILE)
    };

    write_default_config(&path, args.force, output)
}

fn write_default_config(path: &Path, force: bool, output: &mut OutputWriter) -> Result<()> {
    if path.exists() && !force {
        output.warning(&format!("Config already exists at {}", path.display()))?;
        return Ok(());
    }

    Config::default().save(path)?;
    output.success(&format!("✓ Created config at {}", path.display()))?;
    output.info("Edit it to customize compiler and output settings.")?;
    Ok(())
}

/// Handle config show subcommand
fn handle_config_show(args: ConfigShowArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    let content = render(config, args.format)?;
    output.writeln(content.trim_end())
}

fn render(config: &Config, format: ConfigFormat) -> Result<String> {
    let extension = match format {
        ConfigFormat::Toml => "toml",
        ConfigFormat::Json => "json",
        ConfigFormat::Yaml => "yaml",
    };
    config.render_for(Path::new(&format!("config.{}", extension)))
}

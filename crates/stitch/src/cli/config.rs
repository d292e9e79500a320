//! The `stitch config` command for configuration management.

use clap::{Args, Subcommand};
use std::path::PathBuf;
use stitch_core::Config;

/// Arguments for the `config` command.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Subcommands for configuration management.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Display current configuration
    Show,

    /// Show config file path
    Path,

    /// Initialize a new config file with defaults
    Init {
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
}

/// Execute the config command.
///
/// `explicit_path` is the `--config` file, if one was given.
pub async fn execute(args: ConfigArgs, config: Config, explicit_path: Option<PathBuf>) -> anyhow::Result<()> {
    let path = explicit_path.unwrap_or_else(Config::default_path);

    match args.command {
        ConfigCommand::Show => {
            println!("{}", config.to_toml()?);
        }

        ConfigCommand::Path => {
            println!("{}", path.display());
        }

        ConfigCommand::Init { force } => {
            write_default(&path, force)?;
            tracing::info!("Config file created at: {}", path.display());
            println!("Configuration initialized at: {}", path.display());
        }
    }

    Ok(())
}

/// Write the default configuration to `path`, creating parent directories.
fn write_default(path: &std::path::Path, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "Config file already exists at: {}\nUse --force to overwrite.",
            path.display()
        );
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, Config::default().to_toml()?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_writes_loadable_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        write_default(&path, false).unwrap();
        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.render.max_height, 1080);
        assert_eq!(loaded.output.dir_name, "Results");
    }

    #[test]
    fn test_init_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[render]\nmax_height = 50\n").unwrap();

        let err = write_default(&path, false).unwrap_err();
        assert!(err.to_string().contains("--force"));
        assert!(std::fs::read_to_string(&path).unwrap().contains("50"));

        write_default(&path, true).unwrap();
        assert_eq!(Config::load_from(&path).unwrap().render.max_height, 1080);
    }
}

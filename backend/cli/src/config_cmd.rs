//! `cogforge config ...`: show, create and check the configuration.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Subcommand;
use cogforge_config::{
    config_dir, config_file_path, redact, template, validate, write_config, CogForgeConfig,
    ValidationReport,
};

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Print the effective configuration with secrets masked
    Show,
    /// Write a template configuration file
    Init {
        /// Target file; `~/.cogforge/config.yaml` when omitted
        path: Option<PathBuf>,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Validate the effective configuration
    Check,
}

pub async fn run(cmd: ConfigCommand, config: &CogForgeConfig) -> Result<()> {
    match cmd {
        ConfigCommand::Show => {
            let value = serde_json::to_value(config).context("Failed to serialize config")?;
            let shown = serde_json::to_string_pretty(&redact(&value))
                .context("Failed to serialize config")?;
            println!("{shown}");
            Ok(())
        }
        ConfigCommand::Check => {
            let report = validate(config);
            print!("{}", describe(&report));
            if !report.is_valid() {
                bail!("configuration has {} error(s)", report.errors.len());
            }
            Ok(())
        }
        ConfigCommand::Init { path, force } => init(path.as_deref(), force).await,
    }
}

pub async fn init(path: Option<&Path>, force: bool) -> Result<()> {
    let path = path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| config_file_path(&config_dir()));
    if path.exists() && !force {
        bail!(
            "{} already exists; pass --force to overwrite it",
            path.display()
        );
    }
    write_config(&template(), &path).await?;
    println!("Wrote template configuration to {}", path.display());
    Ok(())
}

fn describe(report: &ValidationReport) -> String {
    let mut out = String::new();
    if report.errors.is_empty() && report.warnings.is_empty() {
        out.push_str("Configuration OK\n");
        return out;
    }
    for error in &report.errors {
        let _ = writeln!(out, "error   {}: {}", error.path, error.message);
    }
    for warning in &report.warnings {
        let _ = writeln!(out, "warning {}: {}", warning.path, warning.message);
    }
    out
}

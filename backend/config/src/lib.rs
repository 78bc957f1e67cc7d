//! `cogforge-config`: cogforge runtime configuration management.
//!
//! Provides:
//! - Typed config schema (one section per remote service, logging, HTTP)
//! - YAML/JSON read and atomic write
//! - `${ENV_VAR}` substitution and well-known env var overrides
//! - Config redaction for safe logging/display
//! - Default value application
//! - Validation
//! - Credential accessors for the service clients

pub mod credentials;
pub mod defaults;
pub mod env;
pub mod io;
pub mod redact;
pub mod schema;
pub mod validation;

// Re-export most-used types at crate root.
pub use credentials::{CustomVisionTarget, ServiceSection};
pub use defaults::{apply_all_defaults, template};
pub use env::{
    apply_env_overrides, apply_env_overrides_with, collect_referenced_vars, resolve_env_vars,
    resolve_env_vars_with, MissingEnvVarError,
};
pub use io::{config_dir, config_file_path, load_raw, resolve_config_path, write_config};
pub use redact::{collect_redacted_paths, redact};
pub use schema::CogForgeConfig;
pub use validation::{validate, ConfigValidationError, ValidationReport};

use std::collections::HashMap;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde_json::Value;

/// Load the config file (explicit path or discovered) and apply env
/// substitution, env overrides and defaults. Logs nothing about validity.
///
/// Only a discovered file may be absent; an explicit path must exist.
pub async fn load(explicit: Option<&Path>) -> Result<CogForgeConfig> {
    if let Some(path) = explicit.filter(|p| !p.exists()) {
        bail!("Config file not found: {}", path.display());
    }
    let raw = match resolve_config_path(explicit) {
        Some(path) => load_raw(&path).await?,
        None => Value::Object(Default::default()),
    };
    prepare(raw, &std::env::vars().collect())
}

/// Log every validation warning and error of a loaded config.
pub fn log_findings(config: &CogForgeConfig) -> ValidationReport {
    let report = validate(config);
    for warning in &report.warnings {
        tracing::warn!(path = %warning.path, message = %warning.message, "Config warning");
    }
    for error in &report.errors {
        tracing::error!(path = %error.path, message = %error.message, "Config error");
    }
    report
}

/// [`load`] followed by [`log_findings`]: the usual runtime entry point.
pub async fn load_and_prepare(explicit: Option<&Path>) -> Result<CogForgeConfig> {
    let config = load(explicit).await?;
    if resolve_config_path(explicit).is_none() {
        tracing::debug!("No config file found; using environment and defaults");
    }
    log_findings(&config);
    Ok(config)
}

/// Turn a raw value tree into a ready-to-use config using the given environment.
pub fn prepare(raw: Value, env: &HashMap<String, String>) -> Result<CogForgeConfig> {
    let value = resolve_env_vars_with(&raw, env).context("Failed to resolve env vars in config")?;

    let config: CogForgeConfig =
        serde_json::from_value(value).context("Failed to deserialize config")?;

    let config = apply_env_overrides_with(config, env);
    Ok(apply_all_defaults(config))
}

//! Config file discovery, reading and atomic writing.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::Value;
use tokio::fs;
use tracing::{debug, info};

use crate::schema::CogForgeConfig;

/// Default config file name within the config directory.
const CONFIG_FILE_NAME: &str = "config.yaml";

/// Settings file picked up from the working directory.
pub const APPSETTINGS_FILE_NAME: &str = "appsettings.json";

/// Resolve the cogforge config directory.
/// Priority: `COGFORGE_CONFIG_DIR` env > `~/.cogforge/`.
pub fn config_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("COGFORGE_CONFIG_DIR") {
        return PathBuf::from(dir);
    }
    dirs::home_dir()
        .map(|home| home.join(".cogforge"))
        .unwrap_or_else(|| PathBuf::from(".cogforge"))
}

/// Resolve the full path to the main config file.
pub fn config_file_path(config_dir: &Path) -> PathBuf {
    config_dir.join(CONFIG_FILE_NAME)
}

/// Pick the config file to load: the explicit path, else the first existing of
/// `<config_dir>/config.yaml` and `./appsettings.json`.
pub fn resolve_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    let candidates = [
        config_file_path(&config_dir()),
        PathBuf::from(APPSETTINGS_FILE_NAME),
    ];
    candidates.into_iter().find(|p| p.exists())
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("json"))
        .unwrap_or(false)
}

/// Read a config file into an untyped value tree (YAML or JSON by extension).
///
/// A missing file yields an empty object so that env-only setups work.
pub async fn load_raw(path: &Path) -> Result<Value> {
    if !path.exists() {
        debug!(path = %path.display(), "Config file does not exist; using defaults");
        return Ok(Value::Object(Default::default()));
    }

    let raw = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let value: Value = if is_json(path) {
        serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse config JSON at: {}", path.display()))?
    } else {
        serde_yaml::from_str(&raw)
            .with_context(|| format!("Failed to parse config YAML at: {}", path.display()))?
    };

    info!(path = %path.display(), "Loaded config");
    // An empty YAML document parses as null.
    Ok(if value.is_null() {
        Value::Object(Default::default())
    } else {
        value
    })
}

/// Write config to disk atomically (write to temp file, rename).
pub async fn write_config(config: &CogForgeConfig, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await.with_context(|| {
            format!("Failed to create config directory: {}", parent.display())
        })?;
    }

    let serialized = if is_json(path) {
        serde_json::to_string_pretty(config).context("Failed to serialize config to JSON")?
    } else {
        serde_yaml::to_string(config).context("Failed to serialize config to YAML")?
    };

    let tmp_path = path.with_extension("tmp");
    fs::write(&tmp_path, serialized.as_bytes())
        .await
        .with_context(|| format!("Failed to write temp config: {}", tmp_path.display()))?;

    fs::rename(&tmp_path, path)
        .await
        .with_context(|| format!("Failed to rename temp config to: {}", path.display()))?;

    info!(path = %path.display(), "Wrote config");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ServiceConfig;

    #[tokio::test]
    async fn missing_file_is_empty_object() {
        let dir = tempfile::tempdir().unwrap();
        let value = load_raw(&dir.path().join("nope.yaml")).await.unwrap();
        assert_eq!(value, Value::Object(Default::default()));
    }

    #[tokio::test]
    async fn writes_and_reads_back_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.yaml");
        let mut cfg = CogForgeConfig::default();
        cfg.vision = Some(ServiceConfig {
            endpoint: Some("https://vision.example".into()),
            api_key: Some("k".into()),
            region: None,
        });
        write_config(&cfg, &path).await.unwrap();
        assert!(!path.with_extension("tmp").exists());

        let value = load_raw(&path).await.unwrap();
        assert_eq!(value["vision"]["endpoint"], "https://vision.example");
    }

    #[tokio::test]
    async fn reads_json_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("appsettings.json");
        std::fs::write(&path, r#"{"ContentSafety":{"Endpoint":"https://cs.example"}}"#).unwrap();
        let value = load_raw(&path).await.unwrap();
        assert_eq!(value["ContentSafety"]["Endpoint"], "https://cs.example");
    }

    #[test]
    fn explicit_path_wins() {
        let p = PathBuf::from("/tmp/custom.yaml");
        assert_eq!(resolve_config_path(Some(&p)), Some(p));
    }
}

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use xmldb_codec::MissingPolicy;
use xmldb_core::Limits;

use crate::error::CliError;

/// CLI configuration loaded from xmldb.toml.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CliConfig {
    #[serde(default)]
    pub limits: Limits,
    #[serde(default)]
    pub check: CheckSettings,
}

/// Settings for `check` and `validate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckSettings {
    /// `fail` or `skip`.
    #[serde(default = "default_missing")]
    pub missing: String,
    /// Paths searched when none are given on the command line.
    #[serde(default = "default_paths")]
    pub default_paths: Vec<PathBuf>,
}

impl Default for CheckSettings {
    fn default() -> Self {
        Self {
            missing: default_missing(),
            default_paths: default_paths(),
        }
    }
}

fn default_missing() -> String {
    "fail".to_string()
}

fn default_paths() -> Vec<PathBuf> {
    vec![PathBuf::from(".")]
}

/// Parses a `fail`/`skip` setting.
pub fn parse_missing_policy(value: &str) -> Result<MissingPolicy, CliError> {
    match value {
        "fail" => Ok(MissingPolicy::Fail),
        "skip" => Ok(MissingPolicy::Skip),
        other => Err(CliError::Config {
            message: format!("missing must be \"fail\" or \"skip\", got \"{other}\""),
        }),
    }
}

/// Discovery order for config file:
/// 1. `--config <path>` or `XMLDB_CONFIG` (explicit)
/// 2. `./xmldb.toml` (project-local)
/// 3. `$XDG_CONFIG_HOME/xmldb/config.toml`
/// 4. `~/.config/xmldb/config.toml`
pub fn load_config(explicit_path: Option<&Path>) -> Result<CliConfig, CliError> {
    if let Some(path) = explicit_path {
        return load_config_from_path(path);
    }

    let local = PathBuf::from("xmldb.toml");
    if local.exists() {
        return load_config_from_path(&local);
    }

    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
        let path = PathBuf::from(xdg).join("xmldb/config.toml");
        if path.exists() {
            return load_config_from_path(&path);
        }
    }

    if let Some(home) = std::env::var_os("HOME") {
        let path = PathBuf::from(home).join(".config/xmldb/config.toml");
        if path.exists() {
            return load_config_from_path(&path);
        }
    }

    Ok(CliConfig::default())
}

fn load_config_from_path(path: &Path) -> Result<CliConfig, CliError> {
    let contents = std::fs::read_to_string(path).map_err(|e| CliError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    let config: CliConfig = toml::from_str(&contents).map_err(|e| CliError::Config {
        message: format!("failed to parse {}: {}", path.display(), e),
    })?;
    parse_missing_policy(&config.check.missing)?;
    tracing::debug!(path = %path.display(), "loaded configuration");
    Ok(config)
}

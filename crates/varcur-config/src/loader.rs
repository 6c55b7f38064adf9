#![deny(unsafe_code)]

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::config::AppConfig;
use crate::error::ConfigError;

const DEFAULT_CONFIG_TOML: &str = include_str!("../data/default.toml");
const DEFAULT_CONFIG_NAME: &str = "<embedded default.toml>";

/// Load and validate the embedded default configuration.
pub fn default_config() -> Result<AppConfig, ConfigError> {
    parse_toml(DEFAULT_CONFIG_TOML, Path::new(DEFAULT_CONFIG_NAME))
}

/// Load a configuration file, choosing the format from its extension.
///
/// `.json` files use the backend's `/config` document shape; `.toml` files the
/// same keys in TOML.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    let config = match extension.as_deref() {
        Some("toml") => parse_toml(&content, path)?,
        Some("json") => parse_json(&content, path)?,
        _ => {
            return Err(ConfigError::UnsupportedFormat {
                path: path.to_path_buf(),
            });
        }
    };
    tracing::info!(
        path = %path.display(),
        classifications = config.classification.options.len(),
        "loaded config"
    );
    Ok(config)
}

/// Load `path` when given, the embedded default otherwise.
pub fn load_config_or_default(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    match path {
        Some(path) => load_config(path),
        None => {
            tracing::debug!("no config path given, using embedded default");
            default_config()
        }
    }
}

pub fn parse_toml(content: &str, path: &Path) -> Result<AppConfig, ConfigError> {
    let config: AppConfig = toml::from_str(content).map_err(|source| ConfigError::Toml {
        path: PathBuf::from(path),
        source,
    })?;
    validate_config(&config)?;
    Ok(config)
}

pub fn parse_json(content: &str, path: &Path) -> Result<AppConfig, ConfigError> {
    let config: AppConfig = serde_json::from_str(content).map_err(|source| ConfigError::Json {
        path: PathBuf::from(path),
        source,
    })?;
    validate_config(&config)?;
    Ok(config)
}

/// Reject configurations the helpers cannot work with.
pub fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.classification.options.is_empty() {
        return Err(ConfigError::invalid("no classification options configured"));
    }
    let mut seen = BTreeSet::new();
    for option in &config.classification.options {
        if option.value.trim().is_empty() {
            return Err(ConfigError::invalid(format!(
                "classification option '{}' has an empty value",
                option.name
            )));
        }
        if !seen.insert(option.value.as_str()) {
            return Err(ConfigError::DuplicateClassification {
                value: option.value.clone(),
            });
        }
    }

    let codes = &config.acmg.codes;
    if codes.pathogenic.is_empty() || codes.benign.is_empty() {
        return Err(ConfigError::invalid(
            "acmg.codes.pathogenic and acmg.codes.benign must not be empty",
        ));
    }

    let thresholds = config.frequencies.thresholds;
    if thresholds.lo_freq_cutoff > thresholds.hi_freq_cutoff {
        return Err(ConfigError::invalid(format!(
            "lo_freq_cutoff ({}) is above hi_freq_cutoff ({})",
            thresholds.lo_freq_cutoff, thresholds.hi_freq_cutoff
        )));
    }
    Ok(())
}

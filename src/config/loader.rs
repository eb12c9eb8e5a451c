//! Configuration loading and layering.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::schema::AgentConfig;
use crate::config::validation::{validate_config, ValidationError};

/// File names searched in the home directory, in order.
const DEFAULT_FILE_NAMES: [&str; 2] = [".cronitor.toml", ".cronitor.json"];

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Values supplied on the command line. They win over every other layer.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Explicit config file; it must exist.
    pub path: Option<PathBuf>,
    pub api_key: Option<String>,
    pub hostname: Option<String>,
    pub verbose: bool,
    pub dev: bool,
}

/// Parse a config file without validating it. `.json` files go through
/// serde_json, everything else through toml.
pub fn read_config_file(path: &Path) -> Result<AgentConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    if is_json {
        Ok(serde_json::from_str(&content)?)
    } else {
        Ok(toml::from_str(&content)?)
    }
}

/// Load and validate configuration from a single file.
pub fn load_config(path: &Path) -> Result<AgentConfig, ConfigError> {
    let config = read_config_file(path)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// First existing default config file under `home`.
pub fn find_default_config(home: &Path) -> Option<PathBuf> {
    DEFAULT_FILE_NAMES
        .iter()
        .map(|name| home.join(name))
        .find(|candidate| candidate.is_file())
}

/// A resolved configuration and the file it was read from, if any.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub config: AgentConfig,
    pub source: Option<PathBuf>,
}

/// Config file to read: the explicit `--config` path, else the first default
/// file found under `home`.
pub fn config_source(overrides: &ConfigOverrides, home: Option<&Path>) -> Option<PathBuf> {
    match &overrides.path {
        Some(path) => Some(path.clone()),
        None => home.and_then(find_default_config),
    }
}

/// Build the effective configuration from the process environment.
///
/// Layers, lowest first: defaults, config file, `CRONITOR_*` variables,
/// command-line overrides. The result is validated once at the end.
pub fn resolve_config(overrides: &ConfigOverrides) -> Result<ResolvedConfig, ConfigError> {
    let source = config_source(overrides, dirs::home_dir().as_deref());
    let config = resolve_with(source.as_deref(), overrides, |key| std::env::var(key).ok())?;
    Ok(ResolvedConfig { config, source })
}

/// Layering with an injectable environment, so callers and tests don't touch
/// process-wide state.
pub fn resolve_with<F>(
    file: Option<&Path>,
    overrides: &ConfigOverrides,
    env: F,
) -> Result<AgentConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match file {
        Some(path) => read_config_file(path)?,
        None => AgentConfig::default(),
    };

    apply_env(&mut config, env);
    apply_overrides(&mut config, overrides);

    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

fn apply_env<F>(config: &mut AgentConfig, env: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(key) = env("CRONITOR_API_KEY").filter(|v| !v.is_empty()) {
        config.api_key = Some(key);
    }
    if let Some(hostname) = env("CRONITOR_HOSTNAME").filter(|v| !v.is_empty()) {
        config.hostname = Some(hostname);
    }
    if let Some(verbose) = env("CRONITOR_VERBOSE") {
        config.verbose = parse_flag(&verbose);
    }
    if let Some(dev) = env("CRONITOR_DEV") {
        config.dev = parse_flag(&dev);
    }
}

fn apply_overrides(config: &mut AgentConfig, overrides: &ConfigOverrides) {
    if let Some(key) = &overrides.api_key {
        config.api_key = Some(key.clone());
    }
    if let Some(hostname) = &overrides.hostname {
        config.hostname = Some(hostname.clone());
    }
    // Flags can only switch these on.
    config.verbose |= overrides.verbose;
    config.dev |= overrides.dev;
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

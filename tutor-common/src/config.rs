//! Configuration file discovery and loading
//!
//! Bootstrap configuration is resolved in this priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. Per-user config directory (`<config_dir>/adaptive-tutor/<module>.toml`)
//! 4. System-wide config (`/etc/adaptive-tutor/<module>.toml`, Linux only)
//!
//! A missing config file is not an error: callers fall back to built-in
//! defaults and log a warning.

use crate::{Error, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Application directory name under the platform config directory
pub const APP_DIR_NAME: &str = "adaptive-tutor";

/// Logging configuration shared by all modules
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level directive (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Locates the TOML bootstrap file for one module
pub struct ConfigFileResolver {
    module_name: String,
    env_var_name: String,
}

impl ConfigFileResolver {
    /// Create a resolver for `module_name`.
    ///
    /// The environment override is `TUTOR_<MODULE>_CONFIG`, with a leading
    /// `tutor-` dropped from the module name (`tutor-ai` → `TUTOR_AI_CONFIG`).
    pub fn new(module_name: &str) -> Self {
        let short = module_name.strip_prefix("tutor-").unwrap_or(module_name);
        let env_var_name = format!("TUTOR_{}_CONFIG", short.replace('-', "_").to_uppercase());
        Self {
            module_name: module_name.to_string(),
            env_var_name,
        }
    }

    /// Name of the environment variable consulted by [`resolve`](Self::resolve)
    pub fn env_var_name(&self) -> &str {
        &self.env_var_name
    }

    /// Resolve the config file path, returning `None` when no file exists
    pub fn resolve(&self, cli_arg: Option<&Path>) -> Option<PathBuf> {
        // Priority 1: Command-line argument (returned even if missing so the
        // caller can report it)
        if let Some(path) = cli_arg {
            return Some(path.to_path_buf());
        }

        // Priority 2: Environment variable
        if let Ok(path) = std::env::var(&self.env_var_name) {
            if !path.trim().is_empty() {
                return Some(PathBuf::from(path));
            }
        }

        // Priority 3: Per-user config directory
        let file_name = format!("{}.toml", self.module_name);
        if let Some(path) = dirs::config_dir().map(|d| d.join(APP_DIR_NAME).join(&file_name)) {
            if path.exists() {
                return Some(path);
            }
        }

        // Priority 4: System-wide config
        if cfg!(target_os = "linux") {
            let system = PathBuf::from("/etc").join(APP_DIR_NAME).join(&file_name);
            if system.exists() {
                return Some(system);
            }
        }

        None
    }
}

/// Read and parse a TOML file into `T`
pub fn load_toml_config<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::Config(format!("Failed to read config file {}: {}", path.display(), e))
    })?;

    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Failed to parse TOML {}: {}", path.display(), e)))
}

/// Load config from the resolved path, or fall back to `T::default()`
///
/// An explicitly requested file that cannot be read is an error. When the
/// path came from discovery and nothing was found, defaults are used.
pub fn load_or_default<T: DeserializeOwned + Default>(
    resolver: &ConfigFileResolver,
    cli_arg: Option<&Path>,
) -> Result<T> {
    match resolver.resolve(cli_arg) {
        Some(path) => {
            let config = load_toml_config(&path)?;
            info!("Loaded configuration from {}", path.display());
            Ok(config)
        }
        None => {
            warn!(
                "No configuration file found for {} (set {} or pass --config); using defaults",
                resolver.module_name, resolver.env_var_name
            );
            Ok(T::default())
        }
    }
}

/// Resolve a secret value from environment first, then TOML
///
/// Empty or whitespace-only values are treated as absent. Warns when both
/// sources carry a value.
pub fn resolve_secret(label: &str, env_var: &str, toml_value: Option<&str>) -> Option<String> {
    let env_value = std::env::var(env_var).ok().filter(|v| is_valid_key(v));
    let toml_value = toml_value.filter(|v| is_valid_key(v)).map(str::to_string);

    if env_value.is_some() && toml_value.is_some() {
        warn!(
            "{} found in both environment ({}) and TOML config. Using environment.",
            label, env_var
        );
    }

    if let Some(value) = env_value {
        info!("{} loaded from environment variable", label);
        return Some(value);
    }

    if let Some(value) = toml_value {
        info!("{} loaded from TOML config", label);
        return Some(value);
    }

    None
}

/// Validate a key value (non-empty, non-whitespace)
pub fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_var_name_strips_prefix() {
        let resolver = ConfigFileResolver::new("tutor-ai");
        assert_eq!(resolver.env_var_name(), "TUTOR_AI_CONFIG");
    }

    #[test]
    fn test_cli_arg_wins() {
        let resolver = ConfigFileResolver::new("tutor-ai");
        let path = PathBuf::from("/tmp/does-not-matter.toml");
        assert_eq!(resolver.resolve(Some(&path)), Some(path));
    }

    #[test]
    fn test_is_valid_key() {
        assert!(is_valid_key("abc"));
        assert!(!is_valid_key(""));
        assert!(!is_valid_key("   "));
    }

    #[test]
    fn test_logging_default_level() {
        assert_eq!(LoggingConfig::default().level, "info");
    }
}

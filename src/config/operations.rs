//! Config loading, validation, and utility operations.

use super::model::Config;
use crate::error::{PromptError, Result};
use std::path::Path;

impl Config {
    /// Load config from a YAML file.
    ///
    /// Unknown fields in the YAML are silently ignored for forward compatibility.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the config file
    ///
    /// # Returns
    ///
    /// * `Ok(Config)` - Successfully loaded and validated config
    /// * `Err(PromptError::Io)` - The file could not be read
    /// * `Err(PromptError::Config)` - Parse error or validation failure
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|source| PromptError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let mut config = Self::from_yaml(&content)?;

        // A relative wildcard path is relative to the config file.
        if let (Some(wildcards), Some(dir)) = (&config.wildcards.path, path.parent()) {
            if wildcards.is_relative() {
                config.wildcards.path = Some(dir.join(wildcards));
            }
        }
        Ok(config)
    }

    /// Parse config from a YAML string.
    ///
    /// Unknown fields in the YAML are silently ignored for forward compatibility.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(yaml)
            .map_err(|e| PromptError::Config(format!("failed to parse config YAML: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Serialize config to YAML string.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self)
            .map_err(|e| PromptError::Config(format!("failed to serialize config to YAML: {}", e)))
    }

    /// Validate config values and return error on invalid values.
    ///
    /// Validation rules:
    /// - parser delimiters must be non-empty
    /// - `wildcard_wrap` must not contain `/`
    /// - `wildcards.cache_limit` must be positive
    pub fn validate(&self) -> Result<()> {
        let empty = self.parser.empty_delimiters();
        if !empty.is_empty() {
            return Err(PromptError::Config(format!(
                "parser delimiters must not be empty: {}",
                empty.join(", ")
            )));
        }

        if self.parser.wildcard_wrap.contains('/') {
            return Err(PromptError::Config(format!(
                "wildcard_wrap must not contain '/', got '{}'",
                self.parser.wildcard_wrap
            )));
        }

        if self.wildcards.cache_limit == 0 {
            return Err(PromptError::Config(
                "wildcards.cache_limit must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

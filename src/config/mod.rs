// Configuration module
//
// One YAML file configures the URL codec, the descriptor defaults and the
// named shortcuts. Pattern shortcuts need code and are registered on the
// DescriptorRegistry directly.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use thiserror::Error;

use crate::descriptor::{Attributes, Descriptor};
use crate::shortcuts::{Defaults, DescriptorRegistry, SharedRegistry};
use crate::url::{CodecConfig, UrlCodec};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Environment variable '{0}' is referenced but not set")]
    MissingEnv(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub url: CodecConfig,
    #[serde(default)]
    pub defaults: Defaults,
    #[serde(default)]
    pub shortcuts: BTreeMap<String, Attributes>,
}

impl Config {
    pub fn from_yaml_with_env(yaml: &str) -> Result<Self, ConfigError> {
        // Replace ${VAR_NAME} with environment variable values
        let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;

        // First, check that all referenced environment variables exist
        for caps in re.captures_iter(yaml) {
            let var_name = &caps[1];
            if std::env::var(var_name).is_err() {
                return Err(ConfigError::MissingEnv(var_name.to_string()));
            }
        }

        let substituted = re.replace_all(yaml, |caps: &regex::Captures| {
            std::env::var(&caps[1]).unwrap_or_default()
        });

        Ok(serde_yaml::from_str(&substituted)?)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml_with_env(&yaml)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.url.validate().map_err(ConfigError::Invalid)?;

        for (name, attributes) in &self.shortcuts {
            Descriptor::new(attributes.clone()).map_err(|e| {
                ConfigError::Invalid(format!("shortcut '{}': {}", name, e))
            })?;
        }

        Ok(())
    }

    /// Registry with the configured defaults and named shortcuts
    pub fn build_registry(&self) -> DescriptorRegistry {
        let mut registry = DescriptorRegistry::new();
        registry.set_defaults(self.defaults.clone());
        for (name, attributes) in &self.shortcuts {
            registry.register_named(name.clone(), attributes.clone());
        }
        registry
    }

    /// Validate and build a codec sharing `registry`
    pub fn build_codec(&self, registry: SharedRegistry) -> Result<Arc<UrlCodec>, ConfigError> {
        self.validate()?;
        let codec = UrlCodec::new(self.url.clone(), registry)
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        Ok(Arc::new(codec))
    }
}

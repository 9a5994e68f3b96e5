use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_PATH_PREFIX, DEFAULT_PROTECT_FROM_TAMPERING, DEFAULT_SECRET, DEFAULT_SIGNATURE_LENGTH,
    MAX_SIGNATURE_LENGTH,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CodecConfig {
    /// Sign URLs and require a valid signature when decoding
    #[serde(default = "default_protect_from_tampering")]
    pub protect_from_tampering: bool,

    /// Secret mixed into every signature
    #[serde(default = "default_secret")]
    pub secret: String,

    /// Number of hex characters kept from the digest
    #[serde(default = "default_signature_length")]
    pub signature_length: usize,

    /// Prefix every URL path starts with (e.g. "/media")
    #[serde(default = "default_path_prefix")]
    pub path_prefix: String,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            protect_from_tampering: DEFAULT_PROTECT_FROM_TAMPERING,
            secret: DEFAULT_SECRET.to_string(),
            signature_length: DEFAULT_SIGNATURE_LENGTH,
            path_prefix: DEFAULT_PATH_PREFIX.to_string(),
        }
    }
}

impl CodecConfig {
    /// Config with tamper protection disabled
    pub fn unprotected() -> Self {
        Self {
            protect_from_tampering: false,
            ..Default::default()
        }
    }

    pub fn with_path_prefix(mut self, path_prefix: impl Into<String>) -> Self {
        self.path_prefix = path_prefix.into();
        self
    }

    pub fn with_secret(mut self, secret: impl Into<String>) -> Self {
        self.secret = secret.into();
        self
    }

    pub fn with_signature_length(mut self, signature_length: usize) -> Self {
        self.signature_length = signature_length;
        self
    }

    /// Check the settings a codec cannot run safely without
    pub fn validate(&self) -> Result<(), String> {
        if self.signature_length == 0 || self.signature_length > MAX_SIGNATURE_LENGTH {
            return Err(format!(
                "signature_length {} must be between 1 and {}",
                self.signature_length, MAX_SIGNATURE_LENGTH
            ));
        }

        if self.protect_from_tampering && self.secret.is_empty() {
            return Err(
                "secret cannot be empty while protect_from_tampering is enabled".to_string(),
            );
        }

        if !self.path_prefix.is_empty() {
            if !self.path_prefix.starts_with('/') {
                return Err(format!(
                    "path_prefix '{}' does not start with /",
                    self.path_prefix
                ));
            }
            if self.path_prefix.ends_with('/') {
                return Err(format!(
                    "path_prefix '{}' must not end with /",
                    self.path_prefix
                ));
            }
        }

        Ok(())
    }
}

fn default_protect_from_tampering() -> bool {
    DEFAULT_PROTECT_FROM_TAMPERING
}

fn default_secret() -> String {
    DEFAULT_SECRET.to_string()
}

fn default_signature_length() -> usize {
    DEFAULT_SIGNATURE_LENGTH
}

fn default_path_prefix() -> String {
    DEFAULT_PATH_PREFIX.to_string()
}

//! # Configuration Management
//!
//! Centralized configuration for decoding limits and policies.
//!
//! Encoding is fully determined by the value being encoded and needs no
//! configuration. Decoding reads untrusted bytes, so the limits applied to
//! length prefixes and the treatment of non-canonical booleans are
//! configurable here.
//!
//! ## Configuration Sources
//! - TOML files via `from_file()` / `from_toml()`
//! - Environment variables via `from_env()`
//! - Direct instantiation with defaults
//!
//! ## Security Considerations
//! - `max_length` bounds every length prefix before any allocation happens
//! - The default boolean policy is strict so each value has one encoding

use crate::error::{constants, BorshError, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Width of every length prefix on the wire, in bytes
pub const LENGTH_PREFIX_SIZE: usize = 4;

/// Default maximum value accepted in a length prefix (16 M elements or bytes)
pub const DEFAULT_MAX_LENGTH: u32 = 16 * 1024 * 1024;

/// How a decoded boolean byte other than 0x00/0x01 is treated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BoolPolicy {
    /// Reject the byte with `BorshError::InvalidBool`
    #[default]
    Strict,
    /// Treat any non-zero byte as `true`
    Lenient,
}

/// Codec configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CodecConfig {
    /// Largest length prefix (string bytes or sequence elements) accepted on decode
    pub max_length: u32,

    /// Treatment of non-canonical boolean bytes
    #[serde(default)]
    pub bool_policy: BoolPolicy,

    /// Whether decode fails when the value does not consume the whole buffer
    #[serde(default)]
    pub reject_trailing_bytes: bool,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            max_length: DEFAULT_MAX_LENGTH,
            bool_policy: BoolPolicy::Strict,
            reject_trailing_bytes: false,
        }
    }
}

impl CodecConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = File::open(path).map_err(|e| {
            BorshError::ConfigError(format!("{}: {e}", constants::ERR_CONFIG_READ))
        })?;

        let mut contents = String::new();
        file.read_to_string(&mut contents).map_err(|e| {
            BorshError::ConfigError(format!("{}: {e}", constants::ERR_CONFIG_READ))
        })?;

        Self::from_toml(&contents)
    }

    /// Load configuration from TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str::<Self>(content).map_err(|e| {
            BorshError::ConfigError(format!("{}: {e}", constants::ERR_CONFIG_PARSE))
        })
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(max_length) = std::env::var("BORSH_CODEC_MAX_LENGTH") {
            config.max_length = max_length.parse::<u32>().map_err(|e| {
                BorshError::ConfigError(format!("Invalid BORSH_CODEC_MAX_LENGTH: {e}"))
            })?;
        }

        if let Ok(policy) = std::env::var("BORSH_CODEC_BOOL_POLICY") {
            config.bool_policy = match policy.to_ascii_lowercase().as_str() {
                "strict" => BoolPolicy::Strict,
                "lenient" => BoolPolicy::Lenient,
                other => {
                    return Err(BorshError::ConfigError(format!(
                        "Invalid BORSH_CODEC_BOOL_POLICY: '{other}' (expected 'strict' or 'lenient')"
                    )))
                }
            };
        }

        if let Ok(reject) = std::env::var("BORSH_CODEC_REJECT_TRAILING_BYTES") {
            config.reject_trailing_bytes = reject.parse::<bool>().map_err(|e| {
                BorshError::ConfigError(format!("Invalid BORSH_CODEC_REJECT_TRAILING_BYTES: {e}"))
            })?;
        }

        Ok(config)
    }

    /// Apply overrides to the default configuration
    pub fn default_with_overrides<F>(mutator: F) -> Self
    where
        F: FnOnce(&mut Self),
    {
        let mut config = Self::default();
        mutator(&mut config);
        config
    }

    /// Generate example configuration file content
    pub fn example_config() -> String {
        toml::to_string_pretty(&Self::default())
            .unwrap_or_else(|_| String::from("# Failed to generate example config"))
    }

    /// Save configuration to a file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self).map_err(|e| {
            BorshError::ConfigError(format!("Failed to serialize config: {e}"))
        })?;

        std::fs::write(path, content).map_err(|e| {
            BorshError::ConfigError(format!("{}: {e}", constants::ERR_CONFIG_WRITE))
        })?;

        Ok(())
    }

    /// Validate the configuration for common issues and misconfigurations
    ///
    /// Returns a list of validation errors. Empty list means configuration is valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.max_length == 0 {
            errors.push("Max length must be greater than 0".to_string());
        }

        if self.max_length > u32::MAX / 2 {
            errors.push(format!(
                "Max length very high: {} (ensure decoders can afford allocations of this size)",
                self.max_length
            ));
        }

        if self.bool_policy == BoolPolicy::Lenient {
            errors.push(
                "WARNING: Lenient boolean policy accepts non-canonical encodings".to_string(),
            );
        }

        errors
    }

    /// Validate and return Result - convenience method
    pub fn validate_strict(&self) -> Result<()> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(BorshError::ConfigError(format!(
                "Configuration validation failed:\n  - {}",
                errors.join("\n  - ")
            )))
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_toml_defaults_fill_optional_fields() {
        let config = CodecConfig::from_toml("max_length = 1024").unwrap();
        assert_eq!(config.max_length, 1024);
        assert_eq!(config.bool_policy, BoolPolicy::Strict);
        assert!(!config.reject_trailing_bytes);
    }

    #[test]
    fn test_bool_policy_lowercase_in_toml() {
        let config =
            CodecConfig::from_toml("max_length = 8\nbool_policy = \"lenient\"")
                .unwrap();
        assert_eq!(config.bool_policy, BoolPolicy::Lenient);
    }

    #[test]
    fn test_example_config_parses_back() {
        let text = CodecConfig::example_config();
        let parsed = CodecConfig::from_toml(&text).unwrap();
        assert_eq!(parsed, CodecConfig::default());
    }
}

//! Registry configuration

use pledge_types::DEFAULT_MAX_COMMITMENT_CHARS;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Who may create a pledge on behalf of another identity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DelegationPolicy {
    /// Any caller may create a pledge for any identity without a pledge.
    #[default]
    Open,
    /// `delegate` only succeeds when caller and target are the same.
    SelfOnly,
}

/// What `terminate` does with the associated fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminationPolicy {
    /// Only the commitment is removed; priority and temporal bound stay.
    #[default]
    RetainAssociated,
    /// The whole record is removed.
    Cascade,
}

/// Pledge registry configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Maximum commitment text length in characters
    pub max_commitment_chars: usize,

    pub delegation: DelegationPolicy,

    pub termination: TerminationPolicy,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            max_commitment_chars: DEFAULT_MAX_COMMITMENT_CHARS,
            delegation: DelegationPolicy::default(),
            termination: TerminationPolicy::default(),
        }
    }
}

impl RegistryConfig {
    /// Load configuration from a TOML file, falling back to defaults when
    /// the file does not exist.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> ConfigResult<Self> {
        let config: RegistryConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.max_commitment_chars == 0 {
            return Err(ConfigError::Invalid(
                "max_commitment_chars must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

//! Error types for building and restoring a registry.

use pledge_types::PledgeError;
use thiserror::Error;

use crate::config::ConfigError;

/// Errors raised while setting a registry up, as opposed to per-operation
/// [`PledgeError`]s.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Pledge(#[from] PledgeError),
}

//! Error types for pledge operations.

use thiserror::Error;

use crate::ids::{BlockHeight, PrincipalId};

/// Validation rejections. Always raised before any write.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidInput {
    #[error("commitment text must not be empty")]
    EmptyText,

    #[error("commitment text is {len} characters, limit is {max}")]
    TextTooLong { len: usize, max: usize },

    #[error("priority level {0} is outside 1..=3")]
    PriorityOutOfRange(u32),

    #[error("duration must be greater than zero")]
    NonPositiveDuration,

    #[error("deadline overflows: height {height} + duration {duration}")]
    DeadlineOverflow { height: BlockHeight, duration: u64 },
}

/// Storage-layer errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    #[error("backend error: {0}")]
    Backend(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Errors returned by registry operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PledgeError {
    /// The operation needs a pledge (or associated field) that is absent.
    #[error("no pledge found for {0}")]
    NotFound(PrincipalId),

    /// A pledge already exists for the identity.
    #[error("pledge already exists for {0}")]
    AlreadyExists(PrincipalId),

    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInput),

    /// Delegation refused because the registry only allows self-creation.
    #[error("{caller} may not create a pledge for {target}")]
    Unauthorized {
        caller: PrincipalId,
        target: PrincipalId,
    },

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Result type for pledge operations.
pub type PledgeResult<T> = Result<T, PledgeError>;

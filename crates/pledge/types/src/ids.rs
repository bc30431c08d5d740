//! Identity and height types.
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque principal identity supplied by the execution environment.
///
/// The registry trusts it as-is; equality is the only meaningful operation.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrincipalId(String);

impl PrincipalId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PrincipalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PrincipalId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Monotonic chain height, the time basis for deadlines.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct BlockHeight(pub u64);

impl BlockHeight {
    pub const GENESIS: BlockHeight = BlockHeight(0);

    pub fn new(height: u64) -> Self {
        Self(height)
    }

    pub fn value(self) -> u64 {
        self.0
    }

    /// Height `duration` blocks after `self`, or `None` on overflow.
    pub fn checked_add(self, duration: u64) -> Option<BlockHeight> {
        self.0.checked_add(duration).map(BlockHeight)
    }
}

impl fmt::Display for BlockHeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

//! The pledge aggregate and its parts.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::InvalidInput;
use crate::ids::{BlockHeight, PrincipalId};

/// Default character cap for commitment text.
pub const DEFAULT_MAX_COMMITMENT_CHARS: usize = 100;

// ── Commitment text ────────────────────────────────────────────────────

/// Non-empty commitment statement.
///
/// The character cap is a registry policy, so it is checked at
/// construction with [`CommitmentText::new`]. Deserialization only
/// enforces non-emptiness; callers restoring data re-check the cap with
/// [`CommitmentText::ensure_within`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CommitmentText(String);

impl CommitmentText {
    pub fn new(text: impl Into<String>, max_chars: usize) -> Result<Self, InvalidInput> {
        let text = Self::try_from(text.into())?;
        text.ensure_within(max_chars)?;
        Ok(text)
    }

    pub fn ensure_within(&self, max_chars: usize) -> Result<(), InvalidInput> {
        let len = self.char_len();
        if len > max_chars {
            return Err(InvalidInput::TextTooLong {
                len,
                max: max_chars,
            });
        }
        Ok(())
    }

    /// Length in Unicode scalar values.
    pub fn char_len(&self) -> usize {
        self.0.chars().count()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for CommitmentText {
    type Error = InvalidInput;

    fn try_from(text: String) -> Result<Self, Self::Error> {
        if text.is_empty() {
            return Err(InvalidInput::EmptyText);
        }
        Ok(Self(text))
    }
}

impl From<CommitmentText> for String {
    fn from(text: CommitmentText) -> Self {
        text.0
    }
}

impl fmt::Display for CommitmentText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ── Priority ───────────────────────────────────────────────────────────

/// Urgency weight of a pledge. Independent of fulfillment state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum PriorityWeight {
    Low = 1,
    Medium = 2,
    High = 3,
}

impl PriorityWeight {
    pub fn level(self) -> u32 {
        self as u32
    }
}

impl TryFrom<u32> for PriorityWeight {
    type Error = InvalidInput;

    fn try_from(level: u32) -> Result<Self, Self::Error> {
        match level {
            1 => Ok(PriorityWeight::Low),
            2 => Ok(PriorityWeight::Medium),
            3 => Ok(PriorityWeight::High),
            other => Err(InvalidInput::PriorityOutOfRange(other)),
        }
    }
}

impl From<PriorityWeight> for u32 {
    fn from(weight: PriorityWeight) -> Self {
        weight.level()
    }
}

// ── Temporal bound ─────────────────────────────────────────────────────

/// Deadline height plus a manually managed alert flag.
///
/// Nothing flips `alert_activated` when the deadline passes; that is the
/// job of whoever watches the chain height.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TemporalBound {
    pub deadline: BlockHeight,
    pub alert_activated: bool,
}

impl TemporalBound {
    /// Bound expiring `duration` blocks after `height`, alert cleared.
    pub fn starting_at(height: BlockHeight, duration: u64) -> Result<Self, InvalidInput> {
        if duration == 0 {
            return Err(InvalidInput::NonPositiveDuration);
        }
        let deadline = height
            .checked_add(duration)
            .ok_or(InvalidInput::DeadlineOverflow { height, duration })?;
        Ok(Self {
            deadline,
            alert_activated: false,
        })
    }

    pub fn is_due_at(&self, height: BlockHeight) -> bool {
        height >= self.deadline
    }
}

// ── Commitment and aggregate ───────────────────────────────────────────

/// The primary part of a pledge: statement and fulfillment flag.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Commitment {
    pub text: CommitmentText,
    pub fulfilled: bool,
}

impl Commitment {
    pub fn open(text: CommitmentText) -> Self {
        Self {
            text,
            fulfilled: false,
        }
    }
}

/// Everything the registry knows about one identity.
///
/// A pledge exists iff `commitment` is `Some`. `priority` and
/// `temporal_bound` are stored alongside but survive termination unless
/// the registry cascades.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PledgeRecord {
    pub owner: PrincipalId,
    pub commitment: Option<Commitment>,
    pub priority: Option<PriorityWeight>,
    pub temporal_bound: Option<TemporalBound>,
}

impl PledgeRecord {
    pub fn empty(owner: PrincipalId) -> Self {
        Self {
            owner,
            commitment: None,
            priority: None,
            temporal_bound: None,
        }
    }

    pub fn exists(&self) -> bool {
        self.commitment.is_some()
    }

    /// Associated fields left behind by a terminated commitment.
    pub fn is_orphaned(&self) -> bool {
        self.commitment.is_none() && (self.priority.is_some() || self.temporal_bound.is_some())
    }

    /// Nothing left worth storing.
    pub fn is_vacant(&self) -> bool {
        self.commitment.is_none() && self.priority.is_none() && self.temporal_bound.is_none()
    }

    pub fn view(&self) -> PledgeView {
        match &self.commitment {
            Some(c) => PledgeView {
                exists: true,
                text_length: c.text.char_len(),
                fulfilled: c.fulfilled,
            },
            None => PledgeView::absent(),
        }
    }
}

/// Fixed-shape read projection returned by `verify`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PledgeView {
    pub exists: bool,
    pub text_length: usize,
    pub fulfilled: bool,
}

impl PledgeView {
    pub fn absent() -> Self {
        Self::default()
    }
}

// ── Receipts ───────────────────────────────────────────────────────────

/// Mutating operations of the registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PledgeOperation {
    Initialize,
    Modify,
    AssignPriority,
    SetTemporalBoundary,
    SetAlert,
    Delegate,
    Terminate,
}

impl fmt::Display for PledgeOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PledgeOperation::Initialize => "initialize",
            PledgeOperation::Modify => "modify",
            PledgeOperation::AssignPriority => "assign_priority",
            PledgeOperation::SetTemporalBoundary => "set_temporal_boundary",
            PledgeOperation::SetAlert => "set_alert",
            PledgeOperation::Delegate => "delegate",
            PledgeOperation::Terminate => "terminate",
        };
        f.write_str(name)
    }
}

/// Confirmation returned by every successful mutation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PledgeReceipt {
    /// Identity whose record was written.
    pub owner: PrincipalId,
    pub operation: PledgeOperation,
}

impl PledgeReceipt {
    pub fn new(owner: PrincipalId, operation: PledgeOperation) -> Self {
        Self { owner, operation }
    }
}

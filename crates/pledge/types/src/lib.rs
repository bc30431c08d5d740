//! Core type definitions for the Pledge Registry.
//!
//! A pledge is one participant's commitment statement together with a
//! fulfillment flag, an optional priority weight and an optional temporal
//! bound (deadline height plus alert flag). Every participant owns at most
//! one pledge, keyed by its [`PrincipalId`].
//!
//! ```text
//!            initialize / delegate
//!   ABSENT ─────────────────────────▶ PRESENT ◀──┐
//!      ▲                                 │       │ modify / assign_priority /
//!      └──────────── terminate ──────────┘       │ set_temporal_boundary / set_alert
//!                                        └───────┘
//! ```
//!
//! Priority and temporal bound are associated fields of the same
//! [`PledgeRecord`], but they are not tied to the commitment's existence:
//! they may outlive a terminated commitment.

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![warn(rust_2018_idioms)]

pub mod error;
pub mod ids;
pub mod pledge;

// Re-export primary types at crate root for ergonomic use.
pub use error::{InvalidInput, PledgeError, PledgeResult, StorageError};
pub use ids::{BlockHeight, PrincipalId};
pub use pledge::{
    Commitment, CommitmentText, PledgeOperation, PledgeReceipt, PledgeRecord, PledgeView,
    PriorityWeight, TemporalBound, DEFAULT_MAX_COMMITMENT_CHARS,
};

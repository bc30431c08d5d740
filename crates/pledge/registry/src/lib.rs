//! # pledge-registry
//!
//! Tracks one pledge per participant: a commitment statement with a
//! fulfillment flag, an optional priority weight and an optional temporal
//! bound.
//!
//! ## Architecture
//!
//! ```text
//! caller identity ───────────▶ ┌──────────────────────────────┐
//!                              │ PledgeRegistry               │
//! RegistryConfig (TOML) ──────▶ │ initialize / delegate        │
//!                              │ modify / terminate           │
//! HeightSource ───────────────▶ │ assign_priority              │
//!                              │ set_temporal_boundary        │
//!                              │ set_alert / verify           │
//!                              └───────────────┬──────────────┘
//!                                              ▼
//!                              ┌──────────────────────────────┐
//!                              │ PledgeStore                  │
//!                              │ identity → PledgeRecord      │
//!                              └───────────────┬──────────────┘
//!                                              ▼
//!                              PledgeTables: commitments,
//!                              priorities, temporal_bounds
//! ```
//!
//! ## Operations
//!
//! | Operation               | Requires                  | Errors                      |
//! |-------------------------|---------------------------|-----------------------------|
//! | `initialize`            | no pledge for caller      | AlreadyExists, InvalidInput |
//! | `delegate`              | no pledge for target      | AlreadyExists, InvalidInput |
//! | `modify`                | pledge                    | NotFound, InvalidInput      |
//! | `assign_priority`       | pledge                    | NotFound, InvalidInput      |
//! | `set_temporal_boundary` | pledge                    | NotFound, InvalidInput      |
//! | `set_alert`             | pledge and temporal bound | NotFound                    |
//! | `terminate`             | pledge                    | NotFound                    |
//! | `verify`                | nothing                   | storage only                |

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![warn(rust_2018_idioms)]

pub mod config;
pub mod error;
pub mod height;
pub mod registry;
pub mod store;
pub mod tables;

// ── Re-exports ─────────────────────────────────────────────────────────

pub use config::{ConfigError, DelegationPolicy, RegistryConfig, TerminationPolicy};
pub use error::RegistryError;
pub use height::{FixedHeight, HeightSource, ManualHeight};
pub use registry::{PledgeRegistry, RegistrySummary};
pub use store::{InMemoryPledgeStore, PledgeStore, StorageResult};
pub use tables::PledgeTables;

pub use pledge_types::{
    BlockHeight, Commitment, CommitmentText, InvalidInput, PledgeError, PledgeOperation,
    PledgeReceipt, PledgeRecord, PledgeResult, PledgeView, PrincipalId, PriorityWeight,
    StorageError, TemporalBound,
};

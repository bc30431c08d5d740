//! Export and restore of the registry as its three logical tables.
//!
//! ```text
//! commitments      identity → (text, fulfilled)
//! priorities       identity → weight
//! temporal_bounds  identity → (deadline, alert_activated)
//! ```
//!
//! Each table is keyed independently, so orphaned priorities and bounds
//! round-trip as entries without a matching commitment.

use std::collections::BTreeMap;

use pledge_types::{
    Commitment, PledgeRecord, PrincipalId, PriorityWeight, StorageError, TemporalBound,
};
use serde::{Deserialize, Serialize};

/// The registry state as three identity-keyed tables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PledgeTables {
    #[serde(default)]
    pub commitments: BTreeMap<PrincipalId, Commitment>,
    #[serde(default)]
    pub priorities: BTreeMap<PrincipalId, PriorityWeight>,
    #[serde(default)]
    pub temporal_bounds: BTreeMap<PrincipalId, TemporalBound>,
}

impl PledgeTables {
    /// Split composite records into the three tables.
    pub fn from_records(records: impl IntoIterator<Item = PledgeRecord>) -> Self {
        let mut tables = Self::default();
        for record in records {
            if let Some(commitment) = record.commitment {
                tables.commitments.insert(record.owner.clone(), commitment);
            }
            if let Some(priority) = record.priority {
                tables.priorities.insert(record.owner.clone(), priority);
            }
            if let Some(bound) = record.temporal_bound {
                tables.temporal_bounds.insert(record.owner, bound);
            }
        }
        tables
    }

    /// Join the three tables back into one record per identity.
    pub fn into_records(self) -> Vec<PledgeRecord> {
        let mut joined: BTreeMap<PrincipalId, PledgeRecord> = BTreeMap::new();
        for (owner, commitment) in self.commitments {
            entry(&mut joined, owner).commitment = Some(commitment);
        }
        for (owner, priority) in self.priorities {
            entry(&mut joined, owner).priority = Some(priority);
        }
        for (owner, bound) in self.temporal_bounds {
            entry(&mut joined, owner).temporal_bound = Some(bound);
        }
        joined.into_values().collect()
    }

    pub fn to_json(&self) -> Result<String, StorageError> {
        serde_json::to_string_pretty(self).map_err(|e| StorageError::Serialization(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self, StorageError> {
        serde_json::from_str(json).map_err(|e| StorageError::Serialization(e.to_string()))
    }
}

fn entry(joined: &mut BTreeMap<PrincipalId, PledgeRecord>, owner: PrincipalId) -> &mut PledgeRecord {
    joined
        .entry(owner.clone())
        .or_insert_with(|| PledgeRecord::empty(owner))
}

//! The pledge registry: every operation over pledge records.
//!
//! Each mutation validates everything first and then commits with a single
//! store write, so a failed call leaves the store exactly as it was.

use std::sync::Arc;

use pledge_types::{
    BlockHeight, Commitment, CommitmentText, PledgeError, PledgeOperation, PledgeReceipt,
    PledgeRecord, PledgeResult, PledgeView, PrincipalId, PriorityWeight, TemporalBound,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::{ConfigResult, DelegationPolicy, RegistryConfig, TerminationPolicy};
use crate::error::RegistryError;
use crate::height::HeightSource;
use crate::store::{InMemoryPledgeStore, PledgeStore};
use crate::tables::PledgeTables;

// ── Pledge Registry ─────────────────────────────────────────────────────

/// Single authority over all pledge records.
///
/// Mutations take `&mut self`: operations run one at a time, in the order
/// the environment submits them.
pub struct PledgeRegistry<S: PledgeStore = InMemoryPledgeStore> {
    store: S,
    heights: Arc<dyn HeightSource>,
    config: RegistryConfig,
}

impl PledgeRegistry<InMemoryPledgeStore> {
    /// Create an empty in-memory registry.
    pub fn new(config: RegistryConfig, heights: Arc<dyn HeightSource>) -> ConfigResult<Self> {
        config.validate()?;
        Ok(Self::assemble(InMemoryPledgeStore::new(), config, heights))
    }

    /// Rebuild an in-memory registry from exported tables.
    ///
    /// Every commitment text is re-checked against the configured cap.
    pub fn from_tables(
        tables: PledgeTables,
        config: RegistryConfig,
        heights: Arc<dyn HeightSource>,
    ) -> Result<Self, RegistryError> {
        let store = InMemoryPledgeStore::new();
        for record in tables.into_records() {
            store.save(record).map_err(PledgeError::from)?;
        }
        let registry = Self::with_store(store, config, heights)?;
        info!(
            records = registry.store.records().map_err(PledgeError::from)?.len(),
            "pledge registry restored from tables"
        );
        Ok(registry)
    }
}

impl<S: PledgeStore> PledgeRegistry<S> {
    /// Create a registry over an existing, possibly populated store.
    ///
    /// Stored commitment texts must fit the configured cap.
    pub fn with_store(
        store: S,
        config: RegistryConfig,
        heights: Arc<dyn HeightSource>,
    ) -> Result<Self, RegistryError> {
        config.validate()?;
        for record in store.records().map_err(PledgeError::from)? {
            if let Some(commitment) = &record.commitment {
                commitment
                    .text
                    .ensure_within(config.max_commitment_chars)
                    .map_err(PledgeError::from)?;
            }
        }
        Ok(Self::assemble(store, config, heights))
    }

    fn assemble(store: S, config: RegistryConfig, heights: Arc<dyn HeightSource>) -> Self {
        info!(
            max_commitment_chars = config.max_commitment_chars,
            delegation = ?config.delegation,
            termination = ?config.termination,
            "pledge registry created"
        );
        Self {
            store,
            heights,
            config,
        }
    }

    /// Configuration accessor.
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    // ── Commitment lifecycle ────────────────────────────────────────────

    /// Create the caller's own pledge.
    pub fn initialize(&mut self, caller: &PrincipalId, text: &str) -> PledgeResult<PledgeReceipt> {
        self.create(caller, text, PledgeOperation::Initialize)
    }

    /// Create a pledge on behalf of `target`.
    ///
    /// Under [`DelegationPolicy::Open`] any caller may do this for any
    /// identity that has no pledge yet.
    pub fn delegate(
        &mut self,
        caller: &PrincipalId,
        target: &PrincipalId,
        text: &str,
    ) -> PledgeResult<PledgeReceipt> {
        if self.config.delegation == DelegationPolicy::SelfOnly && caller != target {
            return Err(PledgeError::Unauthorized {
                caller: caller.clone(),
                target: target.clone(),
            });
        }
        self.create(target, text, PledgeOperation::Delegate)
    }

    /// Replace the text and fulfillment flag of the caller's pledge.
    pub fn modify(
        &mut self,
        caller: &PrincipalId,
        text: &str,
        fulfilled: bool,
    ) -> PledgeResult<PledgeReceipt> {
        let mut record = self.load_pledge(caller)?;
        let text = self.commitment_text(text)?;

        record.commitment = Some(Commitment { text, fulfilled });
        self.store.save(record)?;

        debug!(owner = %caller, operation = %PledgeOperation::Modify, fulfilled, "pledge modified");
        Ok(PledgeReceipt::new(caller.clone(), PledgeOperation::Modify))
    }

    /// Remove the caller's pledge.
    ///
    /// With [`TerminationPolicy::RetainAssociated`] the priority and
    /// temporal bound stay readable afterwards.
    pub fn terminate(&mut self, caller: &PrincipalId) -> PledgeResult<PledgeReceipt> {
        let mut record = self.load_pledge(caller)?;

        match self.config.termination {
            TerminationPolicy::RetainAssociated => {
                record.commitment = None;
                if record.is_vacant() {
                    self.store.remove(caller)?;
                } else {
                    self.store.save(record)?;
                }
            }
            TerminationPolicy::Cascade => {
                self.store.remove(caller)?;
            }
        }

        debug!(
            owner = %caller,
            operation = %PledgeOperation::Terminate,
            termination = ?self.config.termination,
            "pledge terminated"
        );
        Ok(PledgeReceipt::new(caller.clone(), PledgeOperation::Terminate))
    }

    // ── Associated fields ───────────────────────────────────────────────

    /// Set or overwrite the caller's priority. `level` must be 1, 2 or 3.
    pub fn assign_priority(
        &mut self,
        caller: &PrincipalId,
        level: u32,
    ) -> PledgeResult<PledgeReceipt> {
        let mut record = self.load_pledge(caller)?;
        let weight = PriorityWeight::try_from(level)?;

        record.priority = Some(weight);
        self.store.save(record)?;

        debug!(
            owner = %caller,
            operation = %PledgeOperation::AssignPriority,
            level = weight.level(),
            "priority assigned"
        );
        Ok(PledgeReceipt::new(caller.clone(), PledgeOperation::AssignPriority))
    }

    /// Set the deadline to `current height + duration` and clear the alert.
    pub fn set_temporal_boundary(
        &mut self,
        caller: &PrincipalId,
        duration: u64,
    ) -> PledgeResult<PledgeReceipt> {
        let mut record = self.load_pledge(caller)?;
        let height = self.heights.current_height();
        let bound = TemporalBound::starting_at(height, duration)?;

        record.temporal_bound = Some(bound);
        self.store.save(record)?;

        debug!(
            owner = %caller,
            operation = %PledgeOperation::SetTemporalBoundary,
            height = height.value(),
            deadline = bound.deadline.value(),
            "temporal boundary set"
        );
        Ok(PledgeReceipt::new(caller.clone(), PledgeOperation::SetTemporalBoundary))
    }

    /// Manually raise or clear the alert on the caller's temporal bound.
    pub fn set_alert(&mut self, caller: &PrincipalId, active: bool) -> PledgeResult<PledgeReceipt> {
        let mut record = self.load_pledge(caller)?;
        let bound = record
            .temporal_bound
            .as_mut()
            .ok_or_else(|| PledgeError::NotFound(caller.clone()))?;

        bound.alert_activated = active;
        self.store.save(record)?;

        debug!(owner = %caller, operation = %PledgeOperation::SetAlert, active, "alert updated");
        Ok(PledgeReceipt::new(caller.clone(), PledgeOperation::SetAlert))
    }

    // ── Queries ─────────────────────────────────────────────────────────

    /// Fixed-shape view of a pledge. Absence is a normal result.
    pub fn verify(&self, owner: &PrincipalId) -> PledgeResult<PledgeView> {
        Ok(self
            .store
            .load(owner)?
            .map(|record| record.view())
            .unwrap_or_else(PledgeView::absent))
    }

    /// Full commitment (text and flag) for `owner`, if a pledge exists.
    pub fn commitment_of(&self, owner: &PrincipalId) -> PledgeResult<Option<Commitment>> {
        Ok(self.store.load(owner)?.and_then(|record| record.commitment))
    }

    /// Priority stored for `owner`, including one left behind by `terminate`.
    pub fn priority_of(&self, owner: &PrincipalId) -> PledgeResult<Option<PriorityWeight>> {
        Ok(self.store.load(owner)?.and_then(|record| record.priority))
    }

    /// Temporal bound stored for `owner`, including one left behind by `terminate`.
    pub fn temporal_bound_of(&self, owner: &PrincipalId) -> PledgeResult<Option<TemporalBound>> {
        Ok(self
            .store
            .load(owner)?
            .and_then(|record| record.temporal_bound))
    }

    /// Live pledges whose deadline has been reached at `height` and whose
    /// alert is still clear. Read-only; raising the alert is up to the caller.
    pub fn bounds_due_at(
        &self,
        height: BlockHeight,
    ) -> PledgeResult<Vec<(PrincipalId, TemporalBound)>> {
        Ok(self
            .store
            .records()?
            .into_iter()
            .filter(|record| record.exists())
            .filter_map(|record| match record.temporal_bound {
                Some(bound) if bound.is_due_at(height) && !bound.alert_activated => {
                    Some((record.owner, bound))
                }
                _ => None,
            })
            .collect())
    }

    /// Compute summary statistics.
    pub fn summary(&self) -> PledgeResult<RegistrySummary> {
        let mut s = RegistrySummary::default();
        for record in self.store.records()? {
            if let Some(commitment) = &record.commitment {
                s.pledges += 1;
                if commitment.fulfilled {
                    s.fulfilled += 1;
                }
            }
            if record.priority.is_some() {
                s.priorities += 1;
            }
            if record.temporal_bound.is_some() {
                s.temporal_bounds += 1;
            }
            if record.is_orphaned() {
                s.orphaned += 1;
            }
        }
        Ok(s)
    }

    /// Export the registry as its three logical tables.
    pub fn tables(&self) -> PledgeResult<PledgeTables> {
        Ok(PledgeTables::from_records(self.store.records()?))
    }

    // ── Internal ────────────────────────────────────────────────────────

    fn create(
        &mut self,
        owner: &PrincipalId,
        text: &str,
        operation: PledgeOperation,
    ) -> PledgeResult<PledgeReceipt> {
        let mut record = self
            .store
            .load(owner)?
            .unwrap_or_else(|| PledgeRecord::empty(owner.clone()));
        let text = self.commitment_text(text)?;
        if record.exists() {
            return Err(PledgeError::AlreadyExists(owner.clone()));
        }

        record.commitment = Some(Commitment::open(text));
        self.store.save(record)?;

        debug!(owner = %owner, operation = %operation, "pledge created");
        Ok(PledgeReceipt::new(owner.clone(), operation))
    }

    fn load_pledge(&self, owner: &PrincipalId) -> PledgeResult<PledgeRecord> {
        self.store
            .load(owner)?
            .filter(PledgeRecord::exists)
            .ok_or_else(|| PledgeError::NotFound(owner.clone()))
    }

    fn commitment_text(&self, text: &str) -> PledgeResult<CommitmentText> {
        Ok(CommitmentText::new(text, self.config.max_commitment_chars)?)
    }
}

/// Counts over every stored record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrySummary {
    pub pledges: usize,
    pub fulfilled: usize,
    pub priorities: usize,
    pub temporal_bounds: usize,
    /// Records holding a priority or bound but no commitment.
    pub orphaned: usize,
}

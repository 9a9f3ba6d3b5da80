use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::desk::inventory::catalog::{CatalogError, VehicleCatalog};
use crate::desk::inventory::domain::{Vehicle, VehicleId};

use super::domain::{
    Lead, LeadId, LeadIntake, LeadStatus, Proposal, ProposalDraft, ProposalId, ProposalStatus,
};
use super::financing::{self, FinancingError, FinancingPolicy};
use super::query::{self, LeadFilter, ProposalFilter};
use super::repository::{LeadRepository, ProposalRepository, RepositoryError};
use super::sweep::{self, SweepFailure, SweepReport};
use super::views::{self, LeadView, ProposalView};

/// Service composing the repositories, the catalog lookup, and the
/// financing rules. Every mutation funnels through here so the same
/// validation applies whether a proposal arrives by fresh authoring,
/// duplication, or lead conversion.
pub struct DeskService<L, P, C> {
    leads: Arc<L>,
    proposals: Arc<P>,
    catalog: Arc<C>,
    policy: FinancingPolicy,
}

static LEAD_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static PROPOSAL_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_lead_id() -> LeadId {
    let id = LEAD_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    LeadId(format!("lead-{id:06}"))
}

fn next_proposal_id() -> ProposalId {
    let id = PROPOSAL_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ProposalId(format!("prop-{id:06}"))
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

impl<L, P, C> DeskService<L, P, C>
where
    L: LeadRepository + 'static,
    P: ProposalRepository + 'static,
    C: VehicleCatalog + 'static,
{
    pub fn new(leads: Arc<L>, proposals: Arc<P>, catalog: Arc<C>) -> Self {
        Self::with_policy(FinancingPolicy::default(), leads, proposals, catalog)
    }

    pub fn with_policy(
        policy: FinancingPolicy,
        leads: Arc<L>,
        proposals: Arc<P>,
        catalog: Arc<C>,
    ) -> Self {
        Self {
            leads,
            proposals,
            catalog,
            policy,
        }
    }

    /// Registers an inquiry. New leads always enter the pipeline as `new`
    /// with their creation time fixed at `now`.
    pub fn create_lead(&self, intake: LeadIntake, now: DateTime<Utc>) -> Result<Lead, DeskError> {
        let name = non_empty(intake.name);
        let email = non_empty(intake.email);
        let (Some(name), Some(email)) = (name, email) else {
            return Err(DeskError::IncompleteContact);
        };

        self.require_vehicle(&intake.vehicle_id)?;

        let lead = Lead {
            id: next_lead_id(),
            name,
            email,
            phone: intake.phone.trim().to_string(),
            vehicle_id: intake.vehicle_id,
            message: intake.message.and_then(non_empty),
            status: LeadStatus::New,
            created_at: now,
        };

        Ok(self.leads.insert(lead)?)
    }

    /// Administrative status assignment; any defined status is accepted.
    pub fn set_lead_status(&self, id: &LeadId, status: LeadStatus) -> Result<Lead, DeskError> {
        Ok(self.leads.update(id, &mut |lead| lead.set_status(status))?)
    }

    pub fn lead(&self, id: &LeadId) -> Result<Lead, DeskError> {
        Ok(self.leads.fetch(id)?.ok_or(RepositoryError::NotFound)?)
    }

    /// Leads matching `filter`, ranked by priority score at `now`.
    pub fn list_leads(&self, filter: &LeadFilter, now: DateTime<Utc>) -> Result<Vec<Lead>, DeskError> {
        Ok(query::filter_leads(self.leads.all()?, filter, now))
    }

    /// Administrative delete. The engine never removes a lead on its own
    /// initiative; this exists for back-office overrides only.
    pub fn remove_lead(&self, id: &LeadId) -> Result<(), DeskError> {
        Ok(self.leads.remove(id)?)
    }

    /// Authors a proposal. The financing calculator validates the money
    /// fields and the catalog must resolve the vehicle; the stored record
    /// always starts in `draft` with no milestones stamped.
    pub fn create_proposal(
        &self,
        draft: ProposalDraft,
        now: DateTime<Utc>,
    ) -> Result<Proposal, DeskError> {
        let client_name = non_empty(draft.client_name);
        let client_email = non_empty(draft.client_email);
        let (Some(client_name), Some(client_email)) = (client_name, client_email) else {
            return Err(DeskError::IncompleteClient);
        };

        self.require_vehicle(&draft.vehicle_id)?;

        let terms = financing::resolve_terms(draft.proposal_type, draft.total_value, draft.terms)?;
        let valid_until = financing::resolve_validity(now.date_naive(), draft.valid_until)?;

        let proposal = Proposal {
            id: next_proposal_id(),
            client_name,
            client_email,
            client_phone: draft.client_phone.and_then(non_empty),
            vehicle_id: draft.vehicle_id,
            proposal_type: draft.proposal_type,
            total_value: draft.total_value,
            terms,
            special_offer: draft.special_offer.and_then(non_empty),
            status: ProposalStatus::Draft,
            valid_until,
            created_at: now,
            sent_at: None,
            viewed_at: None,
            responded_at: None,
        };

        Ok(self.proposals.insert(proposal)?)
    }

    /// Clones an existing proposal into a fresh draft: same client, vehicle,
    /// and money fields, but a new identifier, no milestones, and a validity
    /// window counted from `now`. The clone passes through the calculator
    /// again like any other draft.
    pub fn duplicate_proposal(
        &self,
        id: &ProposalId,
        now: DateTime<Utc>,
    ) -> Result<Proposal, DeskError> {
        let source = self.proposals.fetch(id)?.ok_or(RepositoryError::NotFound)?;

        let draft = ProposalDraft {
            client_name: source.client_name,
            client_email: source.client_email,
            client_phone: source.client_phone,
            vehicle_id: source.vehicle_id,
            proposal_type: source.proposal_type,
            total_value: source.total_value,
            terms: source.terms,
            special_offer: source.special_offer,
            valid_until: None,
        };

        self.create_proposal(draft, now)
    }

    /// Administrative status assignment with the milestone stamping rules
    /// applied inside the record lock.
    pub fn set_proposal_status(
        &self,
        id: &ProposalId,
        status: ProposalStatus,
        now: DateTime<Utc>,
    ) -> Result<Proposal, DeskError> {
        Ok(self
            .proposals
            .update(id, &mut |proposal| proposal.apply_status(status, now))?)
    }

    pub fn proposal(&self, id: &ProposalId) -> Result<Proposal, DeskError> {
        Ok(self.proposals.fetch(id)?.ok_or(RepositoryError::NotFound)?)
    }

    /// Proposals matching `filter`, accepted deals first.
    pub fn list_proposals(&self, filter: &ProposalFilter) -> Result<Vec<Proposal>, DeskError> {
        Ok(query::filter_proposals(self.proposals.all()?, filter))
    }

    /// Administrative delete, bypassing the state machine.
    pub fn remove_proposal(&self, id: &ProposalId) -> Result<(), DeskError> {
        Ok(self.proposals.remove(id)?)
    }

    /// One idempotent expiry pass: every proposal past its validity date
    /// and still in a non-terminal state transitions to `expired`. The
    /// eligibility check repeats inside the record lock, so a concurrent
    /// move to a terminal state between snapshot and write wins and the
    /// pass leaves the record alone. A failure on one proposal is recorded
    /// and the scan continues.
    pub fn run_expiry_sweep(&self, now: DateTime<Utc>) -> Result<SweepReport, DeskError> {
        let snapshot = self.proposals.all()?;
        let today = now.date_naive();

        let mut report = SweepReport {
            scanned: snapshot.len(),
            ..SweepReport::default()
        };

        for proposal in snapshot {
            if !sweep::past_validity(&proposal, today) {
                continue;
            }

            let mut transitioned = false;
            let outcome = self.proposals.update(&proposal.id, &mut |current| {
                if sweep::past_validity(current, today) {
                    current.apply_status(ProposalStatus::Expired, now);
                    transitioned = true;
                }
            });

            match outcome {
                Ok(_) if transitioned => report.expired += 1,
                Ok(_) => {}
                Err(error) => report.failures.push(SweepFailure {
                    proposal_id: proposal.id.clone(),
                    reason: error.to_string(),
                }),
            }
        }

        Ok(report)
    }

    /// Resolves a catalog vehicle or fails with `UnknownVehicle`.
    pub fn vehicle(&self, id: &VehicleId) -> Result<Vehicle, DeskError> {
        self.require_vehicle(id)
    }

    pub fn vehicles(&self) -> Result<Vec<Vehicle>, DeskError> {
        Ok(self.catalog.all()?)
    }

    /// Display composition for a single lead. Catalog enrichment is
    /// best-effort: an unavailable catalog leaves the summary out rather
    /// than failing the read.
    pub fn compose_lead(&self, lead: Lead, now: DateTime<Utc>) -> LeadView {
        let vehicle = self.catalog.vehicle(&lead.vehicle_id).ok().flatten();
        views::lead_view(lead, vehicle, now)
    }

    /// Display composition for a single proposal.
    pub fn compose_proposal(&self, proposal: Proposal) -> ProposalView {
        let vehicle = self.catalog.vehicle(&proposal.vehicle_id).ok().flatten();
        views::proposal_view(proposal, vehicle, &self.policy)
    }

    fn require_vehicle(&self, id: &VehicleId) -> Result<Vehicle, DeskError> {
        self.catalog
            .vehicle(id)?
            .ok_or_else(|| DeskError::UnknownVehicle(id.clone()))
    }
}

/// Error raised by the desk service.
#[derive(Debug, thiserror::Error)]
pub enum DeskError {
    #[error("vehicle '{0}' is not in the catalog")]
    UnknownVehicle(VehicleId),
    #[error("lead contact requires a name and email")]
    IncompleteContact,
    #[error("proposal client requires a name and email")]
    IncompleteClient,
    #[error(transparent)]
    Financing(#[from] FinancingError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

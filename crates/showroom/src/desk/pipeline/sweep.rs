use chrono::NaiveDate;
use serde::Serialize;

use super::domain::{Proposal, ProposalId};

/// Outcome of one expiry pass over the proposal store.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SweepReport {
    pub scanned: usize,
    pub expired: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<SweepFailure>,
}

/// A proposal the pass could not transition. The pass records it and
/// moves on; one stuck record never aborts the scan.
#[derive(Debug, Clone, Serialize)]
pub struct SweepFailure {
    pub proposal_id: ProposalId,
    pub reason: String,
}

/// A proposal is expirable once today is past its validity date and it has
/// not already reached a terminal state. Proposals stay live through the
/// whole of their `valid_until` day.
pub(crate) fn past_validity(proposal: &Proposal, today: NaiveDate) -> bool {
    today > proposal.valid_until && !proposal.status.is_terminal()
}

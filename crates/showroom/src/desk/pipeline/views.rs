use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::desk::inventory::domain::{Vehicle, VehicleId, VehicleStatus};

use super::domain::{
    FinancingTerms, Lead, LeadId, LeadStatus, Proposal, ProposalId, ProposalStatus, ProposalType,
};
use super::financing::{FinancingPolicy, PaymentCheck};
use super::scoring::priority_score;

/// Catalog fields surfaced alongside a lead or proposal.
#[derive(Debug, Clone, Serialize)]
pub struct VehicleSummary {
    pub id: VehicleId,
    pub make: String,
    pub model: String,
    pub year: u16,
    pub list_price: u32,
    pub status: VehicleStatus,
    pub status_label: &'static str,
}

impl From<Vehicle> for VehicleSummary {
    fn from(vehicle: Vehicle) -> Self {
        Self {
            id: vehicle.id,
            make: vehicle.make,
            model: vehicle.model,
            year: vehicle.year,
            list_price: vehicle.list_price,
            status: vehicle.status,
            status_label: vehicle.status.label(),
        }
    }
}

/// Lead as rendered to the back office, with the derived priority score.
#[derive(Debug, Clone, Serialize)]
pub struct LeadView {
    pub id: LeadId,
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub status: LeadStatus,
    pub status_label: &'static str,
    pub priority_score: i64,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vehicle: Option<VehicleSummary>,
}

pub(crate) fn lead_view(lead: Lead, vehicle: Option<Vehicle>, now: DateTime<Utc>) -> LeadView {
    let score = priority_score(&lead, now);

    LeadView {
        id: lead.id,
        name: lead.name,
        email: lead.email,
        phone: lead.phone,
        message: lead.message,
        status: lead.status,
        status_label: lead.status.label(),
        priority_score: score,
        created_at: lead.created_at,
        vehicle: vehicle.map(VehicleSummary::from),
    }
}

/// Proposal as rendered to the back office, with the advisory payment
/// check for financed deals.
#[derive(Debug, Clone, Serialize)]
pub struct ProposalView {
    pub id: ProposalId,
    pub client_name: String,
    pub client_email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_phone: Option<String>,
    pub proposal_type: ProposalType,
    pub proposal_type_label: &'static str,
    pub total_value: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub terms: Option<FinancingTerms>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_check: Option<PaymentCheck>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub special_offer: Option<String>,
    pub status: ProposalStatus,
    pub status_label: &'static str,
    pub valid_until: NaiveDate,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sent_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub viewed_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub responded_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vehicle: Option<VehicleSummary>,
}

pub(crate) fn proposal_view(
    proposal: Proposal,
    vehicle: Option<Vehicle>,
    policy: &FinancingPolicy,
) -> ProposalView {
    let payment_check = proposal
        .terms
        .as_ref()
        .map(|terms| policy.payment_check(proposal.total_value, terms));

    ProposalView {
        id: proposal.id,
        client_name: proposal.client_name,
        client_email: proposal.client_email,
        client_phone: proposal.client_phone,
        proposal_type: proposal.proposal_type,
        proposal_type_label: proposal.proposal_type.label(),
        total_value: proposal.total_value,
        terms: proposal.terms,
        payment_check,
        special_offer: proposal.special_offer,
        status: proposal.status,
        status_label: proposal.status.label(),
        valid_until: proposal.valid_until,
        created_at: proposal.created_at,
        sent_at: proposal.sent_at,
        viewed_at: proposal.viewed_at,
        responded_at: proposal.responded_at,
        vehicle: vehicle.map(VehicleSummary::from),
    }
}

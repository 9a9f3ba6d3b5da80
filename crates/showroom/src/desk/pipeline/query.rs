use chrono::{DateTime, Utc};

use crate::desk::inventory::domain::VehicleId;

use super::domain::{Lead, LeadStatus, Proposal, ProposalStatus};
use super::scoring::priority_score;

/// Predicates applied to lead listings. All are conjunctive; an unset
/// field matches everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LeadFilter {
    pub status: Option<LeadStatus>,
    pub vehicle_id: Option<VehicleId>,
    pub search: Option<String>,
}

/// Predicates applied to proposal listings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProposalFilter {
    pub status: Option<ProposalStatus>,
    pub vehicle_id: Option<VehicleId>,
    pub search: Option<String>,
}

/// Filters and ranks leads: highest priority score first, ties broken by
/// newest creation. Pure; never touches stored state.
pub fn filter_leads(leads: Vec<Lead>, filter: &LeadFilter, now: DateTime<Utc>) -> Vec<Lead> {
    let needle = search_needle(filter.search.as_deref());

    let mut matched: Vec<Lead> = leads
        .into_iter()
        .filter(|lead| {
            filter.status.map_or(true, |status| lead.status == status)
                && filter
                    .vehicle_id
                    .as_ref()
                    .map_or(true, |vehicle| &lead.vehicle_id == vehicle)
                && needle
                    .as_deref()
                    .map_or(true, |needle| lead_matches(lead, needle))
        })
        .collect();

    matched.sort_by(|a, b| {
        priority_score(b, now)
            .cmp(&priority_score(a, now))
            .then_with(|| b.created_at.cmp(&a.created_at))
    });

    matched
}

/// Filters and ranks proposals: accepted deals surface first, then newest
/// creation. Pure; never touches stored state.
pub fn filter_proposals(proposals: Vec<Proposal>, filter: &ProposalFilter) -> Vec<Proposal> {
    let needle = search_needle(filter.search.as_deref());

    let mut matched: Vec<Proposal> = proposals
        .into_iter()
        .filter(|proposal| {
            filter
                .status
                .map_or(true, |status| proposal.status == status)
                && filter
                    .vehicle_id
                    .as_ref()
                    .map_or(true, |vehicle| &proposal.vehicle_id == vehicle)
                && needle
                    .as_deref()
                    .map_or(true, |needle| proposal_matches(proposal, needle))
        })
        .collect();

    matched.sort_by(|a, b| {
        accepted_rank(a)
            .cmp(&accepted_rank(b))
            .then_with(|| b.created_at.cmp(&a.created_at))
    });

    matched
}

fn accepted_rank(proposal: &Proposal) -> u8 {
    match proposal.status {
        ProposalStatus::Accepted => 0,
        _ => 1,
    }
}

fn search_needle(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|needle| !needle.is_empty())
        .map(str::to_lowercase)
}

fn lead_matches(lead: &Lead, needle: &str) -> bool {
    contains_ci(&lead.name, needle)
        || contains_ci(&lead.email, needle)
        || lead
            .message
            .as_deref()
            .is_some_and(|message| contains_ci(message, needle))
}

fn proposal_matches(proposal: &Proposal, needle: &str) -> bool {
    contains_ci(&proposal.client_name, needle)
        || contains_ci(&proposal.client_email, needle)
        || proposal
            .special_offer
            .as_deref()
            .is_some_and(|offer| contains_ci(offer, needle))
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

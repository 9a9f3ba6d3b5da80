//! Lead & proposal lifecycle engine.
//!
//! The repositories are the single source of truth. Scoring and filtering
//! operate on snapshots, the state machines mutate records atomically
//! through the repository, and the expiry sweep is the only path that
//! expires proposals automatically; reads never mutate anything.

pub mod domain;
pub(crate) mod financing;
pub mod query;
pub mod repository;
pub mod router;
pub(crate) mod scoring;
pub mod service;
pub mod sweep;
mod transitions;
pub mod views;

#[cfg(test)]
mod tests;

pub use domain::{
    FinancingTerms, Lead, LeadId, LeadIntake, LeadStatus, Proposal, ProposalDraft, ProposalId,
    ProposalStatus, ProposalType, StatusParseError,
};
pub use financing::{
    FinancingError, FinancingPolicy, PaymentCheck, ALLOWED_LOAN_TERMS, DEFAULT_VALIDITY_DAYS,
};
pub use query::{LeadFilter, ProposalFilter};
pub use repository::{LeadRepository, ProposalRepository, RepositoryError};
pub use router::desk_router;
pub use service::{DeskError, DeskService};
pub use sweep::{SweepFailure, SweepReport};
pub use views::{LeadView, ProposalView, VehicleSummary};

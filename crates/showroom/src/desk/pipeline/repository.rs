use super::domain::{Lead, LeadId, Proposal, ProposalId};

/// Storage abstraction for leads so the service module can be exercised in
/// isolation. `update` runs the mutation under the store's record lock and
/// returns the committed state, so concurrent transitions on one record
/// serialize instead of clobbering each other.
pub trait LeadRepository: Send + Sync {
    fn insert(&self, lead: Lead) -> Result<Lead, RepositoryError>;
    fn update(
        &self,
        id: &LeadId,
        apply: &mut dyn FnMut(&mut Lead),
    ) -> Result<Lead, RepositoryError>;
    fn fetch(&self, id: &LeadId) -> Result<Option<Lead>, RepositoryError>;
    fn remove(&self, id: &LeadId) -> Result<(), RepositoryError>;
    fn all(&self) -> Result<Vec<Lead>, RepositoryError>;
}

/// Storage abstraction for proposals, with the same atomic `update`
/// contract as [`LeadRepository`].
pub trait ProposalRepository: Send + Sync {
    fn insert(&self, proposal: Proposal) -> Result<Proposal, RepositoryError>;
    fn update(
        &self,
        id: &ProposalId,
        apply: &mut dyn FnMut(&mut Proposal),
    ) -> Result<Proposal, RepositoryError>;
    fn fetch(&self, id: &ProposalId) -> Result<Option<Proposal>, RepositoryError>;
    fn remove(&self, id: &ProposalId) -> Result<(), RepositoryError>;
    fn all(&self) -> Result<Vec<Proposal>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::Value;

use crate::desk::inventory::catalog::{CatalogError, VehicleCatalog};
use crate::desk::inventory::domain::{Vehicle, VehicleId, VehicleStatus};
use crate::desk::pipeline::domain::{
    FinancingTerms, Lead, LeadId, LeadIntake, LeadStatus, Proposal, ProposalDraft, ProposalId,
    ProposalStatus, ProposalType,
};
use crate::desk::pipeline::repository::{LeadRepository, ProposalRepository, RepositoryError};
use crate::desk::pipeline::{desk_router, DeskService};

pub(super) fn opening_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 7, 14, 9, 0, 0)
        .single()
        .expect("valid time")
}

pub(super) fn days_after(days: i64) -> DateTime<Utc> {
    opening_time() + Duration::days(days)
}

pub(super) fn intake() -> LeadIntake {
    LeadIntake {
        name: "Marina Duarte".to_string(),
        email: "marina.duarte@example.com".to_string(),
        phone: "+55 11 98877-1020".to_string(),
        vehicle_id: VehicleId("veh-1001".to_string()),
        message: Some("Interested in a weekend test drive".to_string()),
    }
}

pub(super) fn cash_draft() -> ProposalDraft {
    ProposalDraft {
        client_name: "Otavio Ramos".to_string(),
        client_email: "otavio.ramos@example.com".to_string(),
        client_phone: Some("+55 11 97711-3344".to_string()),
        vehicle_id: VehicleId("veh-1002".to_string()),
        proposal_type: ProposalType::Cash,
        total_value: 145_500,
        terms: None,
        special_offer: Some("Window tint included".to_string()),
        valid_until: None,
    }
}

pub(super) fn financing_terms() -> FinancingTerms {
    FinancingTerms {
        down_payment: 39_900,
        monthly_payment: 3_303,
        interest_rate: 14.4,
        loan_term_months: 48,
    }
}

pub(super) fn financing_draft() -> ProposalDraft {
    ProposalDraft {
        client_name: "Helena Prado".to_string(),
        client_email: "helena.prado@example.com".to_string(),
        client_phone: None,
        vehicle_id: VehicleId("veh-1001".to_string()),
        proposal_type: ProposalType::Financing,
        total_value: 159_900,
        terms: Some(financing_terms()),
        special_offer: None,
        valid_until: None,
    }
}

pub(super) fn lead_named(
    id: &str,
    name: &str,
    email: &str,
    status: LeadStatus,
    created_at: DateTime<Utc>,
) -> Lead {
    Lead {
        id: LeadId(id.to_string()),
        name: name.to_string(),
        email: email.to_string(),
        phone: String::new(),
        vehicle_id: VehicleId("veh-1001".to_string()),
        message: None,
        status,
        created_at,
    }
}

pub(super) fn proposal_named(
    id: &str,
    client_name: &str,
    status: ProposalStatus,
    created_at: DateTime<Utc>,
) -> Proposal {
    Proposal {
        id: ProposalId(id.to_string()),
        client_name: client_name.to_string(),
        client_email: format!("{id}@example.com"),
        client_phone: None,
        vehicle_id: VehicleId("veh-1002".to_string()),
        proposal_type: ProposalType::Cash,
        total_value: 145_500,
        terms: None,
        special_offer: None,
        status,
        valid_until: created_at.date_naive() + Duration::days(14),
        created_at,
        sent_at: None,
        viewed_at: None,
        responded_at: None,
    }
}

pub(super) fn showroom_vehicles() -> Vec<Vehicle> {
    vec![
        Vehicle {
            id: VehicleId("veh-1001".to_string()),
            make: "Honda".to_string(),
            model: "Civic Touring".to_string(),
            year: 2024,
            list_price: 159_900,
            status: VehicleStatus::Available,
        },
        Vehicle {
            id: VehicleId("veh-1002".to_string()),
            make: "Toyota".to_string(),
            model: "Corolla XEi".to_string(),
            year: 2023,
            list_price: 145_500,
            status: VehicleStatus::Available,
        },
        Vehicle {
            id: VehicleId("veh-1003".to_string()),
            make: "Jeep".to_string(),
            model: "Compass Longitude".to_string(),
            year: 2024,
            list_price: 189_990,
            status: VehicleStatus::Reserved,
        },
        Vehicle {
            id: VehicleId("veh-1004".to_string()),
            make: "Hyundai".to_string(),
            model: "HB20 Comfort".to_string(),
            year: 2022,
            list_price: 79_900,
            status: VehicleStatus::Sold,
        },
    ]
}

#[derive(Clone)]
pub(super) struct FixedCatalog {
    vehicles: Vec<Vehicle>,
}

impl Default for FixedCatalog {
    fn default() -> Self {
        Self {
            vehicles: showroom_vehicles(),
        }
    }
}

impl VehicleCatalog for FixedCatalog {
    fn vehicle(&self, id: &VehicleId) -> Result<Option<Vehicle>, CatalogError> {
        Ok(self
            .vehicles
            .iter()
            .find(|vehicle| &vehicle.id == id)
            .cloned())
    }

    fn all(&self) -> Result<Vec<Vehicle>, CatalogError> {
        Ok(self.vehicles.clone())
    }
}

pub(super) struct OfflineCatalog;

impl VehicleCatalog for OfflineCatalog {
    fn vehicle(&self, _id: &VehicleId) -> Result<Option<Vehicle>, CatalogError> {
        Err(CatalogError::Unavailable("inventory feed offline".to_string()))
    }

    fn all(&self) -> Result<Vec<Vehicle>, CatalogError> {
        Err(CatalogError::Unavailable("inventory feed offline".to_string()))
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryLeads {
    records: Arc<Mutex<HashMap<LeadId, Lead>>>,
}

impl LeadRepository for MemoryLeads {
    fn insert(&self, lead: Lead) -> Result<Lead, RepositoryError> {
        let mut guard = self.records.lock().expect("lead mutex poisoned");
        if guard.contains_key(&lead.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(lead.id.clone(), lead.clone());
        Ok(lead)
    }

    fn update(
        &self,
        id: &LeadId,
        apply: &mut dyn FnMut(&mut Lead),
    ) -> Result<Lead, RepositoryError> {
        let mut guard = self.records.lock().expect("lead mutex poisoned");
        let lead = guard.get_mut(id).ok_or(RepositoryError::NotFound)?;
        apply(lead);
        Ok(lead.clone())
    }

    fn fetch(&self, id: &LeadId) -> Result<Option<Lead>, RepositoryError> {
        let guard = self.records.lock().expect("lead mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn remove(&self, id: &LeadId) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("lead mutex poisoned");
        guard
            .remove(id)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }

    fn all(&self) -> Result<Vec<Lead>, RepositoryError> {
        let guard = self.records.lock().expect("lead mutex poisoned");
        Ok(guard.values().cloned().collect())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryProposals {
    records: Arc<Mutex<HashMap<ProposalId, Proposal>>>,
}

impl ProposalRepository for MemoryProposals {
    fn insert(&self, proposal: Proposal) -> Result<Proposal, RepositoryError> {
        let mut guard = self.records.lock().expect("proposal mutex poisoned");
        if guard.contains_key(&proposal.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(proposal.id.clone(), proposal.clone());
        Ok(proposal)
    }

    fn update(
        &self,
        id: &ProposalId,
        apply: &mut dyn FnMut(&mut Proposal),
    ) -> Result<Proposal, RepositoryError> {
        let mut guard = self.records.lock().expect("proposal mutex poisoned");
        let proposal = guard.get_mut(id).ok_or(RepositoryError::NotFound)?;
        apply(proposal);
        Ok(proposal.clone())
    }

    fn fetch(&self, id: &ProposalId) -> Result<Option<Proposal>, RepositoryError> {
        let guard = self.records.lock().expect("proposal mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn remove(&self, id: &ProposalId) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("proposal mutex poisoned");
        guard
            .remove(id)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }

    fn all(&self) -> Result<Vec<Proposal>, RepositoryError> {
        let guard = self.records.lock().expect("proposal mutex poisoned");
        Ok(guard.values().cloned().collect())
    }
}

/// Proposal store that refuses updates for one chosen record so sweep
/// partial-failure handling can be exercised.
#[derive(Default)]
pub(super) struct FlakyProposals {
    inner: MemoryProposals,
    refused: Mutex<Option<ProposalId>>,
}

impl FlakyProposals {
    pub(super) fn refuse(&self, id: ProposalId) {
        *self.refused.lock().expect("refusal mutex poisoned") = Some(id);
    }
}

impl ProposalRepository for FlakyProposals {
    fn insert(&self, proposal: Proposal) -> Result<Proposal, RepositoryError> {
        self.inner.insert(proposal)
    }

    fn update(
        &self,
        id: &ProposalId,
        apply: &mut dyn FnMut(&mut Proposal),
    ) -> Result<Proposal, RepositoryError> {
        let refused = self.refused.lock().expect("refusal mutex poisoned");
        if refused.as_ref() == Some(id) {
            return Err(RepositoryError::Unavailable(
                "record is write-locked".to_string(),
            ));
        }
        drop(refused);
        self.inner.update(id, apply)
    }

    fn fetch(&self, id: &ProposalId) -> Result<Option<Proposal>, RepositoryError> {
        self.inner.fetch(id)
    }

    fn remove(&self, id: &ProposalId) -> Result<(), RepositoryError> {
        self.inner.remove(id)
    }

    fn all(&self) -> Result<Vec<Proposal>, RepositoryError> {
        self.inner.all()
    }
}

pub(super) struct ConflictLeads;

impl LeadRepository for ConflictLeads {
    fn insert(&self, _lead: Lead) -> Result<Lead, RepositoryError> {
        Err(RepositoryError::Conflict)
    }

    fn update(
        &self,
        _id: &LeadId,
        _apply: &mut dyn FnMut(&mut Lead),
    ) -> Result<Lead, RepositoryError> {
        Err(RepositoryError::NotFound)
    }

    fn fetch(&self, _id: &LeadId) -> Result<Option<Lead>, RepositoryError> {
        Ok(None)
    }

    fn remove(&self, _id: &LeadId) -> Result<(), RepositoryError> {
        Err(RepositoryError::NotFound)
    }

    fn all(&self) -> Result<Vec<Lead>, RepositoryError> {
        Ok(Vec::new())
    }
}

pub(super) struct UnavailableLeads;

impl LeadRepository for UnavailableLeads {
    fn insert(&self, _lead: Lead) -> Result<Lead, RepositoryError> {
        Err(RepositoryError::Unavailable("lead store offline".to_string()))
    }

    fn update(
        &self,
        _id: &LeadId,
        _apply: &mut dyn FnMut(&mut Lead),
    ) -> Result<Lead, RepositoryError> {
        Err(RepositoryError::Unavailable("lead store offline".to_string()))
    }

    fn fetch(&self, _id: &LeadId) -> Result<Option<Lead>, RepositoryError> {
        Err(RepositoryError::Unavailable("lead store offline".to_string()))
    }

    fn remove(&self, _id: &LeadId) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("lead store offline".to_string()))
    }

    fn all(&self) -> Result<Vec<Lead>, RepositoryError> {
        Err(RepositoryError::Unavailable("lead store offline".to_string()))
    }
}

pub(super) fn build_service() -> (
    DeskService<MemoryLeads, MemoryProposals, FixedCatalog>,
    Arc<MemoryLeads>,
    Arc<MemoryProposals>,
) {
    let leads = Arc::new(MemoryLeads::default());
    let proposals = Arc::new(MemoryProposals::default());
    let catalog = Arc::new(FixedCatalog::default());
    let service = DeskService::new(leads.clone(), proposals.clone(), catalog);
    (service, leads, proposals)
}

pub(super) fn desk_router_with_service(
    service: DeskService<MemoryLeads, MemoryProposals, FixedCatalog>,
) -> axum::Router {
    desk_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use showroom::desk::inventory::{CatalogError, Vehicle, VehicleCatalog, VehicleId, VehicleStatus};
use showroom::desk::pipeline::{
    DeskService, Lead, LeadId, LeadRepository, Proposal, ProposalId, ProposalRepository,
    RepositoryError,
};
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryLeadRepository {
    records: Arc<Mutex<HashMap<LeadId, Lead>>>,
}

impl LeadRepository for InMemoryLeadRepository {
    fn insert(&self, lead: Lead) -> Result<Lead, RepositoryError> {
        let mut guard = self.records.lock().expect("lead repository mutex poisoned");
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
        let mut guard = self.records.lock().expect("lead repository mutex poisoned");
        let lead = guard.get_mut(id).ok_or(RepositoryError::NotFound)?;
        apply(lead);
        Ok(lead.clone())
    }

    fn fetch(&self, id: &LeadId) -> Result<Option<Lead>, RepositoryError> {
        let guard = self.records.lock().expect("lead repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn remove(&self, id: &LeadId) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("lead repository mutex poisoned");
        guard.remove(id).map(|_| ()).ok_or(RepositoryError::NotFound)
    }

    fn all(&self) -> Result<Vec<Lead>, RepositoryError> {
        let guard = self.records.lock().expect("lead repository mutex poisoned");
        Ok(guard.values().cloned().collect())
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryProposalRepository {
    records: Arc<Mutex<HashMap<ProposalId, Proposal>>>,
}

impl ProposalRepository for InMemoryProposalRepository {
    fn insert(&self, proposal: Proposal) -> Result<Proposal, RepositoryError> {
        let mut guard = self
            .records
            .lock()
            .expect("proposal repository mutex poisoned");
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
        let mut guard = self
            .records
            .lock()
            .expect("proposal repository mutex poisoned");
        let proposal = guard.get_mut(id).ok_or(RepositoryError::NotFound)?;
        apply(proposal);
        Ok(proposal.clone())
    }

    fn fetch(&self, id: &ProposalId) -> Result<Option<Proposal>, RepositoryError> {
        let guard = self
            .records
            .lock()
            .expect("proposal repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn remove(&self, id: &ProposalId) -> Result<(), RepositoryError> {
        let mut guard = self
            .records
            .lock()
            .expect("proposal repository mutex poisoned");
        guard.remove(id).map(|_| ()).ok_or(RepositoryError::NotFound)
    }

    fn all(&self) -> Result<Vec<Proposal>, RepositoryError> {
        let guard = self
            .records
            .lock()
            .expect("proposal repository mutex poisoned");
        Ok(guard.values().cloned().collect())
    }
}

/// Read-only inventory for the in-memory deployment. Production deployments
/// back [`VehicleCatalog`] with the dealership stock system instead.
#[derive(Default, Clone)]
pub(crate) struct InMemoryVehicleCatalog {
    vehicles: Vec<Vehicle>,
}

impl InMemoryVehicleCatalog {
    pub(crate) fn with_showroom_stock() -> Self {
        Self {
            vehicles: showroom_stock(),
        }
    }
}

impl VehicleCatalog for InMemoryVehicleCatalog {
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

pub(crate) type InMemoryDesk =
    DeskService<InMemoryLeadRepository, InMemoryProposalRepository, InMemoryVehicleCatalog>;

pub(crate) fn in_memory_desk() -> Arc<InMemoryDesk> {
    Arc::new(DeskService::new(
        Arc::new(InMemoryLeadRepository::default()),
        Arc::new(InMemoryProposalRepository::default()),
        Arc::new(InMemoryVehicleCatalog::with_showroom_stock()),
    ))
}

pub(crate) fn showroom_stock() -> Vec<Vehicle> {
    vec![
        Vehicle {
            id: VehicleId("veh-0001".to_string()),
            make: "Honda".to_string(),
            model: "Civic Touring".to_string(),
            year: 2024,
            list_price: 159_900,
            status: VehicleStatus::Available,
        },
        Vehicle {
            id: VehicleId("veh-0002".to_string()),
            make: "Toyota".to_string(),
            model: "Corolla XEi".to_string(),
            year: 2023,
            list_price: 145_500,
            status: VehicleStatus::Available,
        },
        Vehicle {
            id: VehicleId("veh-0003".to_string()),
            make: "Jeep".to_string(),
            model: "Compass Longitude".to_string(),
            year: 2024,
            list_price: 189_990,
            status: VehicleStatus::Available,
        },
        Vehicle {
            id: VehicleId("veh-0004".to_string()),
            make: "Hyundai".to_string(),
            model: "HB20 Comfort".to_string(),
            year: 2022,
            list_price: 79_900,
            status: VehicleStatus::Reserved,
        },
        Vehicle {
            id: VehicleId("veh-0005".to_string()),
            make: "Fiat".to_string(),
            model: "Pulse Audace".to_string(),
            year: 2023,
            list_price: 109_990,
            status: VehicleStatus::Negotiating,
        },
        Vehicle {
            id: VehicleId("veh-0006".to_string()),
            make: "Volkswagen".to_string(),
            model: "T-Cross Highline".to_string(),
            year: 2024,
            list_price: 164_990,
            status: VehicleStatus::Sold,
        },
    ]
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

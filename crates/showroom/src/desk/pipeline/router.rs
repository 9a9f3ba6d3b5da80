use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Router,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;

use crate::desk::inventory::catalog::VehicleCatalog;
use crate::desk::inventory::domain::VehicleId;

use super::domain::{LeadId, LeadIntake, LeadStatus, ProposalDraft, ProposalId, ProposalStatus};
use super::query::{LeadFilter, ProposalFilter};
use super::repository::{LeadRepository, ProposalRepository, RepositoryError};
use super::service::{DeskError, DeskService};

/// Router builder exposing the desk pipeline and the read-only inventory
/// lookups under `/api/v1`.
pub fn desk_router<L, P, C>(service: Arc<DeskService<L, P, C>>) -> Router
where
    L: LeadRepository + 'static,
    P: ProposalRepository + 'static,
    C: VehicleCatalog + 'static,
{
    Router::new()
        .route(
            "/api/v1/desk/leads",
            post(create_lead_handler::<L, P, C>).get(list_leads_handler::<L, P, C>),
        )
        .route(
            "/api/v1/desk/leads/:lead_id",
            get(lead_handler::<L, P, C>).delete(remove_lead_handler::<L, P, C>),
        )
        .route(
            "/api/v1/desk/leads/:lead_id/status",
            put(set_lead_status_handler::<L, P, C>),
        )
        .route(
            "/api/v1/desk/proposals",
            post(create_proposal_handler::<L, P, C>).get(list_proposals_handler::<L, P, C>),
        )
        .route(
            "/api/v1/desk/proposals/:proposal_id",
            get(proposal_handler::<L, P, C>).delete(remove_proposal_handler::<L, P, C>),
        )
        .route(
            "/api/v1/desk/proposals/:proposal_id/duplicate",
            post(duplicate_proposal_handler::<L, P, C>),
        )
        .route(
            "/api/v1/desk/proposals/:proposal_id/status",
            put(set_proposal_status_handler::<L, P, C>),
        )
        .route("/api/v1/desk/sweep", post(sweep_handler::<L, P, C>))
        .route(
            "/api/v1/inventory/vehicles",
            get(list_vehicles_handler::<L, P, C>),
        )
        .route(
            "/api/v1/inventory/vehicles/:vehicle_id",
            get(vehicle_handler::<L, P, C>),
        )
        .with_state(service)
}

/// Listing filters arrive as raw strings so unknown status values can be
/// rejected with a validation payload instead of a bare extractor error.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct LeadListParams {
    status: Option<String>,
    vehicle_id: Option<String>,
    search: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ProposalListParams {
    status: Option<String>,
    vehicle_id: Option<String>,
    search: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StatusChangeRequest {
    status: String,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct SweepRequest {
    #[serde(default)]
    now: Option<DateTime<Utc>>,
}

pub(crate) async fn create_lead_handler<L, P, C>(
    State(service): State<Arc<DeskService<L, P, C>>>,
    axum::Json(intake): axum::Json<LeadIntake>,
) -> Response
where
    L: LeadRepository + 'static,
    P: ProposalRepository + 'static,
    C: VehicleCatalog + 'static,
{
    let now = Utc::now();
    match service.create_lead(intake, now) {
        Ok(lead) => {
            let view = service.compose_lead(lead, now);
            (StatusCode::CREATED, axum::Json(view)).into_response()
        }
        Err(error) => desk_error_response(error),
    }
}

pub(crate) async fn list_leads_handler<L, P, C>(
    State(service): State<Arc<DeskService<L, P, C>>>,
    Query(params): Query<LeadListParams>,
) -> Response
where
    L: LeadRepository + 'static,
    P: ProposalRepository + 'static,
    C: VehicleCatalog + 'static,
{
    let status = match params.status.as_deref().map(str::parse::<LeadStatus>) {
        Some(Err(error)) => return validation_response(error),
        Some(Ok(status)) => Some(status),
        None => None,
    };

    let filter = LeadFilter {
        status,
        vehicle_id: params.vehicle_id.map(VehicleId),
        search: params.search,
    };

    let now = Utc::now();
    match service.list_leads(&filter, now) {
        Ok(leads) => {
            let views: Vec<_> = leads
                .into_iter()
                .map(|lead| service.compose_lead(lead, now))
                .collect();
            (StatusCode::OK, axum::Json(views)).into_response()
        }
        Err(error) => desk_error_response(error),
    }
}

pub(crate) async fn lead_handler<L, P, C>(
    State(service): State<Arc<DeskService<L, P, C>>>,
    Path(lead_id): Path<String>,
) -> Response
where
    L: LeadRepository + 'static,
    P: ProposalRepository + 'static,
    C: VehicleCatalog + 'static,
{
    match service.lead(&LeadId(lead_id)) {
        Ok(lead) => {
            let view = service.compose_lead(lead, Utc::now());
            (StatusCode::OK, axum::Json(view)).into_response()
        }
        Err(error) => desk_error_response(error),
    }
}

pub(crate) async fn set_lead_status_handler<L, P, C>(
    State(service): State<Arc<DeskService<L, P, C>>>,
    Path(lead_id): Path<String>,
    axum::Json(payload): axum::Json<StatusChangeRequest>,
) -> Response
where
    L: LeadRepository + 'static,
    P: ProposalRepository + 'static,
    C: VehicleCatalog + 'static,
{
    let status = match payload.status.parse::<LeadStatus>() {
        Ok(status) => status,
        Err(error) => return validation_response(error),
    };

    match service.set_lead_status(&LeadId(lead_id), status) {
        Ok(lead) => {
            let view = service.compose_lead(lead, Utc::now());
            (StatusCode::OK, axum::Json(view)).into_response()
        }
        Err(error) => desk_error_response(error),
    }
}

pub(crate) async fn remove_lead_handler<L, P, C>(
    State(service): State<Arc<DeskService<L, P, C>>>,
    Path(lead_id): Path<String>,
) -> Response
where
    L: LeadRepository + 'static,
    P: ProposalRepository + 'static,
    C: VehicleCatalog + 'static,
{
    match service.remove_lead(&LeadId(lead_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => desk_error_response(error),
    }
}

pub(crate) async fn create_proposal_handler<L, P, C>(
    State(service): State<Arc<DeskService<L, P, C>>>,
    axum::Json(draft): axum::Json<ProposalDraft>,
) -> Response
where
    L: LeadRepository + 'static,
    P: ProposalRepository + 'static,
    C: VehicleCatalog + 'static,
{
    match service.create_proposal(draft, Utc::now()) {
        Ok(proposal) => {
            let view = service.compose_proposal(proposal);
            (StatusCode::CREATED, axum::Json(view)).into_response()
        }
        Err(error) => desk_error_response(error),
    }
}

pub(crate) async fn list_proposals_handler<L, P, C>(
    State(service): State<Arc<DeskService<L, P, C>>>,
    Query(params): Query<ProposalListParams>,
) -> Response
where
    L: LeadRepository + 'static,
    P: ProposalRepository + 'static,
    C: VehicleCatalog + 'static,
{
    let status = match params.status.as_deref().map(str::parse::<ProposalStatus>) {
        Some(Err(error)) => return validation_response(error),
        Some(Ok(status)) => Some(status),
        None => None,
    };

    let filter = ProposalFilter {
        status,
        vehicle_id: params.vehicle_id.map(VehicleId),
        search: params.search,
    };

    match service.list_proposals(&filter) {
        Ok(proposals) => {
            let views: Vec<_> = proposals
                .into_iter()
                .map(|proposal| service.compose_proposal(proposal))
                .collect();
            (StatusCode::OK, axum::Json(views)).into_response()
        }
        Err(error) => desk_error_response(error),
    }
}

pub(crate) async fn proposal_handler<L, P, C>(
    State(service): State<Arc<DeskService<L, P, C>>>,
    Path(proposal_id): Path<String>,
) -> Response
where
    L: LeadRepository + 'static,
    P: ProposalRepository + 'static,
    C: VehicleCatalog + 'static,
{
    match service.proposal(&ProposalId(proposal_id)) {
        Ok(proposal) => {
            let view = service.compose_proposal(proposal);
            (StatusCode::OK, axum::Json(view)).into_response()
        }
        Err(error) => desk_error_response(error),
    }
}

pub(crate) async fn duplicate_proposal_handler<L, P, C>(
    State(service): State<Arc<DeskService<L, P, C>>>,
    Path(proposal_id): Path<String>,
) -> Response
where
    L: LeadRepository + 'static,
    P: ProposalRepository + 'static,
    C: VehicleCatalog + 'static,
{
    match service.duplicate_proposal(&ProposalId(proposal_id), Utc::now()) {
        Ok(proposal) => {
            let view = service.compose_proposal(proposal);
            (StatusCode::CREATED, axum::Json(view)).into_response()
        }
        Err(error) => desk_error_response(error),
    }
}

pub(crate) async fn set_proposal_status_handler<L, P, C>(
    State(service): State<Arc<DeskService<L, P, C>>>,
    Path(proposal_id): Path<String>,
    axum::Json(payload): axum::Json<StatusChangeRequest>,
) -> Response
where
    L: LeadRepository + 'static,
    P: ProposalRepository + 'static,
    C: VehicleCatalog + 'static,
{
    let status = match payload.status.parse::<ProposalStatus>() {
        Ok(status) => status,
        Err(error) => return validation_response(error),
    };

    match service.set_proposal_status(&ProposalId(proposal_id), status, Utc::now()) {
        Ok(proposal) => {
            let view = service.compose_proposal(proposal);
            (StatusCode::OK, axum::Json(view)).into_response()
        }
        Err(error) => desk_error_response(error),
    }
}

pub(crate) async fn remove_proposal_handler<L, P, C>(
    State(service): State<Arc<DeskService<L, P, C>>>,
    Path(proposal_id): Path<String>,
) -> Response
where
    L: LeadRepository + 'static,
    P: ProposalRepository + 'static,
    C: VehicleCatalog + 'static,
{
    match service.remove_proposal(&ProposalId(proposal_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => desk_error_response(error),
    }
}

pub(crate) async fn sweep_handler<L, P, C>(
    State(service): State<Arc<DeskService<L, P, C>>>,
    axum::Json(request): axum::Json<SweepRequest>,
) -> Response
where
    L: LeadRepository + 'static,
    P: ProposalRepository + 'static,
    C: VehicleCatalog + 'static,
{
    let now = request.now.unwrap_or_else(Utc::now);
    match service.run_expiry_sweep(now) {
        Ok(report) => (StatusCode::OK, axum::Json(report)).into_response(),
        Err(error) => desk_error_response(error),
    }
}

pub(crate) async fn list_vehicles_handler<L, P, C>(
    State(service): State<Arc<DeskService<L, P, C>>>,
) -> Response
where
    L: LeadRepository + 'static,
    P: ProposalRepository + 'static,
    C: VehicleCatalog + 'static,
{
    match service.vehicles() {
        Ok(vehicles) => (StatusCode::OK, axum::Json(vehicles)).into_response(),
        Err(error) => desk_error_response(error),
    }
}

pub(crate) async fn vehicle_handler<L, P, C>(
    State(service): State<Arc<DeskService<L, P, C>>>,
    Path(vehicle_id): Path<String>,
) -> Response
where
    L: LeadRepository + 'static,
    P: ProposalRepository + 'static,
    C: VehicleCatalog + 'static,
{
    match service.vehicle(&VehicleId(vehicle_id)) {
        Ok(vehicle) => (StatusCode::OK, axum::Json(vehicle)).into_response(),
        // A missing vehicle on this route is a plain 404, not a validation failure.
        Err(DeskError::UnknownVehicle(id)) => {
            let payload = json!({ "error": format!("vehicle '{id}' is not in the catalog") });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(error) => desk_error_response(error),
    }
}

fn desk_error_response(error: DeskError) -> Response {
    let status = match &error {
        DeskError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        DeskError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        DeskError::UnknownVehicle(_)
        | DeskError::IncompleteContact
        | DeskError::IncompleteClient
        | DeskError::Financing(_) => StatusCode::UNPROCESSABLE_ENTITY,
        DeskError::Repository(RepositoryError::Unavailable(_)) | DeskError::Catalog(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}

fn validation_response(error: impl std::fmt::Display) -> Response {
    let payload = json!({ "error": error.to_string() });
    (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
}

use crate::infra::AppState;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use showroom::desk::intake::LeadCsvImporter;
use showroom::desk::inventory::VehicleCatalog;
use showroom::desk::pipeline::{
    desk_router, DeskService, LeadRepository, LeadView, ProposalRepository,
};
use showroom::error::AppError;
use std::io::Cursor;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub(crate) struct LeadImportRequest {
    pub(crate) csv: String,
    #[serde(default)]
    pub(crate) received_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub(crate) struct LeadImportResponse {
    pub(crate) imported: usize,
    pub(crate) leads: Vec<LeadView>,
}

pub(crate) fn with_desk_routes<L, P, C>(service: Arc<DeskService<L, P, C>>) -> axum::Router
where
    L: LeadRepository + 'static,
    P: ProposalRepository + 'static,
    C: VehicleCatalog + 'static,
{
    desk_router(service.clone())
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/desk/leads/import",
            axum::routing::post(lead_import_endpoint::<L, P, C>).with_state(service),
        )
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

/// Bulk intake for storefront lead sheets. Rows register through the desk
/// service one by one, so a bad row aborts the sheet while earlier rows
/// stay registered; the storefront re-submits the remainder after fixing it.
pub(crate) async fn lead_import_endpoint<L, P, C>(
    State(service): State<Arc<DeskService<L, P, C>>>,
    Json(payload): Json<LeadImportRequest>,
) -> Result<Json<LeadImportResponse>, AppError>
where
    L: LeadRepository + 'static,
    P: ProposalRepository + 'static,
    C: VehicleCatalog + 'static,
{
    let LeadImportRequest { csv, received_at } = payload;
    let received_at = received_at.unwrap_or_else(Utc::now);

    let reader = Cursor::new(csv.into_bytes());
    let imported = LeadCsvImporter::from_reader(reader, &service, received_at)?;

    let leads: Vec<LeadView> = imported
        .into_iter()
        .map(|lead| service.compose_lead(lead, received_at))
        .collect();

    Ok(Json(LeadImportResponse {
        imported: leads.len(),
        leads,
    }))
}

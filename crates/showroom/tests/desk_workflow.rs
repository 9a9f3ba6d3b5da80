//! Integration specifications for the lead and proposal desk.
//!
//! Scenarios run end to end through the public service facade and the HTTP
//! router so ranking, financing validation, milestone stamping, and the
//! expiry sweep are exercised without reaching into private modules.

mod common {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use chrono::{DateTime, Duration, TimeZone, Utc};

    use showroom::desk::inventory::{
        CatalogError, Vehicle, VehicleCatalog, VehicleId, VehicleStatus,
    };
    use showroom::desk::pipeline::{
        DeskService, FinancingTerms, Lead, LeadId, LeadIntake, LeadRepository, Proposal,
        ProposalDraft, ProposalId, ProposalRepository, ProposalType, RepositoryError,
    };

    pub(super) fn showroom_open() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 7, 14, 9, 0, 0)
            .single()
            .expect("valid time")
    }

    pub(super) fn days_after(days: i64) -> DateTime<Utc> {
        showroom_open() + Duration::days(days)
    }

    pub(super) fn walk_in() -> LeadIntake {
        LeadIntake {
            name: "Marina Duarte".to_string(),
            email: "marina.duarte@example.com".to_string(),
            phone: "+55 11 98877-1020".to_string(),
            vehicle_id: VehicleId("veh-2001".to_string()),
            message: Some("Saw the Civic on the lot yesterday".to_string()),
        }
    }

    pub(super) fn financed_offer() -> ProposalDraft {
        ProposalDraft {
            client_name: "Marina Duarte".to_string(),
            client_email: "marina.duarte@example.com".to_string(),
            client_phone: Some("+55 11 98877-1020".to_string()),
            vehicle_id: VehicleId("veh-2001".to_string()),
            proposal_type: ProposalType::Financing,
            total_value: 159_900,
            terms: Some(FinancingTerms {
                down_payment: 39_900,
                monthly_payment: 3_303,
                interest_rate: 14.4,
                loan_term_months: 48,
            }),
            special_offer: Some("First revision on the house".to_string()),
            valid_until: None,
        }
    }

    #[derive(Clone)]
    pub(super) struct FixedCatalog {
        vehicles: Vec<Vehicle>,
    }

    impl Default for FixedCatalog {
        fn default() -> Self {
            Self {
                vehicles: vec![
                    Vehicle {
                        id: VehicleId("veh-2001".to_string()),
                        make: "Honda".to_string(),
                        model: "Civic Touring".to_string(),
                        year: 2024,
                        list_price: 159_900,
                        status: VehicleStatus::Available,
                    },
                    Vehicle {
                        id: VehicleId("veh-2002".to_string()),
                        make: "Toyota".to_string(),
                        model: "Corolla XEi".to_string(),
                        year: 2023,
                        list_price: 145_500,
                        status: VehicleStatus::Available,
                    },
                ],
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

    pub(super) fn build_service() -> DeskService<MemoryLeads, MemoryProposals, FixedCatalog> {
        DeskService::new(
            Arc::new(MemoryLeads::default()),
            Arc::new(MemoryProposals::default()),
            Arc::new(FixedCatalog::default()),
        )
    }
}

mod lifecycle {
    use super::common::*;
    use chrono::Duration;

    use showroom::desk::pipeline::{LeadFilter, LeadStatus, ProposalFilter, ProposalStatus};

    #[test]
    fn walk_in_becomes_an_accepted_deal() {
        let service = build_service();

        let lead = service
            .create_lead(walk_in(), showroom_open())
            .expect("lead registers");
        assert_eq!(lead.status, LeadStatus::New);

        service
            .set_lead_status(&lead.id, LeadStatus::Contacted)
            .expect("contacted");
        service
            .set_lead_status(&lead.id, LeadStatus::Qualified)
            .expect("qualified");

        let ranked = service
            .list_leads(&LeadFilter::default(), days_after(1))
            .expect("listing");
        assert_eq!(ranked[0].id, lead.id);

        let proposal = service
            .create_proposal(financed_offer(), days_after(1))
            .expect("proposal commits");
        assert_eq!(proposal.status, ProposalStatus::Draft);
        assert_eq!(
            proposal.valid_until,
            days_after(1).date_naive() + Duration::days(14)
        );

        service
            .set_proposal_status(&proposal.id, ProposalStatus::Sent, days_after(2))
            .expect("sent");
        service
            .set_proposal_status(&proposal.id, ProposalStatus::Viewed, days_after(3))
            .expect("viewed");
        let closed = service
            .set_proposal_status(&proposal.id, ProposalStatus::Accepted, days_after(4))
            .expect("accepted");

        assert_eq!(closed.status, ProposalStatus::Accepted);
        assert_eq!(closed.sent_at, Some(days_after(2)));
        assert_eq!(closed.viewed_at, Some(days_after(3)));
        assert_eq!(closed.responded_at, Some(days_after(4)));

        service
            .set_lead_status(&lead.id, LeadStatus::Converted)
            .expect("converted");

        let deals = service
            .list_proposals(&ProposalFilter::default())
            .expect("listing");
        assert_eq!(deals[0].id, closed.id);
    }

    #[test]
    fn rejected_deals_can_be_requoted_after_expiring() {
        let service = build_service();

        let mut offer = financed_offer();
        offer.valid_until = Some(showroom_open().date_naive() + Duration::days(2));
        let proposal = service
            .create_proposal(offer, showroom_open())
            .expect("proposal commits");
        service
            .set_proposal_status(&proposal.id, ProposalStatus::Sent, showroom_open())
            .expect("sent");

        let report = service.run_expiry_sweep(days_after(5)).expect("sweep runs");
        assert_eq!(report.scanned, 1);
        assert_eq!(report.expired, 1);
        assert!(report.failures.is_empty());

        let expired = service.proposal(&proposal.id).expect("proposal readable");
        assert_eq!(expired.status, ProposalStatus::Expired);
        assert!(expired.responded_at.is_none());

        let requote = service
            .duplicate_proposal(&proposal.id, days_after(5))
            .expect("duplication commits");
        assert_ne!(requote.id, proposal.id);
        assert_eq!(requote.status, ProposalStatus::Draft);
        assert_eq!(
            requote.valid_until,
            days_after(5).date_naive() + Duration::days(14)
        );
        assert!(requote.sent_at.is_none());

        let second = service.run_expiry_sweep(days_after(5)).expect("sweep runs");
        assert_eq!(second.scanned, 2);
        assert_eq!(second.expired, 0, "sweeps are idempotent");
    }
}

mod routing {
    use super::common::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    use showroom::desk::pipeline::desk_router;

    async fn read_json(response: axum::response::Response) -> Value {
        let body = to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("read body");
        serde_json::from_slice(&body).expect("json payload")
    }

    #[tokio::test]
    async fn desk_routes_cover_the_funnel() {
        let router = desk_router(Arc::new(build_service()));

        let created = router
            .clone()
            .oneshot(
                Request::post("/api/v1/desk/leads")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(serde_json::to_vec(&walk_in()).unwrap()))
                    .unwrap(),
            )
            .await
            .expect("route executes");
        assert_eq!(created.status(), StatusCode::CREATED);
        let lead = read_json(created).await;
        let lead_id = lead["id"].as_str().expect("identifier").to_string();
        assert_eq!(lead["status"], "new");
        assert_eq!(lead["vehicle"]["model"], "Civic Touring");

        let rejected = router
            .clone()
            .oneshot(
                Request::put(format!("/api/v1/desk/leads/{lead_id}/status"))
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        serde_json::to_vec(&json!({ "status": "sizzling" })).unwrap(),
                    ))
                    .unwrap(),
            )
            .await
            .expect("route executes");
        assert_eq!(rejected.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let qualified = router
            .clone()
            .oneshot(
                Request::put(format!("/api/v1/desk/leads/{lead_id}/status"))
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        serde_json::to_vec(&json!({ "status": "qualified" })).unwrap(),
                    ))
                    .unwrap(),
            )
            .await
            .expect("route executes");
        assert_eq!(qualified.status(), StatusCode::OK);
        let view = read_json(qualified).await;
        assert_eq!(view["status_label"], "Qualified");

        let offered = router
            .clone()
            .oneshot(
                Request::post("/api/v1/desk/proposals")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(serde_json::to_vec(&financed_offer()).unwrap()))
                    .unwrap(),
            )
            .await
            .expect("route executes");
        assert_eq!(offered.status(), StatusCode::CREATED);
        let proposal = read_json(offered).await;
        assert_eq!(proposal["payment_check"], "consistent");

        let swept = router
            .oneshot(
                Request::post("/api/v1/desk/sweep")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(serde_json::to_vec(&json!({})).unwrap()))
                    .unwrap(),
            )
            .await
            .expect("route executes");
        assert_eq!(swept.status(), StatusCode::OK);
        let report = read_json(swept).await;
        assert_eq!(report["expired"], 0, "a fresh draft has nothing to expire");
    }
}

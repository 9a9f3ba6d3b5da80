use crate::infra::{in_memory_desk, InMemoryDesk};
use chrono::{DateTime, Local, NaiveDate, NaiveTime, Utc};
use clap::Args;
use showroom::desk::intake::LeadCsvImporter;
use showroom::desk::inventory::VehicleId;
use showroom::desk::pipeline::{
    DeskError, FinancingTerms, Lead, LeadFilter, LeadIntake, LeadStatus, PaymentCheck, Proposal,
    ProposalDraft, ProposalFilter, ProposalId, ProposalStatus, ProposalType,
};
use showroom::error::AppError;
use std::path::PathBuf;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Day the walkthrough starts (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) opening_day: Option<NaiveDate>,
    /// Optional storefront lead sheet (CSV) to seed extra leads.
    #[arg(long)]
    pub(crate) lead_sheet: Option<PathBuf>,
    /// Skip the proposal portion of the demo.
    #[arg(long)]
    pub(crate) skip_proposals: bool,
}

#[derive(Args, Debug)]
pub(crate) struct LeadImportArgs {
    /// Path to the storefront lead sheet (CSV)
    #[arg(long)]
    pub(crate) file: PathBuf,
    /// Registration date for the imported rows (YYYY-MM-DD, defaults to today)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) received_on: Option<NaiveDate>,
}

pub(crate) fn run_lead_import(args: LeadImportArgs) -> Result<(), AppError> {
    let LeadImportArgs { file, received_on } = args;

    let received_at = match received_on {
        Some(date) => day_instant(date),
        None => Utc::now(),
    };

    let desk = in_memory_desk();
    let imported = LeadCsvImporter::from_path(file, &desk, received_at)?;

    println!("Imported {} leads from the storefront sheet", imported.len());
    render_lead_pipeline(&desk, received_at);

    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        opening_day,
        lead_sheet,
        skip_proposals,
    } = args;

    let opening_day = opening_day.unwrap_or_else(|| Local::now().date_naive());
    let day = |offset: i64| day_instant(opening_day) + chrono::Duration::days(offset);

    let desk = in_memory_desk();

    println!("Showroom sales desk demo");
    println!("Opening day: {opening_day}");

    render_inventory(&desk);

    println!("\nDay 0: two enquiries arrive");
    let marina = match desk.create_lead(walk_in_marina(), day(0)) {
        Ok(lead) => lead,
        Err(err) => {
            println!("  Lead registration failed: {err}");
            return Ok(());
        }
    };
    let rafael = match desk.create_lead(web_form_rafael(), day(0)) {
        Ok(lead) => lead,
        Err(err) => {
            println!("  Lead registration failed: {err}");
            return Ok(());
        }
    };
    println!("- Registered {} ({})", marina.name, marina.id);
    println!("- Registered {} ({})", rafael.name, rafael.id);

    if let Some(path) = lead_sheet {
        let imported = LeadCsvImporter::from_path(path, &desk, day(0))?;
        println!("- Imported {} more from the storefront sheet", imported.len());
    }

    println!("\nDay 3: the desk works the funnel");
    let advanced = desk
        .set_lead_status(&marina.id, LeadStatus::Qualified)
        .and_then(|_| desk.set_lead_status(&rafael.id, LeadStatus::Contacted));
    if let Err(err) = advanced {
        println!("  Status assignment failed: {err}");
        return Ok(());
    }
    println!("- {} qualified after a test drive", marina.name);
    println!("- {} contacted by phone", rafael.name);
    render_lead_pipeline(&desk, day(3));

    if skip_proposals {
        return Ok(());
    }

    println!("\nDay 3: a financed offer goes out");
    let proposal = match desk.create_proposal(financed_civic(&marina), day(3)) {
        Ok(proposal) => proposal,
        Err(err) => {
            println!("  Proposal rejected by the desk: {err}");
            return Ok(());
        }
    };
    let view = desk.compose_proposal(proposal.clone());
    println!(
        "- Drafted {} for {} (valid until {})",
        proposal.id, proposal.client_name, proposal.valid_until
    );
    if let Some(terms) = &proposal.terms {
        println!(
            "  Financing: {} down, {} per month over {} months at {}%",
            terms.down_payment, terms.monthly_payment, terms.loan_term_months, terms.interest_rate
        );
    }
    match view.payment_check {
        Some(PaymentCheck::Consistent) => {
            println!("  Payment check: consistent with the amortization table");
        }
        Some(PaymentCheck::Review) => {
            println!("  Payment check: flagged for review against the amortization table");
        }
        None => {}
    }

    let accepted = match walk_to_acceptance(&desk, &proposal.id, &day) {
        Ok(proposal) => proposal,
        Err(err) => {
            println!("  Milestone assignment failed: {err}");
            return Ok(());
        }
    };
    render_milestones(&accepted);

    if let Err(err) = desk.set_lead_status(&marina.id, LeadStatus::Converted) {
        println!("  Conversion failed: {err}");
        return Ok(());
    }
    println!("- {} marked converted; the lead drops to the pipeline floor", marina.name);

    println!("\nDay 6: a cash offer is rejected and requoted");
    let requote = match rejected_cash_requote(&desk, &rafael, &day) {
        Ok(proposal) => proposal,
        Err(err) => {
            println!("  Requote failed: {err}");
            return Ok(());
        }
    };
    println!(
        "- Fresh draft {} keeps the deal terms, valid until {}",
        requote.id, requote.valid_until
    );

    println!("\nDay 25: the nightly expiry pass runs");
    match desk.run_expiry_sweep(day(25)) {
        Ok(report) => {
            println!(
                "- Sweep scanned {} proposals and expired {}",
                report.scanned, report.expired
            );
            for failure in &report.failures {
                println!("  Left unswept: {} ({})", failure.proposal_id, failure.reason);
            }
        }
        Err(err) => {
            println!("  Sweep failed: {err}");
            return Ok(());
        }
    }

    render_proposal_board(&desk);

    match serde_json::to_string_pretty(&desk.compose_proposal(accepted)) {
        Ok(json) => println!("\nAccepted proposal payload:\n{json}"),
        Err(err) => println!("\nAccepted proposal payload unavailable: {err}"),
    }

    Ok(())
}

/// Pins demo timestamps to showroom opening so reruns with the same dates
/// print the same scores.
fn day_instant(date: NaiveDate) -> DateTime<Utc> {
    let opening = NaiveTime::from_hms_opt(9, 0, 0).unwrap_or(NaiveTime::MIN);
    date.and_time(opening).and_utc()
}

fn walk_in_marina() -> LeadIntake {
    LeadIntake {
        name: "Marina Duarte".to_string(),
        email: "marina.duarte@example.com".to_string(),
        phone: "11 99876-1001".to_string(),
        vehicle_id: VehicleId("veh-0001".to_string()),
        message: Some("Saw the Civic on the floor, wants financing numbers".to_string()),
    }
}

fn web_form_rafael() -> LeadIntake {
    LeadIntake {
        name: "Rafael Nogueira".to_string(),
        email: "rafael.nogueira@example.com".to_string(),
        phone: String::new(),
        vehicle_id: VehicleId("veh-0002".to_string()),
        message: None,
    }
}

fn financed_civic(lead: &Lead) -> ProposalDraft {
    ProposalDraft {
        client_name: lead.name.clone(),
        client_email: lead.email.clone(),
        client_phone: Some(lead.phone.clone()),
        vehicle_id: lead.vehicle_id.clone(),
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

fn cash_corolla(lead: &Lead) -> ProposalDraft {
    ProposalDraft {
        client_name: lead.name.clone(),
        client_email: lead.email.clone(),
        client_phone: None,
        vehicle_id: lead.vehicle_id.clone(),
        proposal_type: ProposalType::Cash,
        total_value: 145_500,
        terms: None,
        special_offer: Some("Window tint included".to_string()),
        valid_until: None,
    }
}

fn walk_to_acceptance(
    desk: &InMemoryDesk,
    id: &ProposalId,
    day: &impl Fn(i64) -> DateTime<Utc>,
) -> Result<Proposal, DeskError> {
    desk.set_proposal_status(id, ProposalStatus::Sent, day(4))?;
    desk.set_proposal_status(id, ProposalStatus::Viewed, day(5))?;
    desk.set_proposal_status(id, ProposalStatus::Accepted, day(6))
}

fn rejected_cash_requote(
    desk: &InMemoryDesk,
    lead: &Lead,
    day: &impl Fn(i64) -> DateTime<Utc>,
) -> Result<Proposal, DeskError> {
    let cash = desk.create_proposal(cash_corolla(lead), day(3))?;
    desk.set_proposal_status(&cash.id, ProposalStatus::Sent, day(4))?;
    desk.set_proposal_status(&cash.id, ProposalStatus::Rejected, day(6))?;
    println!("- {} turned down {}", lead.name, cash.id);

    desk.duplicate_proposal(&cash.id, day(6))
}

fn render_inventory(desk: &InMemoryDesk) {
    println!("\nInventory on the floor");
    match desk.vehicles() {
        Ok(vehicles) => {
            for vehicle in vehicles {
                println!(
                    "- {} | {} {} {} | list price {} | {}",
                    vehicle.id,
                    vehicle.year,
                    vehicle.make,
                    vehicle.model,
                    vehicle.list_price,
                    vehicle.status.label()
                );
            }
        }
        Err(err) => println!("  Inventory unavailable: {err}"),
    }
}

fn render_lead_pipeline(desk: &InMemoryDesk, now: DateTime<Utc>) {
    println!("\nLead pipeline, hottest first");
    let leads = match desk.list_leads(&LeadFilter::default(), now) {
        Ok(leads) => leads,
        Err(err) => {
            println!("  Pipeline unavailable: {err}");
            return;
        }
    };

    for lead in leads {
        let view = desk.compose_lead(lead, now);
        let vehicle = view
            .vehicle
            .map(|vehicle| format!("{} {}", vehicle.make, vehicle.model))
            .unwrap_or_else(|| "vehicle unknown".to_string());
        println!(
            "- [{:>3}] {} | {} | {}",
            view.priority_score, view.name, view.status_label, vehicle
        );
    }
}

fn render_proposal_board(desk: &InMemoryDesk) {
    println!("\nProposal board, accepted deals first");
    let proposals = match desk.list_proposals(&ProposalFilter::default()) {
        Ok(proposals) => proposals,
        Err(err) => {
            println!("  Board unavailable: {err}");
            return;
        }
    };

    for proposal in proposals {
        println!(
            "- {} | {} | {} | valid until {}",
            proposal.id,
            proposal.client_name,
            proposal.status.label(),
            proposal.valid_until
        );
    }
}

fn render_milestones(proposal: &Proposal) {
    let stamp = |milestone: Option<DateTime<Utc>>| match milestone {
        Some(at) => at.date_naive().to_string(),
        None => "-".to_string(),
    };

    println!(
        "- Milestones for {}: sent {} | viewed {} | responded {}",
        proposal.id,
        stamp(proposal.sent_at),
        stamp(proposal.viewed_at),
        stamp(proposal.responded_at)
    );
}

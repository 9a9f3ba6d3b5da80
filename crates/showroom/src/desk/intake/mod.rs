mod normalizer;
mod parser;

use std::io::Read;
use std::path::Path;

use chrono::{DateTime, Utc};

use crate::desk::inventory::catalog::VehicleCatalog;
use crate::desk::inventory::domain::VehicleId;
use crate::desk::pipeline::domain::{Lead, LeadIntake, LeadStatus, StatusParseError};
use crate::desk::pipeline::repository::{LeadRepository, ProposalRepository};
use crate::desk::pipeline::service::{DeskError, DeskService};

/// Errors raised while importing a lead sheet.
#[derive(Debug, thiserror::Error)]
pub enum LeadImportError {
    #[error("failed to read lead sheet: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid lead CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("lead sheet row carries an unknown status: {0}")]
    Status(#[from] StatusParseError),
    #[error("could not register imported lead: {0}")]
    Desk(#[from] DeskError),
}

/// Imports leads exported from the storefront contact sheet. Every row
/// passes through the desk service, so imported leads obey the same
/// validation and enter the pipeline as `new`; a `Status` column, when
/// present, is applied afterwards as an administrative assignment.
pub struct LeadCsvImporter;

impl LeadCsvImporter {
    pub fn from_path<F, L, P, C>(
        path: F,
        service: &DeskService<L, P, C>,
        now: DateTime<Utc>,
    ) -> Result<Vec<Lead>, LeadImportError>
    where
        F: AsRef<Path>,
        L: LeadRepository + 'static,
        P: ProposalRepository + 'static,
        C: VehicleCatalog + 'static,
    {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file, service, now)
    }

    pub fn from_reader<R, L, P, C>(
        reader: R,
        service: &DeskService<L, P, C>,
        now: DateTime<Utc>,
    ) -> Result<Vec<Lead>, LeadImportError>
    where
        R: Read,
        L: LeadRepository + 'static,
        P: ProposalRepository + 'static,
        C: VehicleCatalog + 'static,
    {
        let mut imported = Vec::new();

        for record in parser::parse_records(reader)? {
            let intake = LeadIntake {
                name: record.name,
                email: record.email,
                phone: record.phone,
                vehicle_id: VehicleId(record.vehicle_id),
                message: record.message,
            };

            let mut lead = service.create_lead(intake, now)?;

            if let Some(status) = record.status {
                let status = status.parse::<LeadStatus>()?;
                if status != LeadStatus::New {
                    lead = service.set_lead_status(&lead.id, status)?;
                }
            }

            imported.push(lead);
        }

        Ok(imported)
    }
}

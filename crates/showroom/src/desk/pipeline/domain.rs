use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::desk::inventory::domain::VehicleId;

/// Identifier wrapper for pipeline leads.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LeadId(pub String);

impl fmt::Display for LeadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier wrapper for commercial proposals.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProposalId(pub String);

impl fmt::Display for ProposalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Funnel position of a lead. Administrative override may assign any of
/// the four states; values outside the set are rejected at the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadStatus {
    New,
    Contacted,
    Qualified,
    Converted,
}

impl LeadStatus {
    pub const fn ordered() -> [Self; 4] {
        [Self::New, Self::Contacted, Self::Qualified, Self::Converted]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::New => "New",
            Self::Contacted => "Contacted",
            Self::Qualified => "Qualified",
            Self::Converted => "Converted",
        }
    }
}

impl FromStr for LeadStatus {
    type Err = StatusParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "new" => Ok(Self::New),
            "contacted" => Ok(Self::Contacted),
            "qualified" => Ok(Self::Qualified),
            "converted" => Ok(Self::Converted),
            _ => Err(StatusParseError::Lead(value.trim().to_string())),
        }
    }
}

/// Lifecycle stage of a proposal. `Accepted`, `Rejected`, and `Expired`
/// are terminal: nothing transitions out of them automatically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProposalStatus {
    Draft,
    Sent,
    Viewed,
    Accepted,
    Rejected,
    Expired,
}

impl ProposalStatus {
    pub const fn ordered() -> [Self; 6] {
        [
            Self::Draft,
            Self::Sent,
            Self::Viewed,
            Self::Accepted,
            Self::Rejected,
            Self::Expired,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Draft => "Draft",
            Self::Sent => "Sent",
            Self::Viewed => "Viewed",
            Self::Accepted => "Accepted",
            Self::Rejected => "Rejected",
            Self::Expired => "Expired",
        }
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Accepted | Self::Rejected | Self::Expired)
    }
}

impl FromStr for ProposalStatus {
    type Err = StatusParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "draft" => Ok(Self::Draft),
            "sent" => Ok(Self::Sent),
            "viewed" => Ok(Self::Viewed),
            "accepted" => Ok(Self::Accepted),
            "rejected" => Ok(Self::Rejected),
            "expired" => Ok(Self::Expired),
            _ => Err(StatusParseError::Proposal(value.trim().to_string())),
        }
    }
}

/// Raised when a caller supplies a status value outside the defined set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StatusParseError {
    #[error("'{0}' is not a lead status")]
    Lead(String),
    #[error("'{0}' is not a proposal status")]
    Proposal(String),
}

/// Commercial structure of the offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProposalType {
    Cash,
    Financing,
    Leasing,
}

impl ProposalType {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Cash => "Cash",
            Self::Financing => "Financing",
            Self::Leasing => "Leasing",
        }
    }

    /// Cash deals carry no schedule; financing and leasing require one.
    pub const fn requires_terms(self) -> bool {
        !matches!(self, Self::Cash)
    }
}

/// Operator-entered schedule for a financed or leased deal. Amounts are in
/// whole currency units; the rate is an annual percentage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancingTerms {
    pub down_payment: u32,
    pub monthly_payment: u32,
    pub interest_rate: f32,
    pub loan_term_months: u32,
}

/// A prospective buyer's inquiry tied to a vehicle of interest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lead {
    pub id: LeadId,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub vehicle_id: VehicleId,
    pub message: Option<String>,
    pub status: LeadStatus,
    pub created_at: DateTime<Utc>,
}

/// A commercial offer extended to a named client for a specific vehicle.
///
/// The milestone timestamps record the first time each lifecycle stage was
/// reached; they are stamped at most once and always satisfy
/// `created_at <= sent_at <= viewed_at <= responded_at` over the stamps
/// that are present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Proposal {
    pub id: ProposalId,
    pub client_name: String,
    pub client_email: String,
    pub client_phone: Option<String>,
    pub vehicle_id: VehicleId,
    pub proposal_type: ProposalType,
    pub total_value: u32,
    pub terms: Option<FinancingTerms>,
    pub special_offer: Option<String>,
    pub status: ProposalStatus,
    pub valid_until: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub sent_at: Option<DateTime<Utc>>,
    pub viewed_at: Option<DateTime<Utc>>,
    pub responded_at: Option<DateTime<Utc>>,
}

/// Inbound fields for registering a lead, from the contact form or manual
/// back-office entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadIntake {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    pub vehicle_id: VehicleId,
    #[serde(default)]
    pub message: Option<String>,
}

/// Inbound fields for authoring a proposal. `valid_until` falls back to
/// the default validity window when omitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProposalDraft {
    pub client_name: String,
    pub client_email: String,
    #[serde(default)]
    pub client_phone: Option<String>,
    pub vehicle_id: VehicleId,
    pub proposal_type: ProposalType,
    pub total_value: u32,
    #[serde(default)]
    pub terms: Option<FinancingTerms>,
    #[serde(default)]
    pub special_offer: Option<String>,
    #[serde(default)]
    pub valid_until: Option<NaiveDate>,
}

use std::io::Read;

use serde::{Deserialize, Deserializer};

use super::normalizer::{normalize_email, scrub};

/// One CSV row after normalization, ready to be turned into an intake.
#[derive(Debug)]
pub(crate) struct LeadRecord {
    pub(crate) name: String,
    pub(crate) email: String,
    pub(crate) phone: String,
    pub(crate) vehicle_id: String,
    pub(crate) message: Option<String>,
    pub(crate) status: Option<String>,
}

pub(crate) fn parse_records<R: Read>(reader: R) -> Result<Vec<LeadRecord>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut records = Vec::new();

    for record in csv_reader.deserialize::<LeadRow>() {
        let row = record?;

        records.push(LeadRecord {
            name: scrub(&row.name),
            email: normalize_email(&row.email),
            phone: row.phone.as_deref().map(scrub).unwrap_or_default(),
            vehicle_id: scrub(&row.vehicle),
            message: row.message.as_deref().map(scrub),
            status: row.status.as_deref().map(scrub),
        });
    }

    Ok(records)
}

#[derive(Debug, Deserialize)]
struct LeadRow {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Email")]
    email: String,
    #[serde(rename = "Phone", default, deserialize_with = "empty_string_as_none")]
    phone: Option<String>,
    #[serde(rename = "Vehicle")]
    vehicle: String,
    #[serde(rename = "Message", default, deserialize_with = "empty_string_as_none")]
    message: Option<String>,
    #[serde(rename = "Status", default, deserialize_with = "empty_string_as_none")]
    status: Option<String>,
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

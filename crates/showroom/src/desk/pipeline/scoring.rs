use chrono::{DateTime, Utc};

use super::domain::{Lead, LeadStatus};

const SECONDS_PER_DAY: i64 = 86_400;

/// Base points contributed by funnel progress. Converted leads no longer
/// need attention, so they carry no base.
pub(crate) const fn base_score(status: LeadStatus) -> i64 {
    match status {
        LeadStatus::Qualified => 30,
        LeadStatus::Contacted => 20,
        LeadStatus::New => 10,
        LeadStatus::Converted => 0,
    }
}

/// Ranking score for a lead at `now`: the base decays one point per full
/// day of age and never drops below zero. Used only for sort order; the
/// value is derived on demand and never persisted.
pub(crate) fn priority_score(lead: &Lead, now: DateTime<Utc>) -> i64 {
    let age_days = (now - lead.created_at)
        .num_seconds()
        .div_euclid(SECONDS_PER_DAY);
    (base_score(lead.status) - age_days).max(0)
}

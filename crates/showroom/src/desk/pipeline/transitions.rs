use chrono::{DateTime, Utc};

use super::domain::{Lead, LeadStatus, Proposal, ProposalStatus};

impl Lead {
    /// Assigns a funnel status. Every defined status is reachable from
    /// every other; the back office may reassign freely and nothing but
    /// the status itself changes.
    pub fn set_status(&mut self, status: LeadStatus) {
        self.status = status;
    }
}

impl Proposal {
    /// Assigns a lifecycle status while keeping milestone timestamps
    /// monotonic. Each milestone is stamped the first time its stage is
    /// reached and never again; a stamp is skipped entirely once a later
    /// milestone exists, and its value is floored at the latest earlier
    /// one so `created_at <= sent_at <= viewed_at <= responded_at` holds
    /// for any order of administrative calls.
    pub fn apply_status(&mut self, status: ProposalStatus, now: DateTime<Utc>) {
        match status {
            ProposalStatus::Sent => {
                if self.sent_at.is_none()
                    && self.viewed_at.is_none()
                    && self.responded_at.is_none()
                {
                    self.sent_at = Some(now.max(self.created_at));
                }
            }
            ProposalStatus::Viewed => {
                if self.viewed_at.is_none() && self.responded_at.is_none() {
                    let floor = self.sent_at.unwrap_or(self.created_at);
                    self.viewed_at = Some(now.max(floor));
                }
            }
            ProposalStatus::Accepted | ProposalStatus::Rejected => {
                if self.responded_at.is_none() {
                    let floor = self.viewed_at.or(self.sent_at).unwrap_or(self.created_at);
                    self.responded_at = Some(now.max(floor));
                }
            }
            // Expiry is not a client response; no milestone is stamped.
            ProposalStatus::Draft | ProposalStatus::Expired => {}
        }

        self.status = status;
    }
}

//! Sales-desk domain: vehicle catalog lookups, the lead & proposal
//! pipeline, and CSV lead intake.

pub mod intake;
pub mod inventory;
pub mod pipeline;

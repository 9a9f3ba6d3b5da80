//! Core library for the showroom back office: configuration, telemetry,
//! and the sales-desk domain (inventory lookups, the lead & proposal
//! pipeline, and CSV lead intake).

pub mod config;
pub mod desk;
pub mod error;
pub mod telemetry;

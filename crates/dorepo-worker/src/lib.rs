//! Background ingestion for dorepo.
//!
//! This crate provides:
//! - A cloneable queue handle that producers use to schedule ingests
//! - A runner that owns the schedule and sweeps it on a fixed interval
//! - The job trait the runner drives, implemented for the ingest service

pub mod executor;
pub mod jobs;
pub mod queue;
pub mod runner;

pub use executor::{IngestJob, JobExecutionError};
pub use queue::{AsyncIngestQueue, ScheduledIngest};
pub use runner::IngestRunner;

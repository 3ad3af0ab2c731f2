//! Ingestion module - background polling of the search API
//!
//! This module contains:
//! - The credential pool and its rotation rules
//! - The ingestion state machine (querying, paginating, idle)
//! - Counters reported when the loop stops

mod coordinator;
mod credentials;
mod state;
mod stats;

pub use coordinator::IngestionLoop;
pub use credentials::{Credential, CredentialPool};
pub use state::IngestState;
pub use stats::IngestStats;

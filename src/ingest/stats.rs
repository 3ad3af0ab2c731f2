//! Ingestion counters
//!
//! Accumulated by the ingestion loop and returned when it shuts down.

use std::fmt;

/// Running totals for one ingestion loop
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestStats {
    /// Pages fetched successfully
    pub pages: u64,

    /// Fresh searches completed (result sets walked to the last page)
    pub cycles: u64,

    /// Videos inserted into the store
    pub inserted: u64,

    /// Items skipped because they could not be normalized
    pub skipped: u64,

    /// Inserts that failed and were dropped
    pub insert_failures: u64,

    /// Credential rotations triggered by quota exhaustion
    pub rotations: u64,

    /// Backoffs taken because every credential was exhausted
    pub exhausted_backoffs: u64,

    /// Transient failures (network, server, client construction)
    pub transient_failures: u64,
}

impl fmt::Display for IngestStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} pages, {} cycles, {} inserted, {} skipped, {} insert failures, \
             {} rotations, {} exhausted-pool backoffs, {} transient failures",
            self.pages,
            self.cycles,
            self.inserted,
            self.skipped,
            self.insert_failures,
            self.rotations,
            self.exhausted_backoffs,
            self.transient_failures
        )
    }
}

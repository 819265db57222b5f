//! Series reconciliation
//!
//! Episodes of one series arrive as independent triples, so series rows are
//! deduplicated by an identity tuple rather than any key the sidecars could
//! supply. New rows take primary keys from an in-memory allocator seeded once
//! per run; whoever holds the allocator owns Id assignment, which makes the
//! single-writer assumption explicit in the call signature.

use tracing::warn;

use crate::catalog::{insert_series, CatalogDb, Statement};
use crate::error::Result;
use crate::models::SeriesRecord;

/// Hands out series primary keys for one import run.
#[derive(Debug)]
pub struct SeriesAllocator {
    next: i64,
}

impl SeriesAllocator {
    /// Seed from the highest Id already in the catalog.
    pub async fn load(db: &CatalogDb) -> Result<Self> {
        Ok(Self::from_max(db.max_series_id().await?))
    }

    /// Seed from a known maximum Id.
    pub fn from_max(max_id: i64) -> Self {
        Self { next: max_id + 1 }
    }

    /// Take the next free Id.
    pub fn next_id(&mut self) -> i64 {
        let id = self.next;
        self.next += 1;
        id
    }
}

/// Outcome of resolving a series against the catalog.
#[derive(Debug)]
pub struct SeriesResolution {
    /// Primary key the episode row must reference.
    pub series_id: i64,
    /// Insert to run first when the series is new to the catalog.
    pub insert: Option<Statement>,
}

impl SeriesResolution {
    pub fn is_new(&self) -> bool {
        self.insert.is_some()
    }
}

/// Match a series against the catalog, allocating a fresh Id on a miss.
///
/// More than one matching row is an anomaly worth flagging; the lowest Id
/// wins so reruns stay deterministic.
pub async fn resolve_series(
    db: &CatalogDb,
    allocator: &mut SeriesAllocator,
    series: &SeriesRecord,
) -> Result<SeriesResolution> {
    let matches = db.find_series(series).await?;
    match matches.first() {
        Some(&id) => {
            if matches.len() > 1 {
                warn!(
                    series_id = %series.series_id,
                    title = %series.title,
                    rows = matches.len(),
                    "Series identity tuple matches multiple rows, using the lowest Id"
                );
            }
            Ok(SeriesResolution {
                series_id: id,
                insert: None,
            })
        }
        None => {
            let id = allocator.next_id();
            Ok(SeriesResolution {
                series_id: id,
                insert: Some(insert_series(id, series)),
            })
        }
    }
}

//! FID filing ingestion
//!
//! Turns one Financial Institutions Directory filing (tab-separated, one row
//! per organisation registration) into the normalized entity-relationship
//! graph defined by `masgraph-graph`:
//! - heuristic parsing of the free-text contact column into (name, role, phone)
//! - exact canonical-name deduplication of companies and persons
//! - set-accumulated attributes, collapsed when the scan finishes
//! - person→company role edges, deduplicated per (person, company, role)
//!
//! Row defects (blank organisation, unmatched contact text, blank values) are
//! tolerated per row; only whole-file access failures abort ingestion.

use std::path::Path;

use anyhow::Result;
use masgraph_graph::GraphDocument;

pub mod contact;
pub mod pipeline;
pub mod reader;

pub use contact::{parse_contact, ContactInfo, ContactPatterns};
pub use pipeline::{
    FidIngest, FidIngestResult, FidIngestStats, Row, CONTACT_COLUMN, ORGANISATION_COLUMN,
};
pub use reader::{read_filing, report_year_from_path, ReadError};

/// Read a filing from disk, run the extraction pipeline over every row, and
/// assemble the output document with its filename-derived report year.
pub fn ingest_filing(path: &Path) -> Result<(GraphDocument, FidIngestStats)> {
    let rows = reader::read_filing(path)?;

    let mut ingest = FidIngest::new();
    for row in &rows {
        ingest.ingest_row(row);
    }
    let result = ingest.finish();

    let document = GraphDocument {
        report_year: reader::report_year_from_path(path),
        entities: result.entities,
        relationships: result.relationships,
    };
    Ok((document, result.stats))
}

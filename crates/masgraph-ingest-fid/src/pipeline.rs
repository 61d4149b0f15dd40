//! Row-scan extraction pipeline
//!
//! Single deterministic pass over a filing's rows. Row order matters:
//! identifier assignment follows first-seen order, so row N's effect on the
//! registries must land before row N+1 is read.

use std::collections::HashSet;

use masgraph_graph::{Entity, EntityRegistry, EntityType, Relationship};

use crate::contact::{parse_contact, ContactPatterns};

/// Column carrying the organisation's registered name. Rows with a blank
/// value here are discarded entirely.
pub const ORGANISATION_COLUMN: &str = "Organisation Name";

/// Free-text column hypothesized to carry a contact person's name, role and
/// phone number.
pub const CONTACT_COLUMN: &str = "Phone Number";

/// One filing row: (column name, raw value) pairs in header order.
pub type Row = Vec<(String, String)>;

/// Counters for one ingestion run. Advisory only; the graph never depends
/// on them.
#[derive(Debug, Default, Clone)]
pub struct FidIngestStats {
    pub rows: usize,
    pub skipped_rows: usize,
    pub companies: usize,
    pub persons: usize,
    pub relationships: usize,
    pub unparsed_contacts: usize,
}

/// Finished scan: entities (companies first, then persons, each in
/// first-seen order), deduplicated relationships, and run counters.
#[derive(Debug, Clone)]
pub struct FidIngestResult {
    pub entities: Vec<Entity>,
    pub relationships: Vec<Relationship>,
    pub stats: FidIngestStats,
}

/// Streaming row scanner. Feed rows top-to-bottom, then call `finish`.
pub struct FidIngest {
    companies: EntityRegistry,
    persons: EntityRegistry,
    relationships: Vec<Relationship>,
    seen_relations: HashSet<(String, String, String)>,
    patterns: ContactPatterns,
    stats: FidIngestStats,
}

impl FidIngest {
    pub fn new() -> Self {
        FidIngest {
            companies: EntityRegistry::new(EntityType::Company),
            persons: EntityRegistry::new(EntityType::Person),
            relationships: Vec::new(),
            seen_relations: HashSet::new(),
            patterns: ContactPatterns::new(),
            stats: FidIngestStats::default(),
        }
    }

    /// Process one row. A blank organisation name discards the whole row;
    /// every other defect just means that aspect contributes nothing.
    pub fn ingest_row(&mut self, row: &[(String, String)]) {
        self.stats.rows += 1;

        let company_name = column(row, ORGANISATION_COLUMN).unwrap_or("").trim();
        if company_name.is_empty() {
            self.stats.skipped_rows += 1;
            return;
        }
        let company = self.companies.get_or_create(company_name);

        for (name, value) in row {
            if name == ORGANISATION_COLUMN {
                continue;
            }
            self.companies.add_attribute(company, name, value);
        }

        let raw_contact = column(row, CONTACT_COLUMN).unwrap_or("");
        let Some(info) = parse_contact(&self.patterns, raw_contact) else {
            if !raw_contact.trim().is_empty() {
                self.stats.unparsed_contacts += 1;
            }
            return;
        };

        let person = self.persons.get_or_create(&info.name);
        if let Some(phone) = &info.phone {
            self.persons.add_attribute(person, "Phone Number", phone);
        }

        // Dedup on the role as extracted; the stored role is lower-cased.
        let key = (
            self.persons.entity_id(person).to_string(),
            self.companies.entity_id(company).to_string(),
            info.role.clone().unwrap_or_default(),
        );
        if self.seen_relations.insert(key) {
            self.relationships.push(Relationship {
                source_entity_id: self.persons.entity_id(person).to_string(),
                target_entity_id: self.companies.entity_id(company).to_string(),
                role: info.role.as_deref().map(str::to_lowercase),
                effective_date: None,
            });
        }
    }

    /// Collapse attribute sets and emit the graph. Companies come strictly
    /// before persons, each block in first-seen order.
    pub fn finish(self) -> FidIngestResult {
        let mut stats = self.stats;
        stats.companies = self.companies.len();
        stats.persons = self.persons.len();
        stats.relationships = self.relationships.len();

        let mut entities = self.companies.finalize_all();
        entities.extend(self.persons.finalize_all());

        FidIngestResult {
            entities,
            relationships: self.relationships,
            stats,
        }
    }
}

impl Default for FidIngest {
    fn default() -> Self {
        Self::new()
    }
}

fn column<'a>(row: &'a [(String, String)], name: &str) -> Option<&'a str> {
    row.iter()
        .find(|(column, _)| column == name)
        .map(|(_, value)| value.as_str())
}

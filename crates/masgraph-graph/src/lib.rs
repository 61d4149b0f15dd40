//! Entity-relationship graph model for FID filings
//!
//! Defines the normalized output document (entities + relationships) and the
//! insertion-ordered registry that deduplicates entities while a filing is
//! scanned:
//! - Companies and persons become `Entity` records keyed by canonical name
//! - Person→company roles become `Relationship` edges
//! - Attribute values accumulate as sets and collapse once at finalize

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

// ============================================================================
// Graph types (serialized output contract)
// ============================================================================

/// Entity kind. Drives both the serialized `type` field and the identifier
/// prefix (`COMPANY_n` / `PERSON_n`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityType {
    Company,
    Person,
}

impl EntityType {
    pub fn id_prefix(self) -> &'static str {
        match self {
            EntityType::Company => "COMPANY",
            EntityType::Person => "PERSON",
        }
    }
}

/// Finalized attribute value: one distinct value stays a bare string,
/// several become a sorted, deduplicated list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    One(String),
    Many(Vec<String>),
}

/// A deduplicated company or person.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    pub entity_id: String,
    #[serde(rename = "type")]
    pub entity_type: EntityType,
    pub canonical_name: String,
    /// Surface forms the entity was observed under. Currently always exactly
    /// the canonical name.
    pub mentions: Vec<String>,
    pub attributes: BTreeMap<String, AttributeValue>,
}

/// A person→company role edge.
///
/// Unique per (source, target, role) triple; never mutated after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relationship {
    pub source_entity_id: String,
    pub target_entity_id: String,
    /// Lower-cased role, or null when the contact field carried none.
    pub role: Option<String>,
    pub effective_date: Option<String>,
}

/// Top-level output document for one ingested filing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphDocument {
    /// Advisory year recovered from the source file name; never affects the
    /// graph itself.
    pub report_year: Option<i32>,
    pub entities: Vec<Entity>,
    pub relationships: Vec<Relationship>,
}

// ============================================================================
// Entity registry
// ============================================================================

/// Handle to an entity inside a registry. Stable for the registry's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityKey(usize);

#[derive(Debug)]
struct EntityRecord {
    entity_id: String,
    canonical_name: String,
    mentions: Vec<String>,
    attributes: BTreeMap<String, BTreeSet<String>>,
}

/// Append-only, lookup-by-canonical-name store for one entity type.
///
/// Identifiers are assigned in first-seen order starting at 1, with no gaps
/// or reuse. `finalize_all` consumes the registry, so entities cannot be
/// mutated after their attribute sets collapse.
#[derive(Debug)]
pub struct EntityRegistry {
    entity_type: EntityType,
    records: Vec<EntityRecord>,
    by_name: HashMap<String, EntityKey>,
}

impl EntityRegistry {
    pub fn new(entity_type: EntityType) -> Self {
        EntityRegistry {
            entity_type,
            records: Vec::new(),
            by_name: HashMap::new(),
        }
    }

    /// Number of distinct entities registered so far.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Exact-match lookup by canonical name, allocating on first sight.
    ///
    /// `canonical_name` must be non-empty and already trimmed; the pipeline
    /// skips rows that would violate this.
    pub fn get_or_create(&mut self, canonical_name: &str) -> EntityKey {
        if let Some(&key) = self.by_name.get(canonical_name) {
            return key;
        }
        let key = EntityKey(self.records.len());
        self.records.push(EntityRecord {
            entity_id: format!(
                "{}_{}",
                self.entity_type.id_prefix(),
                self.records.len() + 1
            ),
            canonical_name: canonical_name.to_string(),
            mentions: vec![canonical_name.to_string()],
            attributes: BTreeMap::new(),
        });
        self.by_name.insert(canonical_name.to_string(), key);
        key
    }

    /// Identifier assigned to `key`, e.g. `COMPANY_3`.
    pub fn entity_id(&self, key: EntityKey) -> &str {
        &self.records[key.0].entity_id
    }

    /// Record one attribute value. Blank values are ignored; repeated values
    /// deduplicate via set semantics.
    pub fn add_attribute(&mut self, key: EntityKey, name: &str, value: &str) {
        let value = value.trim();
        if value.is_empty() {
            return;
        }
        self.records[key.0]
            .attributes
            .entry(name.to_string())
            .or_default()
            .insert(value.to_string());
    }

    /// Collapse every attribute set and emit entities in first-seen order.
    pub fn finalize_all(self) -> Vec<Entity> {
        let entity_type = self.entity_type;
        self.records
            .into_iter()
            .map(|record| Entity {
                entity_id: record.entity_id,
                entity_type,
                canonical_name: record.canonical_name,
                mentions: record.mentions,
                attributes: record
                    .attributes
                    .into_iter()
                    .map(|(name, values)| (name, collapse(values)))
                    .collect(),
            })
            .collect()
    }
}

fn collapse(values: BTreeSet<String>) -> AttributeValue {
    if values.len() == 1 {
        AttributeValue::One(values.into_iter().next().unwrap())
    } else {
        // BTreeSet iteration is already sorted and deduplicated.
        AttributeValue::Many(values.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifiers_follow_first_seen_order_per_type() {
        let mut registry = EntityRegistry::new(EntityType::Company);
        let a = registry.get_or_create("Acme Capital Pte Ltd");
        let b = registry.get_or_create("Beta Trust Ltd");
        let a_again = registry.get_or_create("Acme Capital Pte Ltd");

        assert_eq!(registry.entity_id(a), "COMPANY_1");
        assert_eq!(registry.entity_id(b), "COMPANY_2");
        assert_eq!(a, a_again);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn person_registry_uses_person_prefix() {
        let mut registry = EntityRegistry::new(EntityType::Person);
        let key = registry.get_or_create("Tan Wee");
        assert_eq!(registry.entity_id(key), "PERSON_1");
    }

    #[test]
    fn blank_attribute_values_are_ignored() {
        let mut registry = EntityRegistry::new(EntityType::Company);
        let key = registry.get_or_create("Acme");
        registry.add_attribute(key, "Address", "   ");
        registry.add_attribute(key, "Address", "");

        let entities = registry.finalize_all();
        assert!(entities[0].attributes.is_empty());
    }

    #[test]
    fn singleton_attribute_collapses_to_scalar() {
        let mut registry = EntityRegistry::new(EntityType::Company);
        let key = registry.get_or_create("Acme");
        registry.add_attribute(key, "Licence Status", " Active ");
        registry.add_attribute(key, "Licence Status", "Active");

        let entities = registry.finalize_all();
        assert_eq!(
            entities[0].attributes["Licence Status"],
            AttributeValue::One("Active".to_string())
        );
    }

    #[test]
    fn multi_valued_attribute_collapses_to_sorted_list() {
        let mut registry = EntityRegistry::new(EntityType::Company);
        let key = registry.get_or_create("Acme");
        registry.add_attribute(key, "Address", "2 Shenton Way");
        registry.add_attribute(key, "Address", "1 Raffles Pl");
        registry.add_attribute(key, "Address", "2 Shenton Way");

        let entities = registry.finalize_all();
        assert_eq!(
            entities[0].attributes["Address"],
            AttributeValue::Many(vec![
                "1 Raffles Pl".to_string(),
                "2 Shenton Way".to_string()
            ])
        );
    }

    #[test]
    fn finalize_preserves_insertion_order_and_mentions() {
        let mut registry = EntityRegistry::new(EntityType::Company);
        registry.get_or_create("Beta Trust Ltd");
        registry.get_or_create("Acme Capital Pte Ltd");

        let entities = registry.finalize_all();
        assert_eq!(entities[0].canonical_name, "Beta Trust Ltd");
        assert_eq!(entities[1].canonical_name, "Acme Capital Pte Ltd");
        assert_eq!(entities[0].mentions, vec!["Beta Trust Ltd".to_string()]);
    }

    #[test]
    fn document_serializes_with_wire_field_names() {
        let mut registry = EntityRegistry::new(EntityType::Company);
        let key = registry.get_or_create("Acme");
        registry.add_attribute(key, "Licence Status", "Active");

        let document = GraphDocument {
            report_year: Some(2025),
            entities: registry.finalize_all(),
            relationships: vec![Relationship {
                source_entity_id: "PERSON_1".to_string(),
                target_entity_id: "COMPANY_1".to_string(),
                role: None,
                effective_date: None,
            }],
        };

        let json: serde_json::Value =
            serde_json::from_str(&serde_json::to_string(&document).unwrap()).unwrap();
        assert_eq!(json["reportYear"], 2025);
        assert_eq!(json["entities"][0]["entityId"], "COMPANY_1");
        assert_eq!(json["entities"][0]["type"], "Company");
        assert_eq!(json["entities"][0]["canonicalName"], "Acme");
        assert_eq!(json["entities"][0]["attributes"]["Licence Status"], "Active");
        // Absent role and date are null on the wire, never "".
        assert!(json["relationships"][0]["role"].is_null());
        assert!(json["relationships"][0]["effectiveDate"].is_null());
    }

    #[test]
    fn multi_valued_attribute_serializes_as_array() {
        let mut registry = EntityRegistry::new(EntityType::Company);
        let key = registry.get_or_create("Acme");
        registry.add_attribute(key, "Address", "2 Shenton Way");
        registry.add_attribute(key, "Address", "1 Raffles Pl");

        let entities = registry.finalize_all();
        let json = serde_json::to_value(&entities[0]).unwrap();
        assert_eq!(
            json["attributes"]["Address"],
            serde_json::json!(["1 Raffles Pl", "2 Shenton Way"])
        );
    }
}

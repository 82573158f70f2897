// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Specification store: CRUD for specification records and their owned
//! section rows.
//!
//! Sections live in their own table under a composite key
//! `spec_id (8 B BE) ++ position (4 B BE)`, so a specification's sections
//! form one contiguous, payload-ordered key range. Update replaces that
//! range wholesale (delete-then-insert) and delete removes it in the same
//! transaction as the owning record, so orphaned sections cannot exist.

use std::collections::HashSet;

use redb::ReadableTable;
use serde::{Deserialize, Serialize};

use super::super::database::{
    next_id, Database, StoreResult, COUNTERS, SECTIONS, SPECIFICATIONS,
};
use crate::models::{Section, Specification, SpecificationPayload};

/// Scalar fields as stored in the primary table.
#[derive(Debug, Serialize, Deserialize)]
struct SpecificationRecord {
    id: i64,
    project_name: Option<String>,
    project_type: Option<String>,
    company_name: Option<String>,
    company_description: Option<String>,
    primary_objective: Option<String>,
    budget: Option<String>,
    timeline: Option<String>,
    technical_requirements: Option<String>,
}

impl SpecificationRecord {
    fn from_payload(id: i64, payload: &SpecificationPayload) -> Self {
        Self {
            id,
            project_name: payload.project_name.clone(),
            project_type: payload.project_type.clone(),
            company_name: payload.company_name.clone(),
            company_description: payload.company_description.clone(),
            primary_objective: payload.primary_objective.clone(),
            budget: payload.budget.clone(),
            timeline: payload.timeline.clone(),
            technical_requirements: payload.technical_requirements.clone(),
        }
    }

    fn into_model(self, sections: Vec<Section>) -> Specification {
        Specification {
            id: self.id,
            project_name: self.project_name,
            project_type: self.project_type,
            company_name: self.company_name,
            company_description: self.company_description,
            primary_objective: self.primary_objective,
            budget: self.budget,
            timeline: self.timeline,
            technical_requirements: self.technical_requirements,
            sections,
        }
    }
}

/// A section row as stored under its composite key.
#[derive(Debug, Serialize, Deserialize)]
struct SectionRecord {
    id: i64,
    title: Option<String>,
    content: Option<String>,
}

impl SectionRecord {
    fn into_model(self) -> Section {
        Section {
            id: self.id,
            title: self.title,
            content: self.content,
        }
    }
}

// =============================================================================
// Composite Key Helpers
// =============================================================================

/// Build the composite key for one section row.
fn section_key(spec_id: i64, position: u32) -> [u8; 12] {
    let mut key = [0u8; 12];
    key[..8].copy_from_slice(&(spec_id as u64).to_be_bytes());
    key[8..].copy_from_slice(&position.to_be_bytes());
    key
}

/// Half-open key range covering every section of one specification.
fn section_bounds(spec_id: i64) -> ([u8; 12], [u8; 12]) {
    let mut end = [0u8; 12];
    end[..8].copy_from_slice(&(spec_id as u64 + 1).to_be_bytes());
    (section_key(spec_id, 0), end)
}

/// Read a specification's sections in key (payload) order.
fn collect_sections(
    table: &impl ReadableTable<&'static [u8], &'static [u8]>,
    spec_id: i64,
) -> StoreResult<Vec<Section>> {
    let (lo, hi) = section_bounds(spec_id);
    let mut sections = Vec::new();
    for entry in table.range(lo.as_slice()..hi.as_slice())? {
        let entry = entry?;
        let record: SectionRecord = serde_json::from_slice(entry.1.value())?;
        sections.push(record.into_model());
    }
    Ok(sections)
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for specification records and their owned sections.
pub struct SpecificationRepository<'a> {
    db: &'a Database,
}

impl<'a> SpecificationRepository<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// List every specification with its sections attached. No ordering
    /// guarantee between records.
    pub fn list(&self) -> StoreResult<Vec<Specification>> {
        let read_txn = self.db.begin_read()?;
        let specs = read_txn.open_table(SPECIFICATIONS)?;
        let section_table = read_txn.open_table(SECTIONS)?;

        let mut result = Vec::new();
        for entry in specs.iter()? {
            let entry = entry?;
            let record: SpecificationRecord = serde_json::from_slice(entry.1.value())?;
            let sections = collect_sections(&section_table, record.id)?;
            result.push(record.into_model(sections));
        }
        Ok(result)
    }

    /// Fetch one specification by id.
    pub fn get(&self, id: i64) -> StoreResult<Option<Specification>> {
        let read_txn = self.db.begin_read()?;
        let specs = read_txn.open_table(SPECIFICATIONS)?;

        let record: SpecificationRecord = match specs.get(id as u64)? {
            Some(value) => serde_json::from_slice(value.value())?,
            None => return Ok(None),
        };

        let section_table = read_txn.open_table(SECTIONS)?;
        let sections = collect_sections(&section_table, id)?;
        Ok(Some(record.into_model(sections)))
    }

    /// Persist a new specification, assigning its id and a fresh id for
    /// every section in the payload.
    pub fn create(&self, payload: &SpecificationPayload) -> StoreResult<Specification> {
        let write_txn = self.db.begin_write()?;
        let spec = {
            let mut counters = write_txn.open_table(COUNTERS)?;
            let id = next_id(&mut counters, "specifications")?;

            let mut sections = Vec::with_capacity(payload.sections.len());
            for incoming in &payload.sections {
                sections.push(Section {
                    id: next_id(&mut counters, "sections")?,
                    title: incoming.title.clone(),
                    content: incoming.content.clone(),
                });
            }
            drop(counters);

            let record = SpecificationRecord::from_payload(id, payload);
            let mut specs = write_txn.open_table(SPECIFICATIONS)?;
            specs.insert(id as u64, serde_json::to_vec(&record)?.as_slice())?;

            let mut section_table = write_txn.open_table(SECTIONS)?;
            write_section_rows(&mut section_table, id, &sections)?;

            record.into_model(sections)
        };
        write_txn.commit()?;
        Ok(spec)
    }

    /// Replace a specification wholesale: every scalar field is overwritten
    /// and the section collection is swapped for the payload's. Sections
    /// resubmitted with their existing id keep it; anything else gets a
    /// fresh one. Returns `None` if the record does not exist (no upsert).
    pub fn update(
        &self,
        id: i64,
        payload: &SpecificationPayload,
    ) -> StoreResult<Option<Specification>> {
        let write_txn = self.db.begin_write()?;
        let spec = {
            let mut specs = write_txn.open_table(SPECIFICATIONS)?;
            if specs.get(id as u64)?.is_none() {
                return Ok(None);
            }

            let mut section_table = write_txn.open_table(SECTIONS)?;
            let old_ids = remove_section_rows(&mut section_table, id)?;

            let mut counters = write_txn.open_table(COUNTERS)?;
            let mut sections = Vec::with_capacity(payload.sections.len());
            for incoming in &payload.sections {
                let section_id = match incoming.id {
                    Some(existing) if old_ids.contains(&existing) => existing,
                    _ => next_id(&mut counters, "sections")?,
                };
                sections.push(Section {
                    id: section_id,
                    title: incoming.title.clone(),
                    content: incoming.content.clone(),
                });
            }
            drop(counters);

            write_section_rows(&mut section_table, id, &sections)?;

            let record = SpecificationRecord::from_payload(id, payload);
            specs.insert(id as u64, serde_json::to_vec(&record)?.as_slice())?;

            record.into_model(sections)
        };
        write_txn.commit()?;
        Ok(Some(spec))
    }

    /// Delete a specification and all of its sections. Returns `false` if
    /// the record does not exist.
    pub fn delete(&self, id: i64) -> StoreResult<bool> {
        let write_txn = self.db.begin_write()?;
        {
            let mut specs = write_txn.open_table(SPECIFICATIONS)?;
            if specs.remove(id as u64)?.is_none() {
                return Ok(false);
            }

            let mut section_table = write_txn.open_table(SECTIONS)?;
            remove_section_rows(&mut section_table, id)?;
        }
        write_txn.commit()?;
        Ok(true)
    }

    /// Look up a single section of a specification. Used to verify that
    /// cascade deletes and section replacement leave no strays behind.
    pub fn section(&self, spec_id: i64, section_id: i64) -> StoreResult<Option<Section>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(SECTIONS)?;
        let sections = collect_sections(&table, spec_id)?;
        Ok(sections.into_iter().find(|s| s.id == section_id))
    }
}

/// Insert section rows at their payload positions.
fn write_section_rows(
    table: &mut redb::Table<'_, &'static [u8], &'static [u8]>,
    spec_id: i64,
    sections: &[Section],
) -> StoreResult<()> {
    for (position, section) in sections.iter().enumerate() {
        let key = section_key(spec_id, position as u32);
        let record = SectionRecord {
            id: section.id,
            title: section.title.clone(),
            content: section.content.clone(),
        };
        table.insert(key.as_slice(), serde_json::to_vec(&record)?.as_slice())?;
    }
    Ok(())
}

/// Remove every section row of a specification, returning the ids that
/// existed so update can preserve resubmitted section identity.
fn remove_section_rows(
    table: &mut redb::Table<'_, &'static [u8], &'static [u8]>,
    spec_id: i64,
) -> StoreResult<HashSet<i64>> {
    let (lo, hi) = section_bounds(spec_id);

    let mut keys = Vec::new();
    let mut ids = HashSet::new();
    for entry in table.range(lo.as_slice()..hi.as_slice())? {
        let entry = entry?;
        let record: SectionRecord = serde_json::from_slice(entry.1.value())?;
        ids.insert(record.id);
        keys.push(entry.0.value().to_vec());
    }

    for key in &keys {
        table.remove(key.as_slice())?;
    }
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SectionPayload;

    fn temp_db() -> (Database, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open(&dir.path().join("test.redb")).unwrap();
        (db, dir)
    }

    fn payload_with_sections(titles: &[&str]) -> SpecificationPayload {
        SpecificationPayload {
            project_name: Some("Storefront".to_string()),
            project_type: Some("web".to_string()),
            budget: Some("50k".to_string()),
            sections: titles
                .iter()
                .map(|t| SectionPayload {
                    id: None,
                    title: Some(t.to_string()),
                    content: Some(format!("{t} body")),
                })
                .collect(),
            ..Default::default()
        }
    }

    #[test]
    fn create_then_get_preserves_sections_in_order() {
        let (db, _dir) = temp_db();
        let repo = SpecificationRepository::new(&db);

        let created = repo
            .create(&payload_with_sections(&["intro", "scope", "budget"]))
            .unwrap();
        assert_eq!(created.id, 1);
        assert_eq!(created.sections.len(), 3);

        let fetched = repo.get(created.id).unwrap().unwrap();
        assert_eq!(fetched, created);
        let titles: Vec<_> = fetched
            .sections
            .iter()
            .map(|s| s.title.as_deref().unwrap())
            .collect();
        assert_eq!(titles, vec!["intro", "scope", "budget"]);
    }

    #[test]
    fn get_unknown_id_returns_none() {
        let (db, _dir) = temp_db();
        let repo = SpecificationRepository::new(&db);
        assert!(repo.get(999).unwrap().is_none());
    }

    #[test]
    fn list_returns_all_records() {
        let (db, _dir) = temp_db();
        let repo = SpecificationRepository::new(&db);

        repo.create(&payload_with_sections(&["a"])).unwrap();
        repo.create(&payload_with_sections(&[])).unwrap();

        let all = repo.list().unwrap();
        assert_eq!(all.len(), 2);
    }

    #[test]
    fn update_replaces_scalars_and_sections() {
        let (db, _dir) = temp_db();
        let repo = SpecificationRepository::new(&db);

        let created = repo.create(&payload_with_sections(&["a", "b"])).unwrap();

        let mut replacement = payload_with_sections(&[]);
        replacement.project_name = Some("Rebrand".to_string());
        replacement.budget = None;
        replacement.sections = vec![SectionPayload {
            id: None,
            title: Some("fresh".to_string()),
            content: None,
        }];

        let updated = repo.update(created.id, &replacement).unwrap().unwrap();
        assert_eq!(updated.project_name.as_deref(), Some("Rebrand"));
        assert_eq!(updated.budget, None);
        assert_eq!(updated.sections.len(), 1);
        assert_eq!(updated.sections[0].title.as_deref(), Some("fresh"));

        let fetched = repo.get(created.id).unwrap().unwrap();
        assert_eq!(fetched, updated);
    }

    #[test]
    fn update_with_subset_removes_orphans() {
        let (db, _dir) = temp_db();
        let repo = SpecificationRepository::new(&db);

        let created = repo.create(&payload_with_sections(&["a", "b", "c"])).unwrap();
        let kept = created.sections[0].clone();
        let dropped: Vec<i64> = created.sections[1..].iter().map(|s| s.id).collect();

        let replacement = SpecificationPayload {
            sections: vec![SectionPayload {
                id: Some(kept.id),
                title: kept.title.clone(),
                content: kept.content.clone(),
            }],
            ..Default::default()
        };

        let updated = repo.update(created.id, &replacement).unwrap().unwrap();
        assert_eq!(updated.sections.len(), 1);
        // Resubmitted section keeps its identity.
        assert_eq!(updated.sections[0].id, kept.id);

        // The removed sections no longer exist in storage.
        for id in dropped {
            assert!(repo.section(created.id, id).unwrap().is_none());
        }
        assert!(repo.section(created.id, kept.id).unwrap().is_some());
    }

    #[test]
    fn update_reassigns_foreign_section_ids() {
        let (db, _dir) = temp_db();
        let repo = SpecificationRepository::new(&db);

        let created = repo.create(&payload_with_sections(&[])).unwrap();
        let replacement = SpecificationPayload {
            sections: vec![SectionPayload {
                id: Some(4242),
                title: Some("smuggled".to_string()),
                content: None,
            }],
            ..Default::default()
        };

        let updated = repo.update(created.id, &replacement).unwrap().unwrap();
        assert_ne!(updated.sections[0].id, 4242);
    }

    #[test]
    fn update_missing_record_is_not_upsert() {
        let (db, _dir) = temp_db();
        let repo = SpecificationRepository::new(&db);

        let result = repo.update(999, &payload_with_sections(&["a"])).unwrap();
        assert!(result.is_none());
        assert!(repo.get(999).unwrap().is_none());
        assert!(repo.list().unwrap().is_empty());
    }

    #[test]
    fn delete_cascades_to_sections() {
        let (db, _dir) = temp_db();
        let repo = SpecificationRepository::new(&db);

        let created = repo.create(&payload_with_sections(&["a", "b"])).unwrap();
        let section_ids: Vec<i64> = created.sections.iter().map(|s| s.id).collect();

        assert!(repo.delete(created.id).unwrap());
        assert!(repo.get(created.id).unwrap().is_none());
        for id in section_ids {
            assert!(repo.section(created.id, id).unwrap().is_none());
        }
    }

    #[test]
    fn delete_missing_record_returns_false() {
        let (db, _dir) = temp_db();
        let repo = SpecificationRepository::new(&db);
        assert!(!repo.delete(999).unwrap());
    }

    #[test]
    fn sections_do_not_leak_between_specifications() {
        let (db, _dir) = temp_db();
        let repo = SpecificationRepository::new(&db);

        let first = repo.create(&payload_with_sections(&["a", "b"])).unwrap();
        let second = repo.create(&payload_with_sections(&["x"])).unwrap();

        assert!(repo.delete(first.id).unwrap());

        let survivor = repo.get(second.id).unwrap().unwrap();
        assert_eq!(survivor.sections.len(), 1);
        assert_eq!(survivor.sections[0].title.as_deref(), Some("x"));
    }
}

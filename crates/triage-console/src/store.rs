//! Whole-collection JSON blobs, one file per fixed key.
//!
//! Reads never fail: a missing or unreadable blob is an empty collection.
//! Writes replace the blob, so the last writer wins. A malformed blob is
//! moved aside before a write replaces it.

use anyhow::Context;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use triage_core::{Case, Incident};

pub(crate) const CASES_KEY: &str = "incident_cases";
pub(crate) const INCIDENTS_KEY: &str = "incidents";

/// Records keyed by their creation time in milliseconds.
pub(crate) trait Keyed {
    fn key_id(&self) -> i64;
    fn set_key_id(&mut self, id: i64);
}

impl Keyed for Case {
    fn key_id(&self) -> i64 {
        self.id
    }

    fn set_key_id(&mut self, id: i64) {
        self.id = id;
    }
}

impl Keyed for Incident {
    fn key_id(&self) -> i64 {
        self.id
    }

    fn set_key_id(&mut self, id: i64) {
        self.id = id;
    }
}

enum Blob<T> {
    Missing,
    Parsed(Vec<T>),
    Malformed(serde_json::Error),
}

#[derive(Debug, Clone)]
pub(crate) struct JsonCollection<T> {
    path: PathBuf,
    _record: PhantomData<T>,
}

impl<T> JsonCollection<T>
where
    T: Serialize + DeserializeOwned,
{
    pub(crate) fn open(dir: &Path, key: &str) -> Self {
        Self {
            path: dir.join(format!("{key}.json")),
            _record: PhantomData,
        }
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    pub(crate) fn load_all(&self) -> Vec<T> {
        match self.read_blob() {
            Ok(Blob::Missing) => Vec::new(),
            Ok(Blob::Parsed(items)) => items,
            Ok(Blob::Malformed(err)) => {
                tracing::warn!(error = %err, path = %self.path.display(), "failed to parse collection");
                Vec::new()
            }
            Err(err) => {
                tracing::warn!(error = %err, path = %self.path.display(), "failed to read collection");
                Vec::new()
            }
        }
    }

    /// Current contents for a read-modify-write. A malformed blob is moved
    /// aside to `<key>.json.corrupt` so the next save cannot destroy it; an
    /// unreadable one aborts the write.
    fn load_for_update(&self) -> anyhow::Result<Vec<T>> {
        let blob = self
            .read_blob()
            .with_context(|| format!("failed to read {}", self.path.display()))?;
        match blob {
            Blob::Missing => Ok(Vec::new()),
            Blob::Parsed(items) => Ok(items),
            Blob::Malformed(err) => {
                let backup = self.corrupt_path();
                fs::rename(&self.path, &backup).with_context(|| {
                    format!("failed to move aside {}", self.path.display())
                })?;
                tracing::warn!(
                    error = %err,
                    path = %self.path.display(),
                    backup = %backup.display(),
                    "malformed collection moved aside"
                );
                Ok(Vec::new())
            }
        }
    }

    fn read_blob(&self) -> std::io::Result<Blob<T>> {
        let payload = match fs::read(&self.path) {
            Ok(payload) => payload,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Blob::Missing),
            Err(err) => return Err(err),
        };
        Ok(match serde_json::from_slice(&payload) {
            Ok(items) => Blob::Parsed(items),
            Err(err) => Blob::Malformed(err),
        })
    }

    /// First free of `<key>.json.corrupt`, `<key>.json.corrupt.1`, ...
    fn corrupt_path(&self) -> PathBuf {
        let first = self.path.with_extension("json.corrupt");
        if !first.exists() {
            return first;
        }
        (1u32..)
            .map(|n| self.path.with_extension(format!("json.corrupt.{n}")))
            .find(|candidate| !candidate.exists())
            .unwrap_or(first)
    }

    pub(crate) fn save_all(&self, items: &[T]) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let payload = serde_json::to_vec_pretty(items)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, payload).with_context(|| format!("failed to write {}", tmp.display()))?;
        fs::rename(&tmp, &self.path)
            .with_context(|| format!("failed to replace {}", self.path.display()))?;
        tracing::debug!(path = %self.path.display(), count = items.len(), "collection saved");
        Ok(())
    }
}

impl<T> JsonCollection<T>
where
    T: Serialize + DeserializeOwned + Keyed,
{
    /// Prepends `item` so the collection stays newest first. Two records
    /// created in the same millisecond get distinct ids.
    pub(crate) fn append(&self, mut item: T) -> anyhow::Result<Vec<T>> {
        let mut items = self.load_for_update()?;
        if items.iter().any(|existing| existing.key_id() == item.key_id()) {
            let next = items.iter().map(Keyed::key_id).max().unwrap_or_default() + 1;
            item.set_key_id(next);
        }
        items.insert(0, item);
        self.save_all(&items)?;
        Ok(items)
    }

    pub(crate) fn find_by_id(&self, id: i64) -> Option<T> {
        self.load_all().into_iter().find(|item| item.key_id() == id)
    }

    /// Returns the remaining collection and whether anything was removed.
    pub(crate) fn remove_by_id(&self, id: i64) -> anyhow::Result<(Vec<T>, bool)> {
        let mut items = self.load_for_update()?;
        let before = items.len();
        items.retain(|item| item.key_id() != id);
        let removed = items.len() != before;
        if removed {
            self.save_all(&items)?;
        }
        Ok((items, removed))
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Stores {
    pub(crate) cases: JsonCollection<Case>,
    pub(crate) incidents: JsonCollection<Incident>,
}

impl Stores {
    pub(crate) fn open(data_dir: &Path) -> Self {
        Self {
            cases: JsonCollection::open(data_dir, CASES_KEY),
            incidents: JsonCollection::open(data_dir, INCIDENTS_KEY),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use triage_core::{AnswerSet, Category, IncidentDraft, IncidentStatus, QuestionId, Severity};

    fn case_at(ms: i64) -> Case {
        let mut answers = AnswerSet::new();
        answers.set_single(QuestionId::EncryptionScope, "entire_network");
        let created_at = Utc.timestamp_millis_opt(ms).single().expect("time");
        Case::new(Category::Ransomware, answers, created_at)
    }

    fn incident_at(ms: i64, severity: Severity) -> Incident {
        let created_at = Utc.timestamp_millis_opt(ms).single().expect("time");
        Incident::from_draft(
            IncidentDraft {
                title: format!("incident {ms}"),
                description: "desc".to_string(),
                severity,
                kind: "malware".to_string(),
                source: "edr".to_string(),
                status: IncidentStatus::Open,
            },
            created_at,
        )
    }

    #[test]
    fn missing_blob_loads_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let stores = Stores::open(dir.path());
        assert!(stores.cases.load_all().is_empty());
        assert!(stores.incidents.load_all().is_empty());
    }

    #[test]
    fn malformed_blob_loads_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let stores = Stores::open(dir.path());
        fs::write(stores.cases.path(), b"{not json").expect("write");
        assert!(stores.cases.load_all().is_empty());
    }

    #[test]
    fn append_over_malformed_blob_keeps_original_bytes() {
        let dir = tempfile::tempdir().expect("tempdir");
        let stores = Stores::open(dir.path());
        let garbage = br#"[{"id": 1, "truncated": "#;
        fs::write(stores.cases.path(), garbage).expect("write");

        stores.cases.append(case_at(1_000)).expect("append");

        let backup = dir.path().join("incident_cases.json.corrupt");
        assert_eq!(fs::read(&backup).expect("backup"), garbage.to_vec());
        assert_eq!(stores.cases.load_all().len(), 1);

        fs::write(stores.cases.path(), b"{}").expect("write");
        stores.cases.append(case_at(2_000)).expect("append");
        let second = dir.path().join("incident_cases.json.corrupt.1");
        assert_eq!(fs::read(&second).expect("second backup"), b"{}".to_vec());
        assert_eq!(fs::read(&backup).expect("backup"), garbage.to_vec());
    }

    #[test]
    fn remove_over_malformed_blob_keeps_original_bytes() {
        let dir = tempfile::tempdir().expect("tempdir");
        let stores = Stores::open(dir.path());
        fs::write(stores.incidents.path(), b"not json").expect("write");

        let (remaining, removed) = stores.incidents.remove_by_id(5).expect("remove");
        assert!(!removed);
        assert!(remaining.is_empty());
        let backup = dir.path().join("incidents.json.corrupt");
        assert_eq!(fs::read(&backup).expect("backup"), b"not json".to_vec());
    }

    #[test]
    fn append_keeps_newest_first() {
        let dir = tempfile::tempdir().expect("tempdir");
        let stores = Stores::open(&dir.path().join("nested"));
        stores.cases.append(case_at(1_000)).expect("append");
        stores.cases.append(case_at(2_000)).expect("append");
        let ids: Vec<_> = stores.cases.load_all().iter().map(|case| case.id).collect();
        assert_eq!(ids, vec![2_000, 1_000]);
        assert_eq!(stores.cases.find_by_id(1_000).map(|case| case.id), Some(1_000));
        assert!(stores.cases.find_by_id(3_000).is_none());
    }

    #[test]
    fn save_all_of_load_all_is_a_noop() {
        let dir = tempfile::tempdir().expect("tempdir");
        let stores = Stores::open(dir.path());
        stores.cases.append(case_at(1_000)).expect("append");
        stores
            .incidents
            .append(incident_at(5, Severity::High))
            .expect("append");
        stores
            .incidents
            .append(incident_at(6, Severity::Low))
            .expect("append");

        let cases = stores.cases.load_all();
        let incidents = stores.incidents.load_all();
        stores.cases.save_all(&stores.cases.load_all()).expect("save");
        stores
            .incidents
            .save_all(&stores.incidents.load_all())
            .expect("save");
        assert_eq!(stores.cases.load_all(), cases);
        assert_eq!(stores.incidents.load_all(), incidents);
    }

    #[test]
    fn same_millisecond_records_get_distinct_ids() {
        let dir = tempfile::tempdir().expect("tempdir");
        let stores = Stores::open(dir.path());
        stores
            .incidents
            .append(incident_at(7, Severity::High))
            .expect("append");
        let items = stores
            .incidents
            .append(incident_at(7, Severity::Low))
            .expect("append");
        assert_eq!(items[0].id, 8);
        assert_eq!(items[1].id, 7);
    }

    #[test]
    fn remove_by_id_deletes_only_matching_record() {
        let dir = tempfile::tempdir().expect("tempdir");
        let stores = Stores::open(dir.path());
        stores
            .incidents
            .append(incident_at(5, Severity::High))
            .expect("append");
        stores
            .incidents
            .append(incident_at(6, Severity::Low))
            .expect("append");

        let (remaining, removed) = stores.incidents.remove_by_id(5).expect("remove");
        assert!(removed);
        assert_eq!(remaining.len(), 1);
        assert_eq!(stores.incidents.load_all()[0].id, 6);

        let (_, removed) = stores.incidents.remove_by_id(42).expect("remove");
        assert!(!removed);
    }
}

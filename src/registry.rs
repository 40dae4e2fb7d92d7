//! In-memory member registry for the current session.
//!
//! The registry is an ordered sequence keyed by id: bulk load replaces the
//! whole sequence, created records are appended, removals keep the order of
//! whatever survives. It never talks to the network itself; the event loop
//! applies a mutation only after the matching network outcome reports
//! success, so external calls always precede local state changes.

use tracing::warn;

use crate::api::UserRecord;

#[derive(Default)]
pub struct Registry {
    records: Vec<UserRecord>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[UserRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&UserRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Replace the whole sequence from a bulk load, preserving source order.
    /// Duplicate ids in the payload keep the first occurrence.
    pub fn replace_all(&mut self, records: Vec<UserRecord>) {
        self.records.clear();
        for record in records {
            self.append(record);
        }
    }

    /// Append a freshly created record. Ids are unique for the lifetime of
    /// the session; a duplicate is dropped and logged rather than shadowing
    /// the existing record.
    pub fn append(&mut self, record: UserRecord) {
        if self.get(&record.id).is_some() {
            warn!(id = %record.id, "ignoring record with duplicate id");
            return;
        }
        self.records.push(record);
    }

    /// Remove the record with the given id. Returns whether anything was
    /// removed; a miss is not an error (the record may already be gone).
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.records.len();
        self.records.retain(|r| r.id != id);
        self.records.len() != before
    }

    /// Drop everything, used when a bulk load fails.
    pub fn clear(&mut self) {
        self.records.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(id: &str, first: &str) -> UserRecord {
        UserRecord {
            id: id.to_string(),
            first_name: first.to_string(),
            last_name: "Lee".to_string(),
            email: format!("{}@x.com", first.to_lowercase()),
            avatar: "http://a".to_string(),
        }
    }

    #[test]
    fn replace_all_preserves_order() {
        let mut reg = Registry::new();
        reg.replace_all(vec![rec("3", "Cy"), rec("1", "Ann"), rec("2", "Bo")]);
        let ids: Vec<&str> = reg.records().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["3", "1", "2"]);
    }

    #[test]
    fn append_keeps_insertion_order_and_rejects_duplicates() {
        let mut reg = Registry::new();
        reg.append(rec("1", "Ann"));
        reg.append(rec("2", "Bo"));
        reg.append(rec("1", "Shadow"));
        assert_eq!(reg.len(), 2);
        assert_eq!(reg.get("1").unwrap().first_name, "Ann");
    }

    #[test]
    fn add_then_remove_restores_previous_content() {
        let mut reg = Registry::new();
        reg.replace_all(vec![rec("1", "Ann"), rec("2", "Bo")]);
        let before: Vec<UserRecord> = reg.records().to_vec();

        reg.append(rec("3", "Cy"));
        assert_eq!(reg.len(), 3);
        assert!(reg.remove("3"));
        assert_eq!(reg.records(), before.as_slice());
    }

    #[test]
    fn remove_missing_id_reports_miss() {
        let mut reg = Registry::new();
        reg.append(rec("1", "Ann"));
        assert!(!reg.remove("9"));
        assert_eq!(reg.len(), 1);
    }
}

//! In-memory record set owned by the controller.
//!
//! The store is single-writer: only the controller mutates it, and only with
//! data that came back from the execution service.

use flowdeck_types::{ExecutionRecord, StatusFilter};

/// How a returned record was folded into the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// A record with the same id existed and was replaced.
    Replaced,
    /// The id was new and the record was inserted at the front.
    Inserted,
}

/// Records currently displayed, the filter they were loaded with, and the selection.
#[derive(Debug, Clone, Default)]
pub struct ExecutionStore {
    records: Vec<ExecutionRecord>,
    filter: StatusFilter,
    selected_id: Option<String>,
}

impl ExecutionStore {
    pub fn new(filter: StatusFilter) -> Self {
        Self {
            records: Vec::new(),
            filter,
            selected_id: None,
        }
    }

    pub fn records(&self) -> &[ExecutionRecord] {
        &self.records
    }

    pub fn filter(&self) -> StatusFilter {
        self.filter
    }

    pub fn get(&self, id: &str) -> Option<&ExecutionRecord> {
        self.records.iter().find(|record| record.id == id)
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.records.iter().position(|record| record.id == id)
    }

    /// Replace the whole record set with a fresh listing for `filter`.
    ///
    /// The selection follows its id when the id is still listed; otherwise it
    /// clamps to the row that now occupies the old position.
    pub fn replace_all(&mut self, filter: StatusFilter, records: Vec<ExecutionRecord>) {
        let previous_index = self.selected_index();
        self.filter = filter;
        self.records = records;

        let still_present = self.selected_id.as_deref().is_some_and(|id| self.position(id).is_some());
        if !still_present {
            self.selected_id = previous_index
                .or(Some(0))
                .and_then(|index| self.records.get(index.min(self.records.len().saturating_sub(1))))
                .map(|record| record.id.clone());
        }
    }

    /// Fold a backend-returned record into the set without touching any other row.
    pub fn merge(&mut self, record: ExecutionRecord) -> MergeOutcome {
        match self.position(&record.id) {
            Some(index) => {
                self.records[index] = record;
                MergeOutcome::Replaced
            }
            None => {
                self.records.insert(0, record);
                MergeOutcome::Inserted
            }
        }
    }

    pub fn selected(&self) -> Option<&ExecutionRecord> {
        self.selected_id.as_deref().and_then(|id| self.get(id))
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected_id.as_deref().and_then(|id| self.position(id))
    }

    /// Select by id; unknown ids leave the selection unchanged and return `false`.
    pub fn select(&mut self, id: &str) -> bool {
        if self.position(id).is_some() {
            self.selected_id = Some(id.to_string());
            true
        } else {
            false
        }
    }

    /// Move the selection by `delta` rows, clamping at both ends.
    pub fn move_selection(&mut self, delta: isize) {
        if self.records.is_empty() {
            self.selected_id = None;
            return;
        }
        let current = self.selected_index().unwrap_or(0) as isize;
        let last = self.records.len() as isize - 1;
        let next = (current + delta).clamp(0, last) as usize;
        self.selected_id = Some(self.records[next].id.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowdeck_types::ExecutionStatus;

    fn record(id: &str, status: ExecutionStatus) -> ExecutionRecord {
        ExecutionRecord {
            id: id.into(),
            workflow_name: format!("wf-{id}"),
            status,
            started_at: None,
            duration_seconds: None,
            steps_completed: 0,
            total_steps: 2,
        }
    }

    #[test]
    fn merge_replaces_only_the_matching_record() {
        let mut store = ExecutionStore::default();
        store.replace_all(
            StatusFilter::All,
            vec![record("a", ExecutionStatus::Failed), record("b", ExecutionStatus::Running)],
        );

        let outcome = store.merge(record("a", ExecutionStatus::Pending));
        assert_eq!(outcome, MergeOutcome::Replaced);
        assert_eq!(store.records()[0].status, ExecutionStatus::Pending);
        assert_eq!(store.records()[1], record("b", ExecutionStatus::Running));
    }

    #[test]
    fn merge_inserts_new_runs_first() {
        let mut store = ExecutionStore::default();
        store.replace_all(StatusFilter::All, vec![record("a", ExecutionStatus::Failed)]);
        assert_eq!(store.merge(record("a2", ExecutionStatus::Pending)), MergeOutcome::Inserted);
        let ids: Vec<_> = store.records().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["a2", "a"]);
    }

    #[test]
    fn selection_follows_id_across_reloads() {
        let mut store = ExecutionStore::default();
        store.replace_all(
            StatusFilter::All,
            vec![record("a", ExecutionStatus::Failed), record("b", ExecutionStatus::Running)],
        );
        assert!(store.select("b"));
        store.replace_all(
            StatusFilter::All,
            vec![
                record("c", ExecutionStatus::Pending),
                record("a", ExecutionStatus::Failed),
                record("b", ExecutionStatus::Running),
            ],
        );
        assert_eq!(store.selected().map(|r| r.id.as_str()), Some("b"));
        assert_eq!(store.selected_index(), Some(2));
    }

    #[test]
    fn selection_clamps_when_selected_record_disappears() {
        let mut store = ExecutionStore::default();
        store.replace_all(
            StatusFilter::All,
            vec![
                record("a", ExecutionStatus::Failed),
                record("b", ExecutionStatus::Running),
                record("c", ExecutionStatus::Completed),
            ],
        );
        store.select("c");
        store.replace_all(
            StatusFilter::Only(ExecutionStatus::Failed),
            vec![record("a", ExecutionStatus::Failed)],
        );
        assert_eq!(store.selected().map(|r| r.id.as_str()), Some("a"));

        store.replace_all(StatusFilter::Only(ExecutionStatus::Pending), Vec::new());
        assert!(store.selected().is_none());
    }

    #[test]
    fn move_selection_clamps_to_bounds() {
        let mut store = ExecutionStore::default();
        store.replace_all(
            StatusFilter::All,
            vec![record("a", ExecutionStatus::Failed), record("b", ExecutionStatus::Running)],
        );
        store.move_selection(5);
        assert_eq!(store.selected_index(), Some(1));
        store.move_selection(-10);
        assert_eq!(store.selected_index(), Some(0));
        assert!(!store.select("missing"));
        assert_eq!(store.selected_index(), Some(0));
    }
}

//! The canonical in-memory watch list and its derived views.

use std::collections::HashSet;

use tokio::sync::watch;
use tracing::debug;

use crate::models::{ListFilter, MediaEntry, RelatedMedia, SearchResult};

/// Owner of the user's list entries.
///
/// Holds at most one entry per media id; every derived view (status
/// filters, sequel recommendations) is computed fresh from the canonical
/// collection and carries no state of its own. Mutations bump a revision
/// counter that subscribers observe to pull a new snapshot.
pub struct WatchList {
    entries: Vec<MediaEntry>,
    revision: watch::Sender<u64>,
}

impl WatchList {
    pub fn new() -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            entries: Vec::new(),
            revision,
        }
    }

    fn bump(&self) {
        self.revision.send_modify(|rev| *rev += 1);
    }

    /// Subscribe to change notifications. Receivers only learn *that* the
    /// list changed; they re-read whatever view they need.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    /// Atomically replace the whole collection (after a full list fetch).
    pub fn replace_all(&mut self, entries: Vec<MediaEntry>) {
        debug!(count = entries.len(), "replacing watch list");
        self.entries = entries;
        self.bump();
    }

    /// Insert or update by id. An existing entry is replaced in place,
    /// keeping its position; a new one is appended.
    pub fn upsert(&mut self, entry: MediaEntry) {
        match self.entries.iter_mut().find(|e| e.id == entry.id) {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
        self.bump();
    }

    /// Remove by id; absent ids are a no-op.
    pub fn remove(&mut self, id: u64) {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        if self.entries.len() != before {
            self.bump();
        }
    }

    pub fn get(&self, id: u64) -> Option<&MediaEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn contains(&self, id: u64) -> bool {
        self.get(id).is_some()
    }

    pub fn entries(&self) -> &[MediaEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries matching a personal status, case-insensitively. `"ALL"`
    /// returns everything; an unrecognized status matches nothing.
    /// Insertion order is preserved.
    pub fn filter_by_status(&self, status: &str) -> Vec<MediaEntry> {
        let Some(filter) = ListFilter::parse(status) else {
            debug!(status, "unknown status filter");
            return Vec::new();
        };
        self.entries
            .iter()
            .filter(|e| filter.matches(e.status))
            .cloned()
            .collect()
    }

    /// Entries whose catalog status is RELEASING.
    pub fn ongoing(&self) -> Vec<MediaEntry> {
        self.entries
            .iter()
            .filter(|e| e.is_releasing())
            .cloned()
            .collect()
    }

    /// Sequels of owned entries that are airing or announced and not yet on
    /// the list. Deduplicated by full record equality, first-seen order.
    pub fn upcoming_sequels(&self) -> Vec<SearchResult> {
        self.derive_sequels(RelatedMedia::is_upcoming_sequel)
    }

    /// Sequels of owned entries that finished airing and are not on the
    /// list.
    pub fn finished_sequels(&self) -> Vec<SearchResult> {
        self.derive_sequels(RelatedMedia::is_finished_sequel)
    }

    fn derive_sequels(
        &self,
        keep: impl Fn(&RelatedMedia) -> bool,
    ) -> Vec<SearchResult> {
        let owned: HashSet<u64> = self.entries.iter().map(|e| e.id).collect();
        let mut seen = HashSet::new();
        let mut results = Vec::new();

        for entry in &self.entries {
            for related in &entry.related {
                if !keep(related) || owned.contains(&related.id) {
                    continue;
                }
                let result = SearchResult::from(related);
                if seen.insert(result.clone()) {
                    results.push(result);
                }
            }
        }

        results
    }
}

impl Default for WatchList {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::WatchStatus;

    fn entry(id: u64, status: WatchStatus, airing: &str) -> MediaEntry {
        MediaEntry {
            id,
            title: format!("Anime {id}"),
            cover_url: format!("https://img.example/{id}.png"),
            airing_status: airing.into(),
            status,
            next_airing_at: None,
            next_episode: None,
            score: None,
            related: Vec::new(),
        }
    }

    fn sequel(id: u64, status: &str) -> RelatedMedia {
        RelatedMedia {
            id,
            title: format!("Sequel {id}"),
            cover_url: format!("https://img.example/{id}.png"),
            format: Some("TV".into()),
            status: Some(status.into()),
            start_date: None,
            relation_type: "SEQUEL".into(),
            next_airing_at: None,
        }
    }

    #[test]
    fn upsert_appends_then_replaces_in_place() {
        let mut list = WatchList::new();
        list.upsert(entry(1, WatchStatus::Current, "RELEASING"));
        list.upsert(entry(2, WatchStatus::Planning, "FINISHED"));

        let mut updated = entry(1, WatchStatus::Completed, "FINISHED");
        updated.score = Some(9);
        list.upsert(updated.clone());

        assert_eq!(list.len(), 2);
        // Position preserved.
        assert_eq!(list.entries()[0], updated);
        assert_eq!(list.entries()[1].id, 2);
    }

    #[test]
    fn upsert_is_idempotent() {
        let mut list = WatchList::new();
        let e = entry(1, WatchStatus::Current, "RELEASING");
        list.upsert(e.clone());
        list.upsert(e.clone());
        assert_eq!(list.len(), 1);
        assert_eq!(list.entries()[0], e);
    }

    #[test]
    fn remove_is_noop_for_unknown_id() {
        let mut list = WatchList::new();
        list.upsert(entry(1, WatchStatus::Current, "RELEASING"));
        list.remove(42);
        assert_eq!(list.len(), 1);
        list.remove(1);
        assert!(list.is_empty());
    }

    #[test]
    fn filter_by_status_is_case_insensitive_and_order_stable() {
        let mut list = WatchList::new();
        list.upsert(entry(1, WatchStatus::Current, "RELEASING"));
        list.upsert(entry(2, WatchStatus::Completed, "FINISHED"));
        list.upsert(entry(3, WatchStatus::Current, "RELEASING"));

        let current = list.filter_by_status("current");
        assert_eq!(current.iter().map(|e| e.id).collect::<Vec<_>>(), [1, 3]);

        assert_eq!(list.filter_by_status("ALL").len(), 3);
        assert!(list.filter_by_status("SOMEDAY").is_empty());
    }

    #[test]
    fn ongoing_matches_releasing_case_insensitively() {
        let mut list = WatchList::new();
        list.upsert(entry(1, WatchStatus::Current, "releasing"));
        list.upsert(entry(2, WatchStatus::Current, "FINISHED"));
        let ongoing = list.ongoing();
        assert_eq!(ongoing.len(), 1);
        assert_eq!(ongoing[0].id, 1);
    }

    #[test]
    fn upcoming_sequels_excludes_owned_and_dedups() {
        let mut list = WatchList::new();

        let mut a = entry(1, WatchStatus::Current, "RELEASING");
        a.related.push(sequel(99, "NOT_YET_RELEASED"));
        list.upsert(a);

        // A second owned entry pointing at the same sequel.
        let mut b = entry(2, WatchStatus::Completed, "FINISHED");
        b.related.push(sequel(99, "NOT_YET_RELEASED"));
        list.upsert(b);

        let sequels = list.upcoming_sequels();
        assert_eq!(sequels.len(), 1);
        assert_eq!(sequels[0].id, 99);
    }

    #[test]
    fn sequels_already_on_the_list_are_excluded() {
        let mut list = WatchList::new();
        let mut a = entry(1, WatchStatus::Current, "RELEASING");
        a.related.push(sequel(2, "RELEASING"));
        list.upsert(a);
        list.upsert(entry(2, WatchStatus::Planning, "RELEASING"));

        assert!(list.upcoming_sequels().is_empty());
    }

    #[test]
    fn prequels_never_appear_in_either_derivation() {
        let mut list = WatchList::new();
        let mut a = entry(1, WatchStatus::Current, "RELEASING");
        let mut prequel = sequel(5, "RELEASING");
        prequel.relation_type = "PREQUEL".into();
        a.related.push(prequel.clone());
        prequel.status = Some("FINISHED".into());
        a.related.push(prequel);
        list.upsert(a);

        assert!(list.upcoming_sequels().is_empty());
        assert!(list.finished_sequels().is_empty());
    }

    #[test]
    fn finished_sequels_split_from_upcoming() {
        let mut list = WatchList::new();
        let mut a = entry(1, WatchStatus::Completed, "FINISHED");
        a.related.push(sequel(10, "FINISHED"));
        a.related.push(sequel(11, "RELEASING"));
        list.upsert(a);

        let finished = list.finished_sequels();
        assert_eq!(finished.iter().map(|s| s.id).collect::<Vec<_>>(), [10]);
        let upcoming = list.upcoming_sequels();
        assert_eq!(upcoming.iter().map(|s| s.id).collect::<Vec<_>>(), [11]);
    }

    #[test]
    fn replace_all_swaps_the_collection() {
        let mut list = WatchList::new();
        list.upsert(entry(1, WatchStatus::Current, "RELEASING"));
        list.replace_all(vec![
            entry(7, WatchStatus::Planning, "NOT_YET_RELEASED"),
            entry(8, WatchStatus::Current, "RELEASING"),
        ]);
        assert_eq!(list.len(), 2);
        assert!(!list.contains(1));
        assert!(list.contains(7));
    }

    #[test]
    fn mutations_bump_the_revision() {
        let mut list = WatchList::new();
        let rx = list.subscribe();
        assert_eq!(*rx.borrow(), 0);

        list.upsert(entry(1, WatchStatus::Current, "RELEASING"));
        assert_eq!(*rx.borrow(), 1);

        list.remove(1);
        assert_eq!(*rx.borrow(), 2);

        // Removing a missing id changes nothing and notifies nobody.
        list.remove(1);
        assert_eq!(*rx.borrow(), 2);

        list.replace_all(Vec::new());
        assert_eq!(*rx.borrow(), 3);
    }
}

//! Refreshable snapshot of the files under one drive folder, with selection.
//!
//! [`FileCollection`] is an immutable-style value: every operation returns a
//! new collection. Selection is reconciled against each new listing by the
//! pure [`reconcile_selection`], so selected paths are always a subset of the
//! paths currently present.
//!
//! [`FileCollectionModel`] binds a collection to a `(drive, base path)` pair
//! and owns the refresh lifecycle.

use std::collections::BTreeSet;

use crate::drive::{DriveApi, DriveResult, FileEntry};

/// Keep only the selected paths that still exist in `entries`.
pub fn reconcile_selection(old: &BTreeSet<String>, entries: &[FileEntry]) -> BTreeSet<String> {
    entries
        .iter()
        .filter(|entry| old.contains(&entry.path))
        .map(|entry| entry.path.clone())
        .collect()
}

/// Ordered file entries (server order) plus the selected subset of their paths.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileCollection {
    entries: Vec<FileEntry>,
    selected: BTreeSet<String>,
}

impl FileCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collection of the file entries of a listing with nothing selected.
    /// Directories are dropped: a page manages a flat set of files.
    pub fn from_listing(entries: Vec<FileEntry>) -> Self {
        Self {
            entries: entries.into_iter().filter(|e| !e.is_directory).collect(),
            selected: BTreeSet::new(),
        }
    }

    /// Replace the entries wholesale, keeping only still-present selections.
    pub fn replaced(&self, listing: Vec<FileEntry>) -> Self {
        let mut next = Self::from_listing(listing);
        next.selected = reconcile_selection(&self.selected, &next.entries);
        let dropped = self.selected.len() - next.selected.len();
        if dropped > 0 {
            log::debug!("dropped {dropped} stale selection(s) after refresh");
        }
        next
    }

    pub fn entries(&self) -> &[FileEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn selected_paths(&self) -> &BTreeSet<String> {
        &self.selected
    }

    pub fn is_selected(&self, path: &str) -> bool {
        self.selected.contains(path)
    }

    /// Selected entries in server order.
    pub fn selected_entries(&self) -> impl Iterator<Item = &FileEntry> {
        self.entries
            .iter()
            .filter(|entry| self.selected.contains(&entry.path))
    }

    pub fn find_by_name(&self, name: &str) -> Option<&FileEntry> {
        self.entries.iter().find(|entry| entry.name == name)
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.find_by_name(name).is_some()
    }

    /// Flip membership of `path` in the selection.
    ///
    /// Allowed for paths not in the current listing; such a selection is
    /// dropped by the next refresh.
    pub fn toggle_select(&self, path: &str) -> Self {
        let mut selected = self.selected.clone();
        if !selected.remove(path) {
            selected.insert(path.to_owned());
        }
        Self {
            entries: self.entries.clone(),
            selected,
        }
    }

    /// Drop `paths` from the selection.
    pub fn deselect(&self, paths: &[String]) -> Self {
        let mut selected = self.selected.clone();
        for path in paths {
            selected.remove(path);
        }
        Self {
            entries: self.entries.clone(),
            selected,
        }
    }

    pub fn select_all(&self) -> Self {
        Self {
            entries: self.entries.clone(),
            selected: self.entries.iter().map(|e| e.path.clone()).collect(),
        }
    }

    pub fn clear_selection(&self) -> Self {
        Self {
            entries: self.entries.clone(),
            selected: BTreeSet::new(),
        }
    }

    /// Select-all checkbox: clear when everything is selected, else select all.
    pub fn toggle_select_all(&self) -> Self {
        if self.is_all_selected() {
            self.clear_selection()
        } else {
            self.select_all()
        }
    }

    /// True iff every entry is selected and there is at least one entry.
    ///
    /// Only listed paths count: a toggled path missing from the listing
    /// neither completes nor breaks "all".
    pub fn is_all_selected(&self) -> bool {
        !self.entries.is_empty() && self.selected_entries().count() == self.entries.len()
    }

    /// Some, but not all, listed entries are selected.
    pub fn is_partially_selected(&self) -> bool {
        let count = self.selected_entries().count();
        count > 0 && count < self.entries.len()
    }
}

/// Ticket identifying one refresh request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RefreshTicket(u64);

/// How completions of overlapping refreshes are applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RefreshOrdering {
    /// Every completion is applied; the last one to complete wins.
    #[default]
    LastCompletedWins,
    /// A completion older than the newest applied one is discarded.
    Strict,
}

/// Whether a completed refresh changed the snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshApplied {
    Applied,
    DiscardedStale,
}

/// The client-held snapshot for one `(drive, base path)` pair.
#[derive(Debug)]
pub struct FileCollectionModel<D> {
    drive: D,
    drive_id: String,
    base_path: String,
    collection: FileCollection,
    ordering: RefreshOrdering,
    next_ticket: u64,
    newest_applied: Option<RefreshTicket>,
}

impl<D: DriveApi> FileCollectionModel<D> {
    pub fn new(drive: D, drive_id: impl Into<String>, base_path: impl Into<String>) -> Self {
        Self {
            drive,
            drive_id: drive_id.into(),
            base_path: base_path.into(),
            collection: FileCollection::new(),
            ordering: RefreshOrdering::default(),
            next_ticket: 0,
            newest_applied: None,
        }
    }

    pub fn with_ordering(mut self, ordering: RefreshOrdering) -> Self {
        self.ordering = ordering;
        self
    }

    pub fn drive(&self) -> &D {
        &self.drive
    }

    pub fn drive_id(&self) -> &str {
        &self.drive_id
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    pub fn collection(&self) -> &FileCollection {
        &self.collection
    }

    /// List the base path and replace the snapshot.
    ///
    /// On failure the previous snapshot is kept untouched and the error is
    /// returned to the caller.
    pub async fn refresh(&mut self) -> DriveResult<&FileCollection> {
        let ticket = self.begin_refresh();
        let listing = self.drive.list(&self.drive_id, &self.base_path).await;
        self.complete_refresh(ticket, listing)?;
        Ok(&self.collection)
    }

    /// Issue a ticket for a refresh whose listing is fetched by the caller.
    pub fn begin_refresh(&mut self) -> RefreshTicket {
        self.next_ticket += 1;
        RefreshTicket(self.next_ticket)
    }

    /// Apply the listing obtained for `ticket`.
    pub fn complete_refresh(
        &mut self,
        ticket: RefreshTicket,
        listing: DriveResult<Vec<FileEntry>>,
    ) -> DriveResult<RefreshApplied> {
        let entries = listing?;

        if self.ordering == RefreshOrdering::Strict
            && self.newest_applied.is_some_and(|newest| ticket < newest)
        {
            log::debug!("discarding stale refresh {ticket:?} of {}", self.base_path);
            return Ok(RefreshApplied::DiscardedStale);
        }

        self.collection = self.collection.replaced(entries);
        self.newest_applied = Some(self.newest_applied.map_or(ticket, |n| n.max(ticket)));
        Ok(RefreshApplied::Applied)
    }

    pub fn toggle_select(&mut self, path: &str) {
        self.collection = self.collection.toggle_select(path);
    }

    pub fn deselect(&mut self, paths: &[String]) {
        self.collection = self.collection.deselect(paths);
    }

    pub fn select_all(&mut self) {
        self.collection = self.collection.select_all();
    }

    pub fn clear_selection(&mut self) {
        self.collection = self.collection.clear_selection();
    }

    pub fn toggle_select_all(&mut self) {
        self.collection = self.collection.toggle_select_all();
    }

    pub fn is_all_selected(&self) -> bool {
        self.collection.is_all_selected()
    }
}

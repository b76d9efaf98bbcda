use crate::entry::Entry;
use crate::error::Result;
use crate::storage::KeyValueStore;
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// Key holding the JSON array of entries
pub const ENTRIES_KEY: &str = "entries";

/// Ordered entries (newest first), the selected entry and the editor buffer.
///
/// Once opened the collection is never empty and always has a selection.
pub struct EntryStore<S: KeyValueStore> {
    store: S,
    entries: Vec<Entry>,
    selected_id: Option<String>,
    buffer: String,
    // Last write of the collection failed; memory is ahead of storage
    write_pending: bool,
}

impl<S: KeyValueStore> EntryStore<S> {
    /// Open the store and load the persisted entries
    pub fn open(store: S) -> Result<Self> {
        let mut entry_store = EntryStore {
            store,
            entries: Vec::new(),
            selected_id: None,
            buffer: String::new(),
            write_pending: false,
        };
        entry_store.load()?;
        Ok(entry_store)
    }

    /// Prepend a fresh empty entry and select it. Nothing is persisted.
    pub fn create(&mut self) -> &Entry {
        let mut entry = Entry::new();
        while self.entries.iter().any(|e| e.id == entry.id) {
            entry = Entry::new();
        }
        debug!(id = %entry.id, "created entry");

        self.selected_id = Some(entry.id.clone());
        self.buffer.clear();
        self.entries.insert(0, entry);
        &self.entries[0]
    }

    /// Store `text` as the selected entry's content and persist everything.
    ///
    /// On a write failure the in-memory entry keeps the new text.
    pub fn save(&mut self, text: &str) -> Result<()> {
        if let Some(id) = self.selected_id.as_deref() {
            if let Some(entry) = self.entries.iter_mut().find(|e| e.id == id) {
                entry.set_content(text);
            }
        }
        self.buffer = text.to_string();
        self.persist()
    }

    /// Save the current editor buffer to the selected entry
    pub fn save_buffer(&mut self) -> Result<()> {
        let text = self.buffer.clone();
        self.save(&text)
    }

    /// Replace the in-memory collection with the persisted one.
    ///
    /// Absent, empty or malformed data falls back to [`EntryStore::create`].
    pub fn load(&mut self) -> Result<()> {
        self.entries = read_entries(&self.store)?;
        self.write_pending = false;
        match self.entries.first() {
            Some(first) => {
                self.selected_id = Some(first.id.clone());
                self.buffer = first.content.clone();
                info!(count = self.entries.len(), "loaded entries");
            }
            None => {
                self.create();
            }
        }
        Ok(())
    }

    /// Load the entry with `id` into the buffer. Returns false on a miss.
    pub fn select(&mut self, id: &str) -> bool {
        match self.entries.iter().find(|e| e.id == id) {
            Some(entry) => {
                self.buffer = entry.content.clone();
                self.selected_id = Some(entry.id.clone());
                true
            }
            None => {
                debug!(id, "select miss");
                false
            }
        }
    }

    /// Remove the entry with `id` and persist. Returns false on a miss.
    pub fn delete(&mut self, id: &str) -> Result<bool> {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        if self.entries.len() == before {
            debug!(id, "delete miss");
            return Ok(false);
        }

        let write = self.persist();

        if self.selected_id.as_deref() == Some(id) {
            match self.entries.first() {
                Some(first) => {
                    self.selected_id = Some(first.id.clone());
                    self.buffer = first.content.clone();
                }
                None => {
                    self.create();
                }
            }
        }

        write.map(|_| true)
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected_id.as_deref()
    }

    pub fn selected(&self) -> Option<&Entry> {
        let id = self.selected_id.as_deref()?;
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn buffer_mut(&mut self) -> &mut String {
        &mut self.buffer
    }

    pub fn set_buffer(&mut self, text: impl Into<String>) {
        self.buffer = text.into();
    }

    /// True when the buffer has edits not yet saved to the selected entry,
    /// or the last write to storage failed
    pub fn is_dirty(&self) -> bool {
        let edited = match self.selected() {
            Some(entry) => entry.content != self.buffer,
            None => !self.buffer.is_empty(),
        };
        edited || self.write_pending
    }

    /// True when in-memory entries have not reached storage
    pub fn has_pending_write(&self) -> bool {
        self.write_pending
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    fn persist(&mut self) -> Result<()> {
        let result = serde_json::to_string(&self.entries)
            .map_err(Into::into)
            .and_then(|serialized| self.store.set(ENTRIES_KEY, &serialized));
        self.write_pending = result.is_err();
        result
    }
}

/// Persisted entries, newest first. Malformed data reads as empty.
///
/// Entries repeating an earlier id are dropped.
pub fn read_entries(store: &impl KeyValueStore) -> Result<Vec<Entry>> {
    let Some(raw) = store.get(ENTRIES_KEY)? else {
        return Ok(Vec::new());
    };
    let mut entries = match serde_json::from_str::<Vec<Entry>>(&raw) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(error = %e, "discarding malformed entries");
            return Ok(Vec::new());
        }
    };

    let mut seen = HashSet::new();
    let before = entries.len();
    entries.retain(|e| seen.insert(e.id.clone()));
    if entries.len() != before {
        warn!(dropped = before - entries.len(), "dropped entries with duplicate ids");
    }
    Ok(entries)
}

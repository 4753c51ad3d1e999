//! The record store: an ordered list of records backed by a single JSON file.
//!
//! The whole file is read on [`RecordStore::reload`] and the whole file is
//! rewritten on [`RecordStore::save`]. There are no incremental writes and no
//! locking, so two processes sharing a file will overwrite each other.
//!
//! Records are addressed two ways:
//! - by *number*, the 1-based position in the current list. Numbers shift when
//!   an earlier record is deleted. This is what the menu shows.
//! - by [`RecordId`], assigned when a record enters the store and never reused
//!   by the same store. Ids live in memory only; the file holds bare records.

use crate::error::{Result, StoreError};
use crate::record::{Field, Record, RecordPatch};
use serde::Serialize;
use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Stable in-memory identity of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId(u64);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A record together with its current display number and its id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Numbered<'a> {
    pub number: usize,
    pub id: RecordId,
    pub record: &'a Record,
}

/// Result of [`RecordStore::search`].
#[derive(Debug, PartialEq, Eq)]
pub enum SearchOutcome<'a> {
    /// Records whose field matched, in store order. May be empty.
    Matches(Vec<Numbered<'a>>),
    /// The scan hit a code that is not `1`..`6` before any valid one.
    InvalidCriterion(String),
    /// The selection contained no codes at all.
    NoCriteria,
}

#[derive(Debug, Clone)]
struct Entry {
    id: RecordId,
    record: Record,
}

/// Ordered collection of [`Record`]s persisted to one file.
#[derive(Debug)]
pub struct RecordStore {
    path: PathBuf,
    entries: Vec<Entry>,
    next_id: u64,
}

/// Read all records from `path`.
///
/// A missing file is an empty phonebook, not an error.
pub fn load(path: &Path) -> Result<Vec<Record>> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(path = %path.display(), "phonebook file missing, starting empty");
            return Ok(Vec::new());
        }
        Err(source) => {
            return Err(StoreError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    let records: Vec<Record> = serde_json::from_str(&contents).map_err(|source| {
        warn!(path = %path.display(), error = %source, "phonebook file is malformed");
        StoreError::Malformed {
            path: path.to_path_buf(),
            source,
        }
    })?;
    debug!(path = %path.display(), count = records.len(), "loaded phonebook");
    Ok(records)
}

/// Overwrite `path` with `records` as a 4-space indented JSON array.
///
/// Missing parent directories are created. The write is not atomic.
pub fn save<'a>(path: &Path, records: impl IntoIterator<Item = &'a Record>) -> Result<()> {
    let io_err = |source: std::io::Error| StoreError::Io {
        path: path.to_path_buf(),
        source,
    };
    let records: Vec<&Record> = records.into_iter().collect();

    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    records
        .serialize(&mut ser)
        .map_err(|e| io_err(std::io::Error::other(e)))?;
    buf.push(b'\n');

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    fs::write(path, buf).map_err(io_err)?;
    debug!(path = %path.display(), count = records.len(), "saved phonebook");
    Ok(())
}

/// Number of pages needed to show `len` records, `page_size` per page.
pub fn page_count(len: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    len.div_ceil(page_size)
}

impl RecordStore {
    /// Create an empty store bound to `path` without touching the file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            entries: Vec::new(),
            next_id: 1,
        }
    }

    /// Create a store bound to `path` and load it.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let mut store = Self::new(path);
        store.reload()?;
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replace the in-memory list with the current file contents.
    ///
    /// Reloaded records receive fresh ids.
    pub fn reload(&mut self) -> Result<()> {
        let records = load(&self.path)?;
        self.entries.clear();
        for record in records {
            self.push(record);
        }
        Ok(())
    }

    /// Write the whole list back to the file.
    pub fn save(&self) -> Result<()> {
        save(&self.path, self.records())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Records in display order.
    pub fn records(&self) -> impl Iterator<Item = &Record> {
        self.entries.iter().map(|e| &e.record)
    }

    /// Records in display order, with their numbers and ids.
    pub fn numbered(&self) -> impl Iterator<Item = Numbered<'_>> {
        self.entries.iter().enumerate().map(|(i, e)| Numbered {
            number: i + 1,
            id: e.id,
            record: &e.record,
        })
    }

    /// Record at 1-based position `number`.
    pub fn get(&self, number: usize) -> Result<Numbered<'_>> {
        let index = self.index_of(number)?;
        let entry = &self.entries[index];
        Ok(Numbered {
            number,
            id: entry.id,
            record: &entry.record,
        })
    }

    pub fn by_id(&self, id: RecordId) -> Option<Numbered<'_>> {
        self.numbered().find(|n| n.id == id)
    }

    /// Current display number of the record with `id`.
    pub fn number_of(&self, id: RecordId) -> Option<usize> {
        self.by_id(id).map(|n| n.number)
    }

    pub fn page_count(&self, page_size: usize) -> usize {
        page_count(self.len(), page_size)
    }

    /// Records on 1-based page `page_number`, `page_size` per page.
    ///
    /// The last page may be short. Numbers are positions in the full list.
    pub fn page(&self, page_size: usize, page_number: usize) -> Result<Vec<Numbered<'_>>> {
        let pages = self.page_count(page_size);
        if page_number == 0 || page_number > pages {
            return Err(StoreError::InvalidPage {
                page: page_number,
                pages,
            });
        }
        let start = (page_number - 1) * page_size;
        let end = (start + page_size).min(self.len());
        Ok(self.numbered().skip(start).take(end - start).collect())
    }

    /// Append `record` as the last entry. No duplicate or content checks.
    pub fn add(&mut self, record: Record) -> RecordId {
        let id = self.push(record);
        info!(number = self.len(), %id, "record added");
        id
    }

    /// Apply `patch` to the record at `number` and return the updated record.
    ///
    /// The store is left untouched when `number` is out of range.
    pub fn update(&mut self, number: usize, patch: &RecordPatch) -> Result<&Record> {
        let index = self.index_of(number)?;
        let entry = &mut self.entries[index];
        entry.record.apply(patch);
        info!(number, id = %entry.id, "record updated");
        Ok(&entry.record)
    }

    /// Remove the record at `number`; later records move up by one.
    pub fn delete(&mut self, number: usize) -> Result<Record> {
        let index = self.index_of(number)?;
        let entry = self.entries.remove(index);
        info!(number, id = %entry.id, "record deleted");
        Ok(entry.record)
    }

    pub fn delete_by_id(&mut self, id: RecordId) -> Option<Record> {
        let index = self.entries.iter().position(|e| e.id == id)?;
        self.delete(index + 1).ok()
    }

    /// Filter records by a single criterion.
    ///
    /// `selection` is a whitespace-separated list of criterion codes (see
    /// [`Field::code`]). Codes are scanned in order:
    /// - an invalid code stops the scan with [`SearchOutcome::InvalidCriterion`];
    /// - the first valid code asks `value_for` for a comparison value and the
    ///   records whose field equals it exactly are returned straight away.
    ///
    /// Any codes after the first valid one are ignored, so `"2 4"` filters on
    /// last name only and `value_for` is called at most once.
    pub fn search<F, E>(
        &self,
        selection: &str,
        mut value_for: F,
    ) -> std::result::Result<SearchOutcome<'_>, E>
    where
        F: FnMut(Field) -> std::result::Result<String, E>,
    {
        if let Some(code) = selection.split_whitespace().next() {
            let Some(field) = Field::from_code(code) else {
                return Ok(SearchOutcome::InvalidCriterion(code.to_string()));
            };
            let value = value_for(field)?;
            let matches = self
                .numbered()
                .filter(|n| n.record.get(field) == value)
                .collect();
            return Ok(SearchOutcome::Matches(matches));
        }
        Ok(SearchOutcome::NoCriteria)
    }

    fn push(&mut self, record: Record) -> RecordId {
        let id = RecordId(self.next_id);
        self.next_id += 1;
        self.entries.push(Entry { id, record });
        id
    }

    fn index_of(&self, number: usize) -> Result<usize> {
        if number == 0 || number > self.len() {
            return Err(StoreError::OutOfRange {
                number,
                len: self.len(),
            });
        }
        Ok(number - 1)
    }
}

use crate::entry::Entry;
use chrono::NaiveDate;

/// The ordered collection of entries for one calendar day.
///
/// Entries are kept in non-decreasing time order at all times: `insert`
/// places a late-arriving timestamp (`--at`, `--ago`) at its chronological
/// position instead of appending it to the end.
#[derive(Debug, Clone)]
pub struct WorkLog {
    date: NaiveDate,
    entries: Vec<Entry>,
}

impl WorkLog {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            entries: Vec::new(),
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Inserts preserving chronological order. An entry with the same time
    /// as an existing one lands after it, so insertion order is stable.
    /// Repeated identical entries are legal; nothing is de-duplicated.
    pub fn insert(&mut self, entry: Entry) {
        let pos = self.entries.partition_point(|e| e.time <= entry.time);
        self.entries.insert(pos, entry);
    }

    /// Read-only chronological view of the day's entries.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Non-empty descriptions, most recently used first, duplicates
    /// collapsed to their latest occurrence. This is the candidate list
    /// presented by `resume`.
    pub fn distinct_descriptions(&self) -> Vec<String> {
        let mut seen: Vec<String> = Vec::new();
        for entry in self.entries.iter().rev() {
            if entry.is_stop() {
                continue;
            }
            if !seen.iter().any(|d| d == &entry.description) {
                seen.push(entry.description.clone());
            }
        }
        seen
    }
}

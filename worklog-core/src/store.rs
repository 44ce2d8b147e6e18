//! Flat-file persistence for day logs.
//!
//! One file per day under `{root}/YYYY/MM/YYYY-MM-DD.log`, one record per
//! line in chronological order:
//!
//!   HH:MM:SS<TAB>description
//!
//! An empty description is a stop marker. Saves go through a temp file in
//! the same directory followed by a rename, so a crash mid-write never
//! leaves a half-written log behind.

use crate::entry::Entry;
use crate::error::{Error, Result};
use crate::paths::{day_path, lock_path};
use crate::worklog::WorkLog;
use chrono::{NaiveDate, NaiveTime};
use fs4::fs_std::FileExt;
use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

#[derive(Debug, Clone)]
pub struct LogStore {
    root: PathBuf,
}

/// Advisory cross-process lock covering one load-mutate-save cycle.
/// Released on drop. Two concurrent invocations against the same day would
/// otherwise race on read-modify-write; this is defensive, not a guarantee.
#[derive(Debug)]
pub struct DayLock {
    file: File,
}

impl Drop for DayLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}

impl LogStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Loads the log for `day`. A missing file is a valid empty log, not an
    /// error. Records are re-inserted through [`WorkLog::insert`], so even a
    /// hand-edited file comes back in chronological order.
    pub fn load(&self, day: NaiveDate) -> Result<WorkLog> {
        let path = day_path(&self.root, day);
        let mut log = WorkLog::new(day);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(log),
            Err(err) => return Err(Error::Storage { path, source: err }),
        };
        for (number, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let entry = parse_record(line).ok_or_else(|| Error::Storage {
                path: path.clone(),
                source: std::io::Error::new(
                    ErrorKind::InvalidData,
                    format!("malformed record on line {}", number + 1),
                ),
            })?;
            log.insert(entry);
        }
        Ok(log)
    }

    /// Persists the log atomically. Re-saving an unchanged log rewrites the
    /// same bytes, so the operation is idempotent.
    pub fn save(&self, log: &WorkLog) -> Result<()> {
        let path = day_path(&self.root, log.date());
        let storage = |source| Error::Storage {
            path: path.clone(),
            source,
        };

        let parent = match path.parent() {
            Some(parent) => parent,
            None => return Err(storage(std::io::Error::other("day path has no parent"))),
        };
        fs::create_dir_all(parent).map_err(storage)?;

        let mut tmp = NamedTempFile::new_in(parent).map_err(storage)?;
        for entry in log.entries() {
            // A line break inside a description would split the record and
            // make the file unloadable.
            if entry.description.contains(['\n', '\r']) {
                return Err(storage(std::io::Error::new(
                    ErrorKind::InvalidData,
                    format!("description '{}' contains a line break", entry.description),
                )));
            }
            writeln!(tmp, "{}\t{}", entry.time.format("%H:%M:%S"), entry.description)
                .map_err(storage)?;
        }
        tmp.persist(&path).map_err(|err| storage(err.error))?;
        Ok(())
    }

    /// Takes the advisory lock for `day`, blocking until it is free.
    pub fn lock(&self, day: NaiveDate) -> Result<DayLock> {
        let path = lock_path(&self.root, day);
        let storage = |source| Error::Storage {
            path: path.clone(),
            source,
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(storage)?;
        }
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .open(&path)
            .map_err(storage)?;
        FileExt::lock_exclusive(&file).map_err(storage)?;
        Ok(DayLock { file })
    }
}

fn parse_record(line: &str) -> Option<Entry> {
    let (time_str, description) = match line.split_once('\t') {
        Some((time, rest)) => (time, rest),
        None => (line, ""),
    };
    let time = NaiveTime::parse_from_str(time_str.trim(), "%H:%M:%S").ok()?;
    Some(Entry::task(time, description))
}

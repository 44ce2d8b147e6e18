use chrono::NaiveDate;
use std::path::{Path, PathBuf};

pub fn day_file_name(date: NaiveDate) -> String {
    format!("{}.log", date.format("%Y-%m-%d"))
}

pub fn day_dir(root: &Path, date: NaiveDate) -> PathBuf {
    root.join(date.format("%Y").to_string())
        .join(date.format("%m").to_string())
}

pub fn day_path(root: &Path, date: NaiveDate) -> PathBuf {
    day_dir(root, date).join(day_file_name(date))
}

/// Companion lock file for a day's log, kept next to it.
pub fn lock_path(root: &Path, date: NaiveDate) -> PathBuf {
    day_dir(root, date).join(format!(".{}.lock", date.format("%Y-%m-%d")))
}

use chrono::{NaiveDate, NaiveDateTime};
use std::path::PathBuf;
use thiserror::Error;

/// Everything that can go wrong inside the core. All of these are detected
/// before any mutation reaches the log file.
#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot parse '{input}': {reason}")]
    Parse { input: String, reason: String },
    #[error("'{0}' is not a valid day, expected YYYY-MM-DD")]
    InvalidDay(String),
    #[error("the task description is empty")]
    EmptyDescription,
    #[error("no tasks logged on {0}, nothing to resume")]
    NoPriorTask(NaiveDate),
    #[error("selection {index} is out of range, there are {len} tasks to pick from")]
    SelectionOutOfRange { index: usize, len: usize },
    #[error("{timestamp} does not fall on {day}")]
    TimeOutOfRange {
        timestamp: NaiveDateTime,
        day: NaiveDate,
    },
    #[error("storage failure on {path}")]
    Storage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Config(String),
    #[error("prompt failed: {0}")]
    Prompt(String),
}

pub type Result<T> = std::result::Result<T, Error>;

pub mod config;
pub mod entry;
pub mod error;
pub mod paths;
pub mod report;
pub mod store;
pub mod timespec;
pub mod tracker;
pub mod worklog;

pub use config::Config;
pub use entry::Entry;
pub use error::{Error, Result};
pub use report::{Report, ReportLine, RollupRow};
pub use store::LogStore;
pub use timespec::TimeSpec;
pub use tracker::{Prompter, Tracker};
pub use worklog::WorkLog;

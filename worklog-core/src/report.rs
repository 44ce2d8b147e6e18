//! Report derivation and its pure formatting helpers.
//!
//! An entry's duration runs until the next entry's timestamp. The last
//! entry of the day, unless it is a stop marker, is still open and shows up
//! as ongoing. Rollup rows group closed intervals by exact description
//! text, in first-seen order; descriptions matching an excluded name
//! case-insensitively stay out of the rollup but remain in the raw lines.

use crate::worklog::WorkLog;
use chrono::{Duration, NaiveDate, NaiveTime};

/// One line of the raw chronological log view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportLine {
    pub time: NaiveTime,
    pub description: String,
    /// Closed-interval duration; `None` for a stop marker or an open task.
    pub duration: Option<Duration>,
    /// True for a non-stop entry with no later entry to close it.
    pub ongoing: bool,
}

impl ReportLine {
    pub fn is_stop(&self) -> bool {
        self.description.is_empty()
    }
}

/// Summed closed-interval time for one task description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RollupRow {
    pub description: String,
    pub total: Duration,
}

#[derive(Debug, Clone)]
pub struct Report {
    pub date: NaiveDate,
    pub lines: Vec<ReportLine>,
    pub rollup: Vec<RollupRow>,
    /// Sum over the rollup rows, excluded tasks not counted.
    pub total: Duration,
}

/// Derives the raw line view and the per-task rollup from a day's log.
pub fn generate(log: &WorkLog, excluded: &[String]) -> Report {
    let entries = log.entries();
    let mut lines = Vec::with_capacity(entries.len());
    let mut rollup: Vec<RollupRow> = Vec::new();

    for (i, entry) in entries.iter().enumerate() {
        let end = entries.get(i + 1).map(|next| next.time);
        let duration = if entry.is_stop() {
            None
        } else {
            end.map(|end| end - entry.time)
        };
        let ongoing = !entry.is_stop() && end.is_none();
        lines.push(ReportLine {
            time: entry.time,
            description: entry.description.clone(),
            duration,
            ongoing,
        });

        let Some(duration) = duration else { continue };
        if is_excluded(&entry.description, excluded) {
            continue;
        }
        match rollup.iter_mut().find(|row| row.description == entry.description) {
            Some(row) => row.total = row.total + duration,
            None => rollup.push(RollupRow {
                description: entry.description.clone(),
                total: duration,
            }),
        }
    }

    let total = rollup
        .iter()
        .fold(Duration::zero(), |acc, row| acc + row.total);
    Report {
        date: log.date(),
        lines,
        rollup,
        total,
    }
}

/// Case-insensitive, whitespace-preserving match on the full description.
fn is_excluded(description: &str, excluded: &[String]) -> bool {
    excluded.iter().any(|name| name.eq_ignore_ascii_case(description))
}

/// `7h30m`, `45m`, `12s`; the zero duration renders as `0m`.
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.num_seconds().max(0);
    let (h, m, s) = (secs / 3600, secs % 3600 / 60, secs % 60);
    let mut out = String::new();
    if h > 0 {
        out.push_str(&format!("{h}h"));
    }
    if m > 0 {
        out.push_str(&format!("{m}m"));
    }
    if s > 0 {
        out.push_str(&format!("{s}s"));
    }
    if out.is_empty() {
        out.push_str("0m");
    }
    out
}

/// `# Friday, 15 Aug 2025`
pub fn format_day_header(date: NaiveDate, date_format: &str) -> String {
    format!("# {}", date.format(date_format))
}

//! The command processor: `start`, `resume`, `stop` and `report` over one
//! day's log. Every mutating verb resolves its timestamp first, takes the
//! day's advisory lock, loads, inserts exactly one entry and saves; on any
//! error the log file is left exactly as it was.

use crate::config::Config;
use crate::entry::Entry;
use crate::error::{Error, Result};
use crate::report::{self, Report};
use crate::store::LogStore;
use crate::timespec::{self, TimeSpec};
use crate::worklog::WorkLog;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use std::fs;

/// Interactive capabilities injected by the CLI, so the core's command
/// logic is testable without any terminal I/O.
pub trait Prompter {
    /// Asks the user for a task description. Used by `start` when none was
    /// given on the invocation.
    fn read_description(&mut self) -> Result<String>;

    /// Asks the user to pick an index into `candidates` (0-based,
    /// most-recent-first). Implementations return the raw choice; range
    /// checking happens in the tracker.
    fn pick(&mut self, candidates: &[String]) -> Result<usize>;
}

/// The central struct for all work-log operations.
///
/// Holds the configuration and the store, and implements the CLI verbs in
/// terms of [`TimeSpec`] resolution and [`WorkLog`] insertion.
#[derive(Debug)]
pub struct Tracker {
    pub config: Config,
    store: LogStore,
}

impl Tracker {
    /// Creates a new `Tracker`, loading configuration from standard paths.
    pub fn new() -> Result<Self> {
        Self::with_config(Config::load()?)
    }

    /// Creates a `Tracker` with a specific `Config`, ensuring the log root
    /// directory exists.
    pub fn with_config(config: Config) -> Result<Self> {
        fs::create_dir_all(&config.log_dir).map_err(|err| Error::Storage {
            path: config.log_dir.clone(),
            source: err,
        })?;
        let store = LogStore::new(config.log_dir.clone());
        Ok(Self { config, store })
    }

    pub fn store(&self) -> &LogStore {
        &self.store
    }

    /// Starts a new task on `day`, implicitly closing the currently open
    /// one. The description comes from the invocation or, when `None`, from
    /// the prompter; whitespace-only text fails with `EmptyDescription`.
    ///
    /// `now` overrides the reference instant; `None` means the local wall
    /// clock truncated to seconds.
    pub fn start(
        &self,
        day: NaiveDate,
        spec: TimeSpec,
        description: Option<String>,
        prompter: &mut dyn Prompter,
        now: Option<NaiveDateTime>,
    ) -> Result<WorkLog> {
        let description = match description {
            Some(text) => text,
            None => prompter.read_description()?,
        };
        let description = description.trim().to_string();
        if description.is_empty() {
            return Err(Error::EmptyDescription);
        }
        if description.chars().any(char::is_control) {
            return Err(Error::Parse {
                input: description,
                reason: "the description must not contain control characters".to_string(),
            });
        }
        let time = self.resolve_on_day(day, spec, now)?;
        self.apply(day, Entry::task(time, description))
    }

    /// Logs a past task again. The candidate list is the day's distinct
    /// descriptions, most recent first; the prompter picks one by index.
    pub fn resume(
        &self,
        day: NaiveDate,
        spec: TimeSpec,
        prompter: &mut dyn Prompter,
        now: Option<NaiveDateTime>,
    ) -> Result<WorkLog> {
        let time = self.resolve_on_day(day, spec, now)?;

        let _lock = self.store.lock(day)?;
        let mut log = self.store.load(day)?;
        let candidates = log.distinct_descriptions();
        if candidates.is_empty() {
            return Err(Error::NoPriorTask(day));
        }
        let index = prompter.pick(&candidates)?;
        let description = candidates
            .get(index)
            .ok_or(Error::SelectionOutOfRange {
                index,
                len: candidates.len(),
            })?
            .clone();
        log.insert(Entry::task(time, description));
        self.store.save(&log)?;
        Ok(log)
    }

    /// Closes the currently open task by inserting a stop marker.
    pub fn stop(
        &self,
        day: NaiveDate,
        spec: TimeSpec,
        now: Option<NaiveDateTime>,
    ) -> Result<WorkLog> {
        let time = self.resolve_on_day(day, spec, now)?;
        self.apply(day, Entry::stop(time))
    }

    /// Read-only report for `day`. A day with no log file reports empty.
    pub fn report(&self, day: NaiveDate) -> Result<Report> {
        let log = self.store.load(day)?;
        Ok(self.summarize(&log))
    }

    /// Derives the report for an already-loaded log.
    pub fn summarize(&self, log: &WorkLog) -> Report {
        report::generate(log, &self.config.excluded)
    }

    /// Resolves `spec` and rejects timestamps that fall outside `day`;
    /// cross-day inserts are never allowed.
    fn resolve_on_day(
        &self,
        day: NaiveDate,
        spec: TimeSpec,
        now: Option<NaiveDateTime>,
    ) -> Result<NaiveTime> {
        let now = now.unwrap_or_else(timespec::local_now);
        let timestamp = timespec::resolve(day, spec, now)?;
        if timestamp.date() != day {
            return Err(Error::TimeOutOfRange { timestamp, day });
        }
        Ok(timestamp.time())
    }

    fn apply(&self, day: NaiveDate, entry: Entry) -> Result<WorkLog> {
        let _lock = self.store.lock(day)?;
        let mut log = self.store.load(day)?;
        log.insert(entry);
        self.store.save(&log)?;
        Ok(log)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::tests::mk_config;
    use crate::paths::day_path;
    use chrono::Duration;
    use tempfile::tempdir;

    /// Canned prompter answers, no terminal involved.
    struct Scripted {
        description: &'static str,
        choice: usize,
    }

    impl Prompter for Scripted {
        fn read_description(&mut self) -> Result<String> {
            Ok(self.description.to_string())
        }

        fn pick(&mut self, _candidates: &[String]) -> Result<usize> {
            Ok(self.choice)
        }
    }

    fn scripted(description: &'static str, choice: usize) -> Scripted {
        Scripted {
            description,
            choice,
        }
    }

    fn mk_tracker() -> (Tracker, tempfile::TempDir) {
        let tmp = tempdir().unwrap();
        let root = tmp.path().join("worklog");
        let tracker = Tracker::with_config(mk_config(root)).unwrap();
        (tracker, tmp)
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 8, 15).unwrap()
    }

    fn at(h: u32, m: u32) -> TimeSpec {
        TimeSpec::At(NaiveTime::from_hms_opt(h, m, 0).unwrap())
    }

    #[test]
    fn start_appends_and_persists() {
        let (tracker, _tmp) = mk_tracker();
        let log = tracker
            .start(
                day(),
                at(9, 0),
                Some("writing tests".to_string()),
                &mut scripted("", 0),
                None,
            )
            .unwrap();
        assert_eq!(log.entries().len(), 1);

        let reloaded = tracker.store().load(day()).unwrap();
        assert_eq!(reloaded.entries(), log.entries());
    }

    #[test]
    fn start_prompts_when_no_description_given() {
        let (tracker, _tmp) = mk_tracker();
        let log = tracker
            .start(day(), at(9, 0), None, &mut scripted("deep work", 0), None)
            .unwrap();
        assert_eq!(log.entries()[0].description, "deep work");
    }

    #[test]
    fn start_rejects_whitespace_only_description() {
        let (tracker, _tmp) = mk_tracker();
        let err = tracker
            .start(day(), at(9, 0), None, &mut scripted("   ", 0), None)
            .unwrap_err();
        assert!(matches!(err, Error::EmptyDescription));
        assert!(!day_path(tracker.store().root(), day()).exists());
    }

    #[test]
    fn start_rejects_descriptions_with_line_breaks() {
        let (tracker, _tmp) = mk_tracker();
        let err = tracker
            .start(
                day(),
                at(9, 0),
                Some("foo\nbar".to_string()),
                &mut scripted("", 0),
                None,
            )
            .unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
        assert!(!day_path(tracker.store().root(), day()).exists());
    }

    #[test]
    fn start_ago_lands_at_its_chronological_position() {
        let (tracker, _tmp) = mk_tracker();
        tracker
            .start(day(), at(12, 0), Some("early".into()), &mut scripted("", 0), None)
            .unwrap();
        tracker
            .start(day(), at(13, 0), Some("late".into()), &mut scripted("", 0), None)
            .unwrap();

        let now = day().and_hms_opt(14, 0, 0).unwrap();
        let log = tracker
            .start(
                day(),
                TimeSpec::Ago(Duration::minutes(90)),
                Some("meeting".into()),
                &mut scripted("", 0),
                Some(now),
            )
            .unwrap();

        let order: Vec<&str> = log
            .entries()
            .iter()
            .map(|e| e.description.as_str())
            .collect();
        assert_eq!(order, vec!["early", "meeting", "late"]);
        assert_eq!(
            log.entries()[1].time,
            NaiveTime::from_hms_opt(12, 30, 0).unwrap()
        );
    }

    #[test]
    fn resume_with_no_history_fails_and_writes_nothing() {
        let (tracker, _tmp) = mk_tracker();
        let now = day().and_hms_opt(14, 0, 0).unwrap();
        let err = tracker
            .resume(
                day(),
                TimeSpec::Ago(Duration::minutes(20)),
                &mut scripted("", 0),
                Some(now),
            )
            .unwrap_err();
        assert!(matches!(err, Error::NoPriorTask(_)));
        assert!(!day_path(tracker.store().root(), day()).exists());
    }

    #[test]
    fn resume_picks_from_most_recent_first_candidates() {
        let (tracker, _tmp) = mk_tracker();
        for (h, desc) in [(9, "A"), (10, "B"), (11, "A"), (12, "C")] {
            tracker
                .start(day(), at(h, 0), Some(desc.into()), &mut scripted("", 0), None)
                .unwrap();
        }

        // Candidates are ["C", "A", "B"]; index 1 resumes "A".
        let log = tracker
            .resume(day(), at(13, 0), &mut scripted("", 1), None)
            .unwrap();
        let last = log.entries().last().unwrap();
        assert_eq!(last.description, "A");
        assert_eq!(last.time, NaiveTime::from_hms_opt(13, 0, 0).unwrap());
    }

    #[test]
    fn resume_selection_out_of_range_leaves_the_file_alone() {
        let (tracker, _tmp) = mk_tracker();
        tracker
            .start(day(), at(9, 0), Some("A".into()), &mut scripted("", 0), None)
            .unwrap();
        let before = fs::read_to_string(day_path(tracker.store().root(), day())).unwrap();

        let err = tracker
            .resume(day(), at(10, 0), &mut scripted("", 7), None)
            .unwrap_err();
        assert!(matches!(
            err,
            Error::SelectionOutOfRange { index: 7, len: 1 }
        ));

        let after = fs::read_to_string(day_path(tracker.store().root(), day())).unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn stop_closes_the_open_task() {
        let (tracker, _tmp) = mk_tracker();
        tracker
            .start(day(), at(9, 0), Some("A".into()), &mut scripted("", 0), None)
            .unwrap();
        let log = tracker.stop(day(), at(17, 0), None).unwrap();
        assert!(log.entries()[1].is_stop());

        let report = tracker.report(day()).unwrap();
        assert_eq!(report.rollup.len(), 1);
        assert_eq!(report.rollup[0].total, Duration::hours(8));
    }

    #[test]
    fn timestamps_resolving_to_another_day_are_rejected() {
        let (tracker, _tmp) = mk_tracker();
        // 00:10 on the 16th, 20 minutes ago is the 15th: not this log's day.
        let target = NaiveDate::from_ymd_opt(2025, 8, 16).unwrap();
        let now = target.and_hms_opt(0, 10, 0).unwrap();
        let err = tracker
            .stop(target, TimeSpec::Ago(Duration::minutes(20)), Some(now))
            .unwrap_err();
        assert!(matches!(err, Error::TimeOutOfRange { .. }));
        assert!(!day_path(tracker.store().root(), target).exists());
    }

    #[test]
    fn report_on_a_day_without_a_file_is_empty() {
        let (tracker, _tmp) = mk_tracker();
        let report = tracker.report(day()).unwrap();
        assert!(report.lines.is_empty());
        assert!(report.rollup.is_empty());
    }
}

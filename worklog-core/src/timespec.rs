use crate::error::{Error, Result};
use chrono::{Duration, Local, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use once_cell::sync::Lazy;
use regex::Regex;

/// A user-supplied point in time, to be resolved against a reference day
/// and the current instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeSpec {
    /// The current wall-clock time.
    Now,
    /// An absolute clock time on the reference day.
    At(NaiveTime),
    /// A duration before the current instant.
    Ago(Duration),
}

impl TimeSpec {
    /// Builds a spec from the `--at`/`--ago` flag values. Both absent means
    /// "now"; the flags are mutually exclusive.
    pub fn from_args(at: Option<&str>, ago: Option<&str>) -> Result<Self> {
        match (at, ago) {
            (Some(_), Some(_)) => Err(Error::Parse {
                input: "--at --ago".to_string(),
                reason: "at most one of a clock time and a duration may be given".to_string(),
            }),
            (Some(t), None) => Ok(Self::At(parse_clock_time(t)?)),
            (None, Some(d)) => Ok(Self::Ago(parse_duration(d)?)),
            (None, None) => Ok(Self::Now),
        }
    }
}

/// Resolves a spec into a concrete timestamp.
///
/// Pure function: `now` is the caller's current instant, already truncated
/// to whole seconds. `Now` on a day other than `now`'s own keeps the current
/// time of day but takes the reference day's date. An `Ago` duration that
/// reaches back beyond the representable time range fails instead of
/// wrapping.
pub fn resolve(day: NaiveDate, spec: TimeSpec, now: NaiveDateTime) -> Result<NaiveDateTime> {
    match spec {
        TimeSpec::Now => {
            if day == now.date() {
                Ok(now)
            } else {
                Ok(day.and_time(now.time()))
            }
        }
        TimeSpec::At(time) => Ok(day.and_time(time)),
        TimeSpec::Ago(duration) => now.checked_sub_signed(duration).ok_or_else(|| Error::Parse {
            input: format!("{duration}"),
            reason: "the duration reaches back beyond the representable time range".to_string(),
        }),
    }
}

/// The local wall clock, truncated to whole seconds.
pub fn local_now() -> NaiveDateTime {
    Local::now()
        .naive_local()
        .with_nanosecond(0)
        .expect("zero nanoseconds is valid")
}

/// Parses `HH:MM` or `HH:MM:SS` into a clock time.
pub fn parse_clock_time(s: &str) -> Result<NaiveTime> {
    let trimmed = s.trim();
    NaiveTime::parse_from_str(trimmed, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M"))
        .map_err(|_| Error::Parse {
            input: s.to_string(),
            reason: "expected a clock time like 14:30 or 14:30:15".to_string(),
        })
}

/// Parses an ISO `YYYY-MM-DD` day; `None` means today.
pub fn parse_day_or_today(s: Option<&str>) -> Result<NaiveDate> {
    match s {
        Some(day) => NaiveDate::parse_from_str(day.trim(), "%Y-%m-%d")
            .map_err(|_| Error::InvalidDay(day.to_string())),
        None => Ok(Local::now().date_naive()),
    }
}

static DURATION_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+)\s*([A-Za-z]+)").unwrap());

/// Parses a duration written as `<integer><unit>` tokens, units `h`, `m`
/// and `s`, optionally separated by whitespace ("1h30m", "1h 30m", "45m").
/// Each unit may appear at most once.
pub fn parse_duration(s: &str) -> Result<Duration> {
    let parse_err = |reason: String| Error::Parse {
        input: s.to_string(),
        reason,
    };

    let mut seconds: i64 = 0;
    let mut seen = [false; 3];
    let mut cursor = 0usize;
    for caps in DURATION_TOKEN.captures_iter(s) {
        let token = caps.get(0).expect("match always has a full capture");
        if !s[cursor..token.start()].trim().is_empty() {
            return Err(parse_err(
                "expected tokens like '1h 30m' with integer magnitudes".to_string(),
            ));
        }
        cursor = token.end();

        let magnitude: i64 = caps[1]
            .parse()
            .map_err(|_| parse_err("magnitude is not an integer".to_string()))?;
        let (slot, factor) = match &caps[2] {
            "h" => (0, 3600),
            "m" => (1, 60),
            "s" => (2, 1),
            unit => return Err(parse_err(format!("unknown unit '{unit}'"))),
        };
        if seen[slot] {
            return Err(parse_err(format!(
                "unit '{}' appears more than once",
                &caps[2]
            )));
        }
        seen[slot] = true;
        seconds = magnitude
            .checked_mul(factor)
            .and_then(|token_seconds| seconds.checked_add(token_seconds))
            .ok_or_else(|| parse_err("the duration is too large".to_string()))?;
    }

    if cursor == 0 || !s[cursor..].trim().is_empty() {
        return Err(parse_err(
            "expected tokens like '1h 30m' with integer magnitudes".to_string(),
        ));
    }
    Duration::try_seconds(seconds).ok_or_else(|| parse_err("the duration is too large".to_string()))
}

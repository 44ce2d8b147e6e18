use chrono::NaiveTime;

/// One timestamped record in a day's log.
///
/// An empty description is a stop marker: it closes the previous task's
/// interval without starting a new one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub time: NaiveTime,
    pub description: String,
}

impl Entry {
    pub fn task(time: NaiveTime, description: impl Into<String>) -> Self {
        Self {
            time,
            description: description.into(),
        }
    }

    pub fn stop(time: NaiveTime) -> Self {
        Self {
            time,
            description: String::new(),
        }
    }

    pub fn is_stop(&self) -> bool {
        self.description.is_empty()
    }
}

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// Raw start/end strings for one task, as handed over by the state layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDates {
    pub start_date: String,
    pub end_date: String,
}

impl TaskDates {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start_date: start.into(),
            end_date: end.into(),
        }
    }

    pub fn start(&self) -> Option<NaiveDateTime> {
        parse_date(&self.start_date)
    }

    pub fn end(&self) -> Option<NaiveDateTime> {
        parse_date(&self.end_date)
    }

    /// Both dates parsed, or `None` if either is unreadable.
    pub fn range(&self) -> Option<DateRange> {
        Some(DateRange::new(self.start()?, self.end()?))
    }
}

/// Tasks keyed by id. Ordered so layouts and saved files are deterministic.
pub type TaskCollection = BTreeMap<String, TaskDates>;

/// A parsed `[start, end)` interval used for bars and drag previews.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start_date: NaiveDateTime,
    pub end_date: NaiveDateTime,
}

impl DateRange {
    pub fn new(start_date: NaiveDateTime, end_date: NaiveDateTime) -> Self {
        Self {
            start_date,
            end_date,
        }
    }
}

/// The bar currently being dragged, with the pixel box it was picked up at.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DragRange {
    pub start_date: NaiveDateTime,
    pub end_date: NaiveDateTime,
    pub bar_left: f32,
    pub bar_width: f32,
}

impl DragRange {
    pub fn range(&self) -> DateRange {
        DateRange::new(self.start_date, self.end_date)
    }
}

/// Try parsing a date string with several common formats.
///
/// Date-only values resolve to midnight. Offsets in RFC 3339 strings are
/// dropped and the wall-clock time is kept.
pub fn parse_date(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }
    for fmt in &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    for fmt in &["%Y-%m-%d", "%d/%m/%Y", "%m/%d/%Y", "%d-%m-%Y", "%d.%m.%Y", "%Y/%m/%d", "%m-%d-%Y"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d.and_time(NaiveTime::MIN));
        }
    }
    None
}

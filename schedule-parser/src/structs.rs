use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;

use chrono::{NaiveDate, NaiveTime};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::ExportError;

const DATE_FORMAT: &str = "%d/%m/%Y";
const TIME_FORMAT: &str = "%H:%M";

/// A `dd/MM/yyyy` date as it appears in pasted schedules and task entries.
///
/// Two keys are equal only if their text is equal. Ordering follows the
/// calendar day; keys that don't decode sort after all others.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
pub struct DateKey(String);

impl DateKey {
    pub fn new<S: Into<String>>(key: S) -> Self {
        Self(key.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.0, DATE_FORMAT).ok()
    }
}

impl From<NaiveDate> for DateKey {
    fn from(date: NaiveDate) -> Self {
        Self(date.format(DATE_FORMAT).to_string())
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Ord for DateKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.date(), other.date()) {
            (Some(a), Some(b)) => a.cmp(&b).then_with(|| self.0.cmp(&other.0)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => self.0.cmp(&other.0),
        }
    }
}

impl PartialOrd for DateKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// One meeting of a course: who teaches it and the raw `HH:mm - HH:mm` range.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Session {
    pub instructor: String,
    pub hours: String,
}

impl Session {
    pub fn time_range(&self) -> Result<(NaiveTime, NaiveTime), ExportError> {
        let (start, end) = self
            .hours
            .split_once(" - ")
            .ok_or_else(|| ExportError::HoursRange(self.hours.clone()))?;

        let parse = |time: &str| {
            NaiveTime::parse_from_str(time.trim(), TIME_FORMAT)
                .map_err(|_| ExportError::Time(time.to_owned()))
        };

        let (start, end) = (parse(start)?, parse(end)?);
        if end < start {
            return Err(ExportError::EndBeforeStart(self.hours.clone()));
        }

        Ok((start, end))
    }
}

impl fmt::Display for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.instructor, self.hours)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Course {
    pub name: String,
    pub sessions: HashMap<DateKey, Session>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TeacherLink {
    pub teacher: String,
    /// Empty until the user sets one.
    pub url: String,
}

/// The merged view: one row per date on the axis, one cell per course.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScheduleTable {
    pub courses: Vec<String>,
    pub rows: Vec<TableRow>,
    pub teachers: Vec<CourseTeachers>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TableRow {
    pub date: DateKey,
    /// Session descriptors in course order, empty where the course has no meeting.
    pub cells: Vec<String>,
    pub task: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CourseTeachers {
    pub course: String,
    pub teachers: Vec<TeacherLink>,
}

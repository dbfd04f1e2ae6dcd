//! Core record types for qrattend.
//!
//! These mirror the two persisted tables (students and attendance) plus the
//! flattened row produced by the report join.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Date format used for attendance days, both in storage and in exports.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A registered student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    /// Surrogate key assigned by storage.
    pub id: i64,
    /// Externally assigned unique identifier.
    pub roll_number: String,
    /// Display name.
    pub name: String,
}

/// Attendance status values.
///
/// Scanning only ever assigns [`AttendanceStatus::Present`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttendanceStatus {
    /// The student's code was scanned on that day.
    Present,
}

impl AttendanceStatus {
    /// The text stored in the `status` column.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Present => "Present",
        }
    }
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a stored status string is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown attendance status: {0}")]
pub struct UnknownStatus(pub String);

impl FromStr for AttendanceStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Present" => Ok(Self::Present),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

/// One (student, day) attendance entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    /// Surrogate key assigned by storage.
    pub id: i64,
    /// The student this record belongs to.
    pub student_id: i64,
    /// Calendar day of the record.
    pub date: NaiveDate,
    /// Recorded status.
    pub status: AttendanceStatus,
}

/// Result of marking a student present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkOutcome {
    /// A new record was inserted.
    Marked,
    /// A record for that day already existed; nothing changed.
    AlreadyMarked,
}

/// One row of the attendance report.
///
/// Students without any attendance appear with `date` and `status` unset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRow {
    /// Student roll number.
    pub roll_number: String,
    /// Student name.
    pub name: String,
    /// Day of attendance, if any.
    pub date: Option<NaiveDate>,
    /// Status on that day, if any.
    pub status: Option<AttendanceStatus>,
}

impl ReportRow {
    /// The date rendered as `YYYY-MM-DD`, or empty.
    #[must_use]
    pub fn date_field(&self) -> String {
        self.date
            .map(|d| d.format(DATE_FORMAT).to_string())
            .unwrap_or_default()
    }

    /// The status as text, or empty.
    #[must_use]
    pub fn status_field(&self) -> &'static str {
        self.status.map_or("", |s| s.as_str())
    }
}

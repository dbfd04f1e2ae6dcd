//! Attendance ledger.
//!
//! Holds at most one record per (student, day). Re-marking the same day is a
//! no-op reported as [`MarkOutcome::AlreadyMarked`].

use chrono::NaiveDate;
use rusqlite::params;
use rusqlite::types::Type;
use tracing::debug;

use crate::error::Result;
use crate::model::{AttendanceRecord, AttendanceStatus, MarkOutcome, DATE_FORMAT};
use crate::storage::Storage;

/// Attendance records backed by a borrowed [`Storage`].
#[derive(Debug, Clone, Copy)]
pub struct AttendanceLedger<'a> {
    storage: &'a Storage,
}

impl<'a> AttendanceLedger<'a> {
    /// Create a ledger over `storage`.
    #[must_use]
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Mark a student present on `date`.
    ///
    /// The insert and the existence check are one statement, so the
    /// (student, date) uniqueness holds without a separate lookup.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails, including when
    /// `student_id` does not reference a registered student.
    pub fn mark_present(&self, student_id: i64, date: NaiveDate) -> Result<MarkOutcome> {
        let day = date.format(DATE_FORMAT).to_string();
        let inserted = self.storage.conn().execute(
            r"
            INSERT INTO attendance (student_id, date, status)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(student_id, date) DO NOTHING
            ",
            params![student_id, day, AttendanceStatus::Present.as_str()],
        )?;

        if inserted == 0 {
            debug!("Student {} already marked on {}", student_id, day);
            Ok(MarkOutcome::AlreadyMarked)
        } else {
            debug!("Marked student {} present on {}", student_id, day);
            Ok(MarkOutcome::Marked)
        }
    }

    /// All records of one student, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails or a stored row is malformed.
    pub fn records_for(&self, student_id: i64) -> Result<Vec<AttendanceRecord>> {
        let mut stmt = self.storage.conn().prepare(
            r"
            SELECT attendance_id, student_id, date, status
            FROM attendance WHERE student_id = ?1
            ORDER BY date
            ",
        )?;
        let records = stmt
            .query_map([student_id], Self::row_to_record)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(records)
    }

    /// Total number of attendance records.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn count(&self) -> Result<i64> {
        let count: i64 =
            self.storage
                .conn()
                .query_row("SELECT COUNT(*) FROM attendance", [], |row| row.get(0))?;
        Ok(count)
    }

    fn row_to_record(row: &rusqlite::Row) -> rusqlite::Result<AttendanceRecord> {
        let date: String = row.get(2)?;
        let status: String = row.get(3)?;
        Ok(AttendanceRecord {
            id: row.get(0)?,
            student_id: row.get(1)?,
            date: parse_date(2, &date)?,
            status: parse_status(3, &status)?,
        })
    }
}

/// Parse a stored `YYYY-MM-DD` column value.
pub(crate) fn parse_date(idx: usize, value: &str) -> rusqlite::Result<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// Parse a stored status column value.
pub(crate) fn parse_status(idx: usize, value: &str) -> rusqlite::Result<AttendanceStatus> {
    value
        .parse()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RegistryConfig;
    use crate::registry::StudentRegistry;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn storage_with_student() -> (Storage, i64) {
        let storage = Storage::open_in_memory().unwrap();
        let id = StudentRegistry::new(&storage, &RegistryConfig::default())
            .unwrap()
            .register("101", "Alice")
            .unwrap()
            .id;
        (storage, id)
    }

    #[test]
    fn test_mark_present_then_already_marked() {
        let (storage, sid) = storage_with_student();
        let ledger = AttendanceLedger::new(&storage);

        assert_eq!(
            ledger.mark_present(sid, day(2024, 1, 1)).unwrap(),
            MarkOutcome::Marked
        );
        assert_eq!(
            ledger.mark_present(sid, day(2024, 1, 1)).unwrap(),
            MarkOutcome::AlreadyMarked
        );

        let records = ledger.records_for(sid).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].date, day(2024, 1, 1));
        assert_eq!(records[0].status, AttendanceStatus::Present);
    }

    #[test]
    fn test_mark_present_different_days() {
        let (storage, sid) = storage_with_student();
        let ledger = AttendanceLedger::new(&storage);

        ledger.mark_present(sid, day(2024, 1, 2)).unwrap();
        ledger.mark_present(sid, day(2024, 1, 1)).unwrap();

        let dates: Vec<NaiveDate> = ledger
            .records_for(sid)
            .unwrap()
            .into_iter()
            .map(|r| r.date)
            .collect();
        assert_eq!(dates, vec![day(2024, 1, 1), day(2024, 1, 2)]);
        assert_eq!(ledger.count().unwrap(), 2);
    }

    #[test]
    fn test_mark_present_unknown_student() {
        let storage = Storage::open_in_memory().unwrap();
        let ledger = AttendanceLedger::new(&storage);

        let err = ledger.mark_present(42, day(2024, 1, 1)).unwrap_err();
        assert!(err.is_storage_error());
        assert_eq!(ledger.count().unwrap(), 0);
    }

    #[test]
    fn test_records_for_student_without_attendance() {
        let (storage, sid) = storage_with_student();
        let ledger = AttendanceLedger::new(&storage);

        assert!(ledger.records_for(sid).unwrap().is_empty());
    }

    #[test]
    fn test_malformed_stored_status() {
        let (storage, sid) = storage_with_student();
        storage
            .conn()
            .execute(
                "INSERT INTO attendance (student_id, date, status) VALUES (?1, '2024-01-01', 'Late')",
                [sid],
            )
            .unwrap();

        let ledger = AttendanceLedger::new(&storage);
        assert!(ledger.records_for(sid).is_err());
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date(0, "2024-02-29").unwrap(), day(2024, 2, 29));
        assert!(parse_date(0, "29/02/2024").is_err());
    }
}

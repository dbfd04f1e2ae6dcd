//! Student registry.
//!
//! Creates and looks up students by roll number. Roll numbers are unique; the
//! `UNIQUE` constraint on `students.roll_number` is the source of truth and a
//! violation is reported as [`Error::DuplicateRollNumber`].

use regex::Regex;
use rusqlite::{ffi, params, OptionalExtension};
use tracing::debug;

use crate::config::RegistryConfig;
use crate::error::{Error, Result};
use crate::model::Student;
use crate::qr::{has_reserved_char, PAYLOAD_DELIMITER};
use crate::storage::Storage;

/// Registry of students backed by a borrowed [`Storage`].
#[derive(Debug)]
pub struct StudentRegistry<'a> {
    storage: &'a Storage,
    roll_pattern: Regex,
}

impl<'a> StudentRegistry<'a> {
    /// Create a registry over `storage` using the configured roll number format.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the roll number pattern is not a valid regex.
    pub fn new(storage: &'a Storage, config: &RegistryConfig) -> Result<Self> {
        let roll_pattern =
            Regex::new(&config.roll_number_pattern).map_err(|e| Error::ConfigValidation {
                message: format!("invalid regex pattern: {e}"),
            })?;
        Ok(Self {
            storage,
            roll_pattern,
        })
    }

    /// Register a new student.
    ///
    /// Surrounding whitespace is trimmed from both fields before validation.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidStudent`] if either field is rejected,
    /// [`Error::DuplicateRollNumber`] if the roll number is taken, or a
    /// database error.
    pub fn register(&self, roll_number: &str, name: &str) -> Result<Student> {
        let roll_number = roll_number.trim();
        let name = name.trim();
        self.validate(roll_number, name)?;

        let result = self.storage.conn().execute(
            "INSERT INTO students (roll_number, name) VALUES (?1, ?2)",
            params![roll_number, name],
        );

        match result {
            Ok(_) => {}
            Err(rusqlite::Error::SqliteFailure(e, _))
                if e.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE =>
            {
                return Err(Error::duplicate_roll_number(roll_number));
            }
            Err(e) => return Err(e.into()),
        }

        let id = self.storage.conn().last_insert_rowid();
        debug!("Registered student {} with id {}", roll_number, id);
        Ok(Student {
            id,
            roll_number: roll_number.to_string(),
            name: name.to_string(),
        })
    }

    /// Look up a student by roll number.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StudentNotFound`] if no student has this roll number,
    /// or a database error.
    pub fn find_by_roll(&self, roll_number: &str) -> Result<Student> {
        self.storage
            .conn()
            .query_row(
                "SELECT student_id, roll_number, name FROM students WHERE roll_number = ?1",
                [roll_number],
                Self::row_to_student,
            )
            .optional()?
            .ok_or_else(|| Error::student_not_found(roll_number))
    }

    /// All students ordered by roll number.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn list(&self) -> Result<Vec<Student>> {
        let mut stmt = self.storage.conn().prepare(
            "SELECT student_id, roll_number, name FROM students ORDER BY roll_number",
        )?;
        let students = stmt
            .query_map([], Self::row_to_student)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(students)
    }

    /// Number of registered students.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn count(&self) -> Result<i64> {
        let count: i64 =
            self.storage
                .conn()
                .query_row("SELECT COUNT(*) FROM students", [], |row| row.get(0))?;
        Ok(count)
    }

    fn validate(&self, roll_number: &str, name: &str) -> Result<()> {
        if roll_number.is_empty() {
            return Err(Error::invalid_student("roll number is empty"));
        }
        // The roll number becomes part of a file name and of the QR payload.
        if has_reserved_char(roll_number) {
            return Err(Error::invalid_student(format!(
                "roll number {roll_number:?} contains a reserved character"
            )));
        }
        if !self.roll_pattern.is_match(roll_number) {
            return Err(Error::invalid_student(format!(
                "roll number {roll_number:?} does not match {}",
                self.roll_pattern.as_str()
            )));
        }
        if name.is_empty() {
            return Err(Error::invalid_student("name is empty"));
        }
        if name.contains(PAYLOAD_DELIMITER) {
            return Err(Error::invalid_student(format!(
                "name {name:?} contains '{PAYLOAD_DELIMITER}'"
            )));
        }
        Ok(())
    }

    fn row_to_student(row: &rusqlite::Row) -> rusqlite::Result<Student> {
        Ok(Student {
            id: row.get(0)?,
            roll_number: row.get(1)?,
            name: row.get(2)?,
        })
    }
}

//! Attendance report.
//!
//! Joins every student to their attendance history and exports the result as
//! CSV. Students with no attendance appear once with empty date and status.

use std::io::Write;
use std::path::Path;

use tracing::info;

use crate::error::{Error, Result};
use crate::ledger::{parse_date, parse_status};
use crate::model::ReportRow;
use crate::storage::Storage;

/// CSV header, in column order.
pub const CSV_HEADER: [&str; 4] = ["roll_number", "name", "date", "status"];

/// Builds the flat attendance report from a borrowed [`Storage`].
#[derive(Debug, Clone, Copy)]
pub struct ReportBuilder<'a> {
    storage: &'a Storage,
}

impl<'a> ReportBuilder<'a> {
    /// Create a report builder over `storage`.
    #[must_use]
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Build the report.
    ///
    /// Rows are ordered by date ascending. Students with no attendance have no
    /// date and sort first; ties are ordered by roll number.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails or a stored row is malformed.
    pub fn build_report(&self) -> Result<Vec<ReportRow>> {
        let mut stmt = self.storage.conn().prepare(
            r"
            SELECT s.roll_number, s.name, a.date, a.status
            FROM students s
            LEFT JOIN attendance a ON s.student_id = a.student_id
            ORDER BY a.date, s.roll_number
            ",
        )?;

        let rows = stmt
            .query_map([], |row| {
                let date: Option<String> = row.get(2)?;
                let status: Option<String> = row.get(3)?;
                Ok(ReportRow {
                    roll_number: row.get(0)?,
                    name: row.get(1)?,
                    date: date.as_deref().map(|d| parse_date(2, d)).transpose()?,
                    status: status.as_deref().map(|s| parse_status(3, s)).transpose()?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(rows)
    }
}

/// Write `rows` as CSV, header first.
///
/// The header is written even when there are no rows.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_csv<W: Write>(rows: &[ReportRow], writer: W) -> Result<()> {
    let mut out = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    out.write_record(CSV_HEADER)?;
    for row in rows {
        let date = row.date_field();
        out.write_record([
            row.roll_number.as_str(),
            row.name.as_str(),
            date.as_str(),
            row.status_field(),
        ])?;
    }
    out.flush()?;
    Ok(())
}

/// Export `rows` to a CSV file, creating parent directories as needed.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written.
pub fn export_csv(rows: &[ReportRow], path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }

    let file = std::fs::File::create(path)?;
    write_csv(rows, file)?;
    info!("Report saved as {}", path.display());
    Ok(())
}

/// Render `rows` as an aligned text table.
#[must_use]
pub fn render_table(rows: &[ReportRow]) -> String {
    let cells: Vec<[String; 4]> = rows
        .iter()
        .map(|r| {
            [
                r.roll_number.clone(),
                r.name.clone(),
                r.date_field(),
                r.status_field().to_string(),
            ]
        })
        .collect();

    let mut widths = CSV_HEADER.map(|h| h.chars().count());
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let header = CSV_HEADER.map(str::to_string);
    for line in std::iter::once(&header).chain(cells.iter()) {
        let padded: Vec<String> = line
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect();
        out.push_str(padded.join("  ").trim_end());
        out.push('\n');
    }
    out
}

//! Attendance scanning.
//!
//! Walks a directory of images, decodes each QR payload, resolves the roll
//! number against the registry and marks the student present. Per-file
//! problems are logged and skipped; storage errors abort the scan.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::ScanConfig;
use crate::error::{Error, Result};
use crate::ledger::AttendanceLedger;
use crate::model::MarkOutcome;
use crate::qr::{ImageDecoder, Payload};
use crate::registry::StudentRegistry;

/// Counters for one scan run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScanSummary {
    /// Image files examined.
    pub files: usize,
    /// Students newly marked present.
    pub marked: usize,
    /// Students that already had a record for the day.
    pub already_marked: usize,
    /// Payloads naming an unregistered roll number.
    pub unknown: usize,
    /// Images without any QR code.
    pub no_code: usize,
    /// Unreadable images or malformed payloads.
    pub failed: usize,
}

/// Marks attendance from QR images.
#[derive(Debug)]
pub struct Scanner<'a, D> {
    registry: &'a StudentRegistry<'a>,
    ledger: AttendanceLedger<'a>,
    decoder: D,
    extensions: Vec<String>,
    report_unknown: bool,
}

impl<'a, D: ImageDecoder> Scanner<'a, D> {
    /// Create a scanner.
    #[must_use]
    pub fn new(
        registry: &'a StudentRegistry<'a>,
        ledger: AttendanceLedger<'a>,
        decoder: D,
        config: &ScanConfig,
    ) -> Self {
        Self {
            registry,
            ledger,
            decoder,
            extensions: config
                .extensions
                .iter()
                .map(|ext| ext.trim().trim_start_matches('.').to_ascii_lowercase())
                .filter(|ext| !ext.is_empty())
                .collect(),
            report_unknown: config.report_unknown,
        }
    }

    /// Scan every matching image in `dir` and mark attendance for `date`.
    ///
    /// Files are processed in file name order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InputDirectoryMissing`] before touching anything if
    /// `dir` is not a directory, an I/O error if it cannot be listed, or a
    /// database error.
    pub fn scan_directory(&self, dir: &Path, date: NaiveDate) -> Result<ScanSummary> {
        if !dir.is_dir() {
            return Err(Error::InputDirectoryMissing {
                path: dir.to_path_buf(),
            });
        }

        let files = self.image_files(dir)?;
        info!("Scanning {} images in {}", files.len(), dir.display());

        let mut summary = ScanSummary::default();
        for path in &files {
            summary.files += 1;
            self.scan_file(path, date, &mut summary)?;
        }

        info!(
            "Scan complete: {} marked, {} already marked, {} unknown, {} without code, {} failed",
            summary.marked, summary.already_marked, summary.unknown, summary.no_code, summary.failed
        );
        Ok(summary)
    }

    /// Apply one decoded payload text.
    ///
    /// # Errors
    ///
    /// Returns an error only if the database operation fails.
    pub fn apply_payload(
        &self,
        text: &str,
        date: NaiveDate,
        summary: &mut ScanSummary,
    ) -> Result<()> {
        let payload = match Payload::parse(text) {
            Ok(payload) => payload,
            Err(e) => {
                warn!("{}", e);
                summary.failed += 1;
                return Ok(());
            }
        };

        let student = match self.registry.find_by_roll(&payload.roll_number) {
            Ok(student) => student,
            Err(e) if e.is_not_found() => {
                if self.report_unknown {
                    warn!("Unknown roll number {}, skipping", payload.roll_number);
                } else {
                    debug!("Unknown roll number {}, skipping", payload.roll_number);
                }
                summary.unknown += 1;
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        match self.ledger.mark_present(student.id, date)? {
            MarkOutcome::Marked => {
                info!("Attendance marked for {}", student.name);
                summary.marked += 1;
            }
            MarkOutcome::AlreadyMarked => {
                info!("Attendance already marked for {}", student.name);
                summary.already_marked += 1;
            }
        }
        Ok(())
    }

    fn scan_file(&self, path: &Path, date: NaiveDate, summary: &mut ScanSummary) -> Result<()> {
        let payloads = match self.decoder.decode(path) {
            Ok(payloads) => payloads,
            Err(e) => {
                warn!("{}", e);
                summary.failed += 1;
                return Ok(());
            }
        };

        if payloads.is_empty() {
            debug!("No QR code found in {}", path.display());
            summary.no_code += 1;
            return Ok(());
        }

        for text in &payloads {
            self.apply_payload(text, date, summary)?;
        }
        Ok(())
    }

    fn image_files(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_file() && self.matches_extension(&path) {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }

    fn matches_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                let ext = ext.to_ascii_lowercase();
                self.extensions.iter().any(|allowed| *allowed == ext)
            })
    }
}

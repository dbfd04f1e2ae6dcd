//! `qrattend` - QR code based student attendance
//!
//! This library registers students, generates a QR code per student, marks
//! attendance from scanned QR images and exports an attendance report.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod enroll;
pub mod error;
pub mod ledger;
pub mod logging;
pub mod model;
pub mod qr;
pub mod registry;
pub mod report;
pub mod scan;
pub mod storage;

pub use config::Config;
pub use enroll::{enroll, regenerate_qr, Enrollment};
pub use error::{DecodeError, Error, Result};
pub use ledger::AttendanceLedger;
pub use logging::init_logging;
pub use model::{AttendanceRecord, AttendanceStatus, MarkOutcome, ReportRow, Student};
pub use registry::StudentRegistry;
pub use report::ReportBuilder;
pub use scan::{ScanSummary, Scanner};
pub use storage::{Storage, StorageStats};

//! Student enrollment: registration plus QR image as one unit.

use std::path::PathBuf;

use tracing::{info, warn};

use crate::error::Result;
use crate::model::Student;
use crate::qr::QrGenerator;
use crate::registry::StudentRegistry;
use crate::storage::Storage;

/// A newly enrolled student and the image carrying their code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enrollment {
    /// The registered student.
    pub student: Student,
    /// Path of the generated QR image.
    pub qr_path: PathBuf,
}

/// Register a student and write their QR image.
///
/// The insert is committed only after the image is written, so a failed
/// image leaves no student behind. A duplicate roll number aborts before any
/// image is produced, and the image is removed again if the commit fails.
///
/// # Errors
///
/// Returns the registry error (duplicate, invalid input) or the image error,
/// with nothing persisted in either case.
pub fn enroll(
    storage: &Storage,
    registry: &StudentRegistry<'_>,
    generator: &QrGenerator,
    roll_number: &str,
    name: &str,
) -> Result<Enrollment> {
    let tx = storage.transaction()?;
    let student = registry.register(roll_number, name)?;
    let qr_path = generator.generate(&student)?;
    if let Err(e) = tx.commit() {
        if let Err(remove) = std::fs::remove_file(&qr_path) {
            warn!("Could not remove {}: {}", qr_path.display(), remove);
        }
        return Err(e.into());
    }

    info!("Student {} added successfully", student.name);
    Ok(Enrollment { student, qr_path })
}

/// Rewrite the QR image of an already registered student.
///
/// # Errors
///
/// Returns [`crate::Error::StudentNotFound`] for an unknown roll number, or
/// the image error.
pub fn regenerate_qr(
    registry: &StudentRegistry<'_>,
    generator: &QrGenerator,
    roll_number: &str,
) -> Result<PathBuf> {
    let student = registry.find_by_roll(roll_number.trim())?;
    generator.generate(&student)
}

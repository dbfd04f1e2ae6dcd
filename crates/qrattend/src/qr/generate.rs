//! QR image generation.

use std::path::PathBuf;

use image::Luma;
use qrcode::QrCode;
use tracing::info;

use crate::config::QrConfig;
use crate::error::{Error, Result};
use crate::model::Student;

use super::{has_reserved_char, Payload};

/// Writes one PNG per student into the configured output directory.
#[derive(Debug, Clone)]
pub struct QrGenerator {
    output_dir: PathBuf,
    module_size: u32,
    quiet_zone: bool,
}

impl QrGenerator {
    /// Create a generator from configuration.
    #[must_use]
    pub fn new(config: &QrConfig) -> Self {
        Self {
            output_dir: config.output_dir.clone(),
            module_size: config.module_size,
            quiet_zone: config.quiet_zone,
        }
    }

    /// Image path for a roll number: `<output_dir>/qr_<roll_number>.png`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidStudent`] if the roll number contains a path
    /// separator or the payload delimiter. Stored rows are not guaranteed to
    /// have passed registry validation.
    pub fn path_for(&self, roll_number: &str) -> Result<PathBuf> {
        if roll_number.is_empty() || has_reserved_char(roll_number) {
            return Err(Error::invalid_student(format!(
                "roll number {roll_number:?} cannot be used as a file name"
            )));
        }
        Ok(self.output_dir.join(format!("qr_{roll_number}.png")))
    }

    /// Encode the student's payload and write it as a PNG.
    ///
    /// An existing image for the same roll number is overwritten.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload cannot be encoded, the output directory
    /// cannot be created, or the image cannot be written.
    pub fn generate(&self, student: &Student) -> Result<PathBuf> {
        let path = self.path_for(&student.roll_number)?;
        let payload = Payload::from(student).encode();
        let code = QrCode::new(payload.as_bytes()).map_err(|source| Error::QrEncode {
            roll_number: student.roll_number.clone(),
            source,
        })?;

        let image = code
            .render::<Luma<u8>>()
            .module_dimensions(self.module_size, self.module_size)
            .quiet_zone(self.quiet_zone)
            .build();

        if !self.output_dir.exists() {
            std::fs::create_dir_all(&self.output_dir).map_err(|source| {
                Error::DirectoryCreate {
                    path: self.output_dir.clone(),
                    source,
                }
            })?;
        }

        image.save(&path).map_err(|source| Error::ImageWrite {
            path: path.clone(),
            source,
        })?;

        info!("QR code saved as {}", path.display());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_output(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("qrattend_qr_{tag}_{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        dir
    }

    fn alice() -> Student {
        Student {
            id: 1,
            roll_number: "101".to_string(),
            name: "Alice".to_string(),
        }
    }

    #[test]
    fn test_path_for() {
        let generator = QrGenerator::new(&QrConfig::default());
        assert_eq!(
            generator.path_for("101").unwrap(),
            PathBuf::from("QR_Codes").join("qr_101.png")
        );
    }

    #[test]
    fn test_path_for_rejects_reserved_characters() {
        let generator = QrGenerator::new(&QrConfig::default());
        for roll in ["../x", "a/b", "a\\b", "1|2", ""] {
            let err = generator.path_for(roll).unwrap_err();
            assert!(matches!(err, Error::InvalidStudent { .. }), "{roll:?}");
        }
    }

    #[test]
    fn test_generate_refuses_path_escape() {
        let dir = temp_output("escape");
        let generator = QrGenerator::new(&QrConfig {
            output_dir: dir.join("codes"),
            ..QrConfig::default()
        });
        let student = Student {
            id: 1,
            roll_number: "../../x".to_string(),
            name: "Mallory".to_string(),
        };

        assert!(generator.generate(&student).is_err());
        assert!(!dir.exists());
    }

    #[test]
    fn test_generate_writes_png() {
        let dir = temp_output("png");
        let config = QrConfig {
            output_dir: dir.clone(),
            ..QrConfig::default()
        };
        let generator = QrGenerator::new(&config);

        let path = generator.generate(&alice()).unwrap();
        assert_eq!(path, dir.join("qr_101.png"));

        let img = image::open(&path).unwrap();
        // Smallest QR version is 21 modules wide, plus the quiet zone.
        assert!(img.width() >= 21 * 10);
        assert_eq!(img.width(), img.height());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_generate_respects_module_size() {
        let dir = temp_output("size");
        let small = QrGenerator::new(&QrConfig {
            output_dir: dir.join("small"),
            module_size: 2,
            quiet_zone: false,
        });
        let large = QrGenerator::new(&QrConfig {
            output_dir: dir.join("large"),
            module_size: 4,
            quiet_zone: false,
        });

        let a = image::open(small.generate(&alice()).unwrap()).unwrap();
        let b = image::open(large.generate(&alice()).unwrap()).unwrap();
        assert_eq!(a.width() * 2, b.width());

        let _ = std::fs::remove_dir_all(&dir);
    }
}

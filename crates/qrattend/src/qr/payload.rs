//! The text carried inside a student's QR code.

use std::fmt;

use crate::error::DecodeError;
use crate::model::Student;

/// Separator between roll number and name.
pub const PAYLOAD_DELIMITER: char = '|';

/// Whether a roll number contains a character that cannot appear in a payload
/// roll number or an image file name.
pub(crate) fn has_reserved_char(roll_number: &str) -> bool {
    roll_number
        .chars()
        .any(|c| matches!(c, PAYLOAD_DELIMITER | '/' | '\\'))
}

/// Decoded `roll_number|name` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload {
    /// Roll number used to look the student up.
    pub roll_number: String,
    /// Name as printed into the code. Informational only.
    pub name: String,
}

impl Payload {
    /// Create a payload from its parts.
    #[must_use]
    pub fn new(roll_number: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            roll_number: roll_number.into(),
            name: name.into(),
        }
    }

    /// Parse decoded QR text.
    ///
    /// Splits on the first delimiter, so a name may itself contain `|`.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::MissingDelimiter`] if there is no `|`, or
    /// [`DecodeError::EmptyRollNumber`] if nothing precedes it.
    pub fn parse(text: &str) -> Result<Self, DecodeError> {
        let trimmed = text.trim();
        let (roll_number, name) =
            trimmed
                .split_once(PAYLOAD_DELIMITER)
                .ok_or_else(|| DecodeError::MissingDelimiter {
                    payload: text.to_string(),
                })?;

        let roll_number = roll_number.trim();
        if roll_number.is_empty() {
            return Err(DecodeError::EmptyRollNumber {
                payload: text.to_string(),
            });
        }

        Ok(Self::new(roll_number, name.trim()))
    }

    /// The text to embed in a QR code.
    #[must_use]
    pub fn encode(&self) -> String {
        self.to_string()
    }
}

impl From<&Student> for Payload {
    fn from(student: &Student) -> Self {
        Self::new(student.roll_number.clone(), student.name.clone())
    }
}

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.roll_number, PAYLOAD_DELIMITER, self.name)
    }
}

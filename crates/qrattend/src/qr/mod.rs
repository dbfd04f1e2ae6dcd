//! QR code handling for qrattend.
//!
//! - **Payload**: the `roll_number|name` text carried by every code.
//! - **Generation**: one PNG per student, named from the roll number.
//! - **Decoding**: the [`ImageDecoder`] seam between scanning and the image
//!   libraries, with [`QrImageDecoder`] as the production implementation.
//!
//! # Example
//!
//! ```
//! use qrattend::qr::Payload;
//!
//! let payload = Payload::parse("101|Alice").unwrap();
//! assert_eq!(payload.roll_number, "101");
//! assert_eq!(payload.encode(), "101|Alice");
//! ```

mod decode;
mod generate;
mod payload;

pub use decode::{ImageDecoder, QrImageDecoder};
pub use generate::QrGenerator;
pub use payload::{Payload, PAYLOAD_DELIMITER};
pub(crate) use payload::has_reserved_char;

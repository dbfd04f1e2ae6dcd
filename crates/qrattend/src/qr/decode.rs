//! QR image decoding.

use std::path::Path;

use tracing::{trace, warn};

use crate::error::DecodeError;

/// Turns one image file into the text of every QR code found in it.
///
/// An empty vector means the image contained no recognisable code.
pub trait ImageDecoder {
    /// Decode all QR codes in the image at `path`.
    ///
    /// # Errors
    ///
    /// Returns a [`DecodeError`] if the image cannot be read, or if codes were
    /// located but none of them could be decoded.
    fn decode(&self, path: &Path) -> Result<Vec<String>, DecodeError>;
}

/// Decoder backed by `image` for file formats and `rqrr` for QR detection.
#[derive(Debug, Default, Clone, Copy)]
pub struct QrImageDecoder;

impl QrImageDecoder {
    /// Create a decoder.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl ImageDecoder for QrImageDecoder {
    fn decode(&self, path: &Path) -> Result<Vec<String>, DecodeError> {
        let img = image::open(path)
            .map_err(|source| DecodeError::Image {
                path: path.to_path_buf(),
                source,
            })?
            .to_luma8();

        let (width, height) = img.dimensions();
        #[allow(clippy::cast_possible_truncation)]
        let mut prepared =
            rqrr::PreparedImage::prepare_from_greyscale(width as usize, height as usize, |x, y| {
                img.get_pixel(x as u32, y as u32).0[0]
            });

        let grids = prepared.detect_grids();
        trace!("Found {} QR grids in {}", grids.len(), path.display());

        let mut payloads = Vec::with_capacity(grids.len());
        let mut last_error = None;
        for grid in &grids {
            match grid.decode() {
                Ok((_meta, content)) => payloads.push(content),
                Err(e) => {
                    warn!("Skipping unreadable QR code in {}: {}", path.display(), e);
                    last_error = Some(e.to_string());
                }
            }
        }

        match last_error {
            Some(message) if payloads.is_empty() => Err(DecodeError::Unreadable {
                path: path.to_path_buf(),
                message,
            }),
            _ => Ok(payloads),
        }
    }
}

// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Source decoding with EXIF orientation applied.
//
// Phone cameras store pixels in sensor order and record the display rotation
// in EXIF. Corners are always expressed against the upright image, so the
// rotation has to be baked in before detection sees the raster.

use std::io::{BufRead, Cursor, Seek};

use docflat_bridge::traits::SourceDecoder;
use docflat_core::error::PageError;
use docflat_core::types::SourceRef;
use image::{DynamicImage, ImageDecoder as _, ImageReader, ImageResult};
use tracing::{debug, instrument};

/// Decodes JPEG, PNG, and the other formats the `image` crate knows, from a
/// path or from memory.
#[derive(Debug, Default, Clone, Copy)]
pub struct ImageDecoder;

impl ImageDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl SourceDecoder for ImageDecoder {
    #[instrument(skip(self), fields(source = %source))]
    fn decode(&self, source: &SourceRef) -> Result<DynamicImage, PageError> {
        let decoded = match source {
            SourceRef::Path(path) => ImageReader::open(path)
                .map_err(image::ImageError::from)
                .and_then(decode_upright),
            SourceRef::Memory { bytes, .. } => {
                decode_upright(ImageReader::new(Cursor::new(&bytes[..])))
            }
        };

        let image = decoded.map_err(|err| PageError::SourceImageUnreadable(err.to_string()))?;
        debug!(
            width = image.width(),
            height = image.height(),
            "Source decoded"
        );
        Ok(image)
    }
}

/// Sniff the format, decode, and rotate/flip per the EXIF orientation tag.
fn decode_upright<R: BufRead + Seek>(reader: ImageReader<R>) -> ImageResult<DynamicImage> {
    let mut decoder = reader.with_guessed_format()?.into_decoder()?;
    let orientation = decoder.orientation()?;
    let mut image = DynamicImage::from_decoder(decoder)?;
    image.apply_orientation(orientation);
    Ok(image)
}

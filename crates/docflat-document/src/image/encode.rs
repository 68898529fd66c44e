// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Output encoding — JPEG bytes, kept in memory or published to a file.

use std::io::Write;
use std::path::Path;

use docflat_bridge::traits::OutputEncoder;
use docflat_core::error::PageError;
use docflat_core::types::{Destination, OutputHandle};
use image::DynamicImage;
use image::codecs::jpeg::JpegEncoder as JpegCodec;
use tracing::{debug, instrument};

/// Encodes rectified pages as baseline JPEG.
///
/// File destinations are written to a temporary file in the target directory
/// and renamed into place, so a reader never observes a partial image.
#[derive(Debug, Default, Clone, Copy)]
pub struct JpegEncoder;

impl JpegEncoder {
    pub fn new() -> Self {
        Self
    }
}

impl OutputEncoder for JpegEncoder {
    #[instrument(skip(self, image), fields(width = image.width(), height = image.height()))]
    fn encode(
        &self,
        image: &DynamicImage,
        quality: u8,
        destination: &Destination,
    ) -> Result<OutputHandle, PageError> {
        let bytes = to_jpeg_bytes(image, quality)?;
        match destination {
            Destination::Memory => {
                debug!(bytes = bytes.len(), "Page encoded to memory");
                Ok(OutputHandle::Bytes(bytes))
            }
            Destination::File(path) => {
                persist_atomically(path, &bytes)?;
                debug!(bytes = bytes.len(), path = %path.display(), "Page written");
                Ok(OutputHandle::File(path.clone()))
            }
        }
    }
}

/// Encode `image` as JPEG at `quality` (0-100).
pub fn to_jpeg_bytes(image: &DynamicImage, quality: u8) -> Result<Vec<u8>, PageError> {
    if quality > 100 {
        return Err(PageError::EncodeFailure(format!(
            "quality must be between 0 and 100, got {quality}"
        )));
    }
    // JPEG has no alpha channel; the codec's lowest usable quality is 1.
    let rgb = image.to_rgb8();
    let mut buffer = Vec::new();
    let encoder = JpegCodec::new_with_quality(&mut buffer, quality.max(1));
    rgb.write_with_encoder(encoder)
        .map_err(|err| PageError::EncodeFailure(format!("JPEG encoding failed: {err}")))?;
    Ok(buffer)
}

fn persist_atomically(path: &Path, bytes: &[u8]) -> Result<(), PageError> {
    let io_failure = |err: std::io::Error| {
        PageError::EncodeFailure(format!("failed to write {}: {err}", path.display()))
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).map_err(io_failure)?;

    let mut staged = tempfile::NamedTempFile::new_in(dir).map_err(io_failure)?;
    staged.write_all(bytes).map_err(io_failure)?;
    staged.as_file().sync_all().map_err(io_failure)?;
    staged.persist(path).map_err(|err| io_failure(err.error))?;
    Ok(())
}

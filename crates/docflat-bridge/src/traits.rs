// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform-agnostic trait definitions for the capabilities the pipeline
// consumes.
//
// All traits are `Send + Sync`: one instance is shared by every page task of
// a batch and called from blocking worker threads.

use docflat_core::error::PageError;
use docflat_core::geometry::Quad;
use docflat_core::types::{Destination, OutputHandle, SourceRef};
use image::DynamicImage;

/// Turn an opaque source handle into upright pixels.
pub trait SourceDecoder: Send + Sync {
    /// Decode `source`, applying any EXIF orientation so the returned raster
    /// is right-side-up.
    fn decode(&self, source: &SourceRef) -> Result<DynamicImage, PageError>;
}

/// Locate a document's four corners in a raster.
pub trait CornerDetector: Send + Sync {
    /// Return the document boundary in the image's own pixel coordinates, or
    /// `None` when no confident quadrilateral is found.
    fn detect(&self, image: &DynamicImage) -> Option<Quad>;

    /// Short name for logs.
    fn name(&self) -> &str {
        "detector"
    }
}

/// Persist or serialise a rectified page.
pub trait OutputEncoder: Send + Sync {
    /// Encode `image` at `quality` (0-100) to `destination`.
    ///
    /// File outputs must appear at their final path only once fully written.
    fn encode(
        &self,
        image: &DynamicImage,
        quality: u8,
        destination: &Destination,
    ) -> Result<OutputHandle, PageError>;
}

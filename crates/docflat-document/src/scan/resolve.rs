// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Detection-or-fallback corner resolution.

use docflat_bridge::traits::CornerDetector;
use docflat_core::error::PageError;
use docflat_core::geometry::Quad;
use docflat_core::types::CornerOrigin;
use image::DynamicImage;
use tracing::{debug, instrument, warn};

use super::fallback::fallback_quad;

/// Ask `detector` for the document corners, falling back to an inset of the
/// image bounds when it finds nothing usable.
///
/// A detected quad that encloses no area is discarded. The only failure is
/// [`PageError::ImageTooSmall`] from the fallback policy.
#[instrument(skip(image, detector), fields(
    width = image.width(),
    height = image.height(),
    detector = detector.name(),
))]
pub fn resolve_corners(
    image: &DynamicImage,
    detector: &dyn CornerDetector,
    margin: f64,
) -> Result<(Quad, CornerOrigin), PageError> {
    match detector.detect(image) {
        Some(quad) if !quad.is_degenerate() => {
            debug!(?quad, "Using detected corners");
            return Ok((quad, CornerOrigin::Detected));
        }
        Some(quad) => warn!(?quad, "Detector returned a degenerate quad; ignoring it"),
        None => debug!("No corners detected"),
    }

    let quad = fallback_quad(image.width(), image.height(), margin)?;
    debug!(?quad, margin, "Using fallback corners");
    Ok((quad, CornerOrigin::Fallback))
}

#[cfg(test)]
mod tests {
    use super::*;
    use docflat_bridge::stub::{FixedDetector, NullDetector};
    use docflat_core::geometry::Point;
    use image::{GrayImage, Luma};

    fn photo(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageLuma8(GrayImage::from_pixel(width, height, Luma([128u8])))
    }

    #[test]
    fn detected_quad_wins() {
        let quad = Quad::rect(12.0, 15.0, 380.0, 290.0);
        let (resolved, origin) =
            resolve_corners(&photo(400, 300), &FixedDetector(quad), 100.0).expect("resolve");
        assert_eq!(resolved, quad);
        assert_eq!(origin, CornerOrigin::Detected);
    }

    /// A detected quad is accepted even when the fallback margin would not fit.
    #[test]
    fn detected_quad_accepted_on_small_image() {
        let quad = Quad::rect(2.0, 2.0, 48.0, 38.0);
        let (_, origin) =
            resolve_corners(&photo(50, 40), &FixedDetector(quad), 100.0).expect("resolve");
        assert_eq!(origin, CornerOrigin::Detected);
    }

    #[test]
    fn no_detection_uses_fallback() {
        let (quad, origin) =
            resolve_corners(&photo(800, 600), &NullDetector, 100.0).expect("resolve");
        assert_eq!(origin, CornerOrigin::Fallback);
        assert_eq!(quad, Quad::rect(100.0, 100.0, 700.0, 500.0));
    }

    #[test]
    fn degenerate_detection_uses_fallback() {
        let flat = Quad::new(
            Point::new(0.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(20.0, 20.0),
            Point::new(30.0, 30.0),
        );
        let (_, origin) =
            resolve_corners(&photo(800, 600), &FixedDetector(flat), 100.0).expect("resolve");
        assert_eq!(origin, CornerOrigin::Fallback);
    }

    #[test]
    fn small_image_without_detection_fails() {
        assert!(matches!(
            resolve_corners(&photo(150, 150), &NullDetector, 100.0),
            Err(PageError::ImageTooSmall { .. })
        ));
    }
}

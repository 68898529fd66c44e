// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Perspective rectification — warp a skewed document quad onto a flat
// rectangle of fixed width.

use docflat_core::config::{DEFAULT_TARGET_WIDTH, ScanConfig};
use docflat_core::error::PageError;
use docflat_core::geometry::Quad;
use image::{DynamicImage, Rgba, RgbaImage};
use imageproc::geometric_transformations::{Interpolation, Projection, warp_into};
use tracing::{debug, info, instrument, warn};

/// Tallest page accepted, as a multiple of the target width.
pub const MAX_ASPECT_RATIO: f64 = 20.0;
/// Largest rectified raster accepted, in pixels.
pub const MAX_OUTPUT_PIXELS: f64 = 100_000_000.0;

/// Flattens the region inside a [`Quad`] into an upright rectangle.
///
/// The output is always `target_width` pixels wide. Its height follows the
/// quad's aspect ratio, measured on the shorter of each pair of opposite
/// edges so that foreshortened sides are not stretched.
#[derive(Debug, Clone, Copy)]
pub struct Rectifier {
    target_width: u32,
}

impl Default for Rectifier {
    fn default() -> Self {
        Self::new(DEFAULT_TARGET_WIDTH)
    }
}

impl Rectifier {
    // -- Construction ---------------------------------------------------------

    pub fn new(target_width: u32) -> Self {
        Self {
            target_width: target_width.max(1),
        }
    }

    pub fn from_config(config: &ScanConfig) -> Self {
        Self::new(config.target_width)
    }

    pub fn target_width(&self) -> u32 {
        self.target_width
    }

    // -- Sizing ---------------------------------------------------------------

    /// Output dimensions for `quad`.
    ///
    /// Fails with [`PageError::DegenerateQuad`] for a quad without area and
    /// with [`PageError::OutputTooLarge`] when the page would be taller than
    /// [`MAX_ASPECT_RATIO`] widths or hold more than [`MAX_OUTPUT_PIXELS`].
    pub fn output_size(&self, quad: &Quad) -> Result<(u32, u32), PageError> {
        if quad.is_degenerate() {
            return Err(PageError::DegenerateQuad);
        }
        let raw_width = quad.top_edge().min(quad.bottom_edge());
        let raw_height = quad.left_edge().min(quad.right_edge());
        if raw_width <= 0.0 || raw_height <= 0.0 {
            return Err(PageError::DegenerateQuad);
        }

        let width = f64::from(self.target_width);
        let height = (width * raw_height / raw_width).round().max(1.0);
        if !height.is_finite()
            || height > width * MAX_ASPECT_RATIO
            || width * height > MAX_OUTPUT_PIXELS
        {
            warn!(?quad, height, "Rectified page would be too large");
            return Err(self.too_large(height));
        }
        let height = u32::try_from(height as u64).map_err(|_| self.too_large(height))?;
        Ok((self.target_width, height))
    }

    fn too_large(&self, height: f64) -> PageError {
        // Float-to-int `as` saturates, so infinity reports as u64::MAX.
        PageError::OutputTooLarge {
            width: self.target_width,
            height: height as u64,
        }
    }

    // -- Warp -----------------------------------------------------------------

    /// Rectify the region of `image` bounded by `quad`.
    ///
    /// `image` is left untouched; the result is a new RGBA raster. Pixels
    /// that sample outside the source are filled white.
    #[instrument(skip(self, image), fields(
        width = image.width(),
        height = image.height(),
        target_width = self.target_width,
    ))]
    pub fn rectify(&self, image: &DynamicImage, quad: &Quad) -> Result<DynamicImage, PageError> {
        let (out_w, out_h) = self.output_size(quad)?;

        let src = quad.corners().map(|p| p.to_f32_pair());
        let dest: [(f32, f32); 4] = [
            (0.0, 0.0),
            (out_w as f32, 0.0),
            (out_w as f32, out_h as f32),
            (0.0, out_h as f32),
        ];

        let projection = Projection::from_control_points(src, dest).ok_or_else(|| {
            warn!(?quad, "Failed to compute projective transform");
            PageError::TransformSingular
        })?;
        debug!(out_w, out_h, "Projective transform computed");

        let rgba_input = image.to_rgba8();
        let default_pixel = Rgba([255u8, 255, 255, 255]);
        let mut output = RgbaImage::new(out_w, out_h);
        warp_into(
            &rgba_input,
            &projection,
            Interpolation::Bilinear,
            default_pixel,
            &mut output,
        );

        info!(out_w, out_h, "Page rectified");
        Ok(DynamicImage::ImageRgba8(output))
    }
}

/// Rectify `quad` out of `image` at `target_width`.
pub fn rectify(
    image: &DynamicImage,
    quad: &Quad,
    target_width: u32,
) -> Result<DynamicImage, PageError> {
    Rectifier::new(target_width).rectify(image, quad)
}

#[cfg(test)]
mod tests {
    use super::*;
    use docflat_core::geometry::Point;

    fn white(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            width,
            height,
            Rgba([255, 255, 255, 255]),
        ))
    }

    /// A 300x450 document becomes 500x750.
    #[test]
    fn output_keeps_aspect_at_fixed_width() {
        let quad = Quad::rect(10.0, 20.0, 310.0, 470.0);
        let out = Rectifier::default()
            .rectify(&white(400, 600), &quad)
            .expect("rectify");
        assert_eq!((out.width(), out.height()), (500, 750));
    }

    /// Opposite edges of different length: the shorter of each pair is used.
    #[test]
    fn shorter_edges_drive_the_size() {
        let quad = Quad::new(
            Point::new(50.0, 40.0),
            Point::new(350.0, 40.0),
            Point::new(400.0, 640.0),
            Point::new(0.0, 640.0),
        );
        let rectifier = Rectifier::new(500);
        // top = 300, bottom = 400, left = right = sqrt(50^2 + 600^2)
        let side = (50.0f64 * 50.0 + 600.0 * 600.0).sqrt();
        let expected_h = (500.0 * side / 300.0).round() as u32;
        assert_eq!(rectifier.output_size(&quad), Ok((500, expected_h)));
    }

    #[test]
    fn width_is_always_the_target() {
        let quads = [
            Quad::rect(0.0, 0.0, 1000.0, 10.0),
            Quad::rect(0.0, 0.0, 100.0, 1000.0),
            Quad::new(
                Point::new(112.5, 87.25),
                Point::new(903.0, 140.0),
                Point::new(860.75, 1210.5),
                Point::new(95.0, 1180.0),
            ),
        ];
        for quad in quads {
            let (w, h) = Rectifier::new(320).output_size(&quad).expect("size");
            assert_eq!(w, 320);
            assert!(h >= 1);
        }
    }

    /// A sliver quad has area, but its page would be hundreds of millions
    /// of pixels tall.
    #[test]
    fn sliver_quad_is_rejected_before_allocating() {
        let quad = Quad::rect(0.0, 0.0, 0.01, 10000.0);
        assert!(!quad.is_degenerate());
        assert_eq!(
            Rectifier::new(500).output_size(&quad),
            Err(PageError::OutputTooLarge {
                width: 500,
                height: 500_000_000,
            })
        );
        assert!(matches!(
            rectify(&white(10, 10), &Quad::rect(0.0, 0.0, 1.0, 100000.0), 500),
            Err(PageError::OutputTooLarge { .. })
        ));
    }

    /// Heights past `u32::MAX` are reported, not truncated.
    #[test]
    fn huge_height_does_not_wrap() {
        let quad = Quad::rect(0.0, 0.0, 0.001, 1_000_000.0);
        match Rectifier::new(500).output_size(&quad) {
            Err(PageError::OutputTooLarge { width, height }) => {
                assert_eq!(width, 500);
                assert!(height > u64::from(u32::MAX));
            }
            other => panic!("expected OutputTooLarge, got {other:?}"),
        }
    }

    #[test]
    fn aspect_limit_is_inclusive() {
        let rectifier = Rectifier::new(100);
        let tallest = Quad::rect(0.0, 0.0, 10.0, 200.0);
        assert_eq!(rectifier.output_size(&tallest), Ok((100, 2000)));
        let too_tall = Quad::rect(0.0, 0.0, 10.0, 201.0);
        assert!(matches!(
            rectifier.output_size(&too_tall),
            Err(PageError::OutputTooLarge { width: 100, height: 2010 })
        ));
    }

    #[test]
    fn wide_target_hits_pixel_cap() {
        // 20_000 x 10_000 stays within the aspect limit but exceeds the cap.
        let quad = Quad::rect(0.0, 0.0, 100.0, 50.0);
        assert!(matches!(
            Rectifier::new(20_000).output_size(&quad),
            Err(PageError::OutputTooLarge { width: 20_000, height: 10_000 })
        ));
    }

    #[test]
    fn collinear_corners_fail_without_output() {
        let quad = Quad::new(
            Point::new(0.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(20.0, 20.0),
            Point::new(30.0, 30.0),
        );
        assert_eq!(
            rectify(&white(100, 100), &quad, 500),
            Err(PageError::DegenerateQuad)
        );
    }

    /// The region inside the quad ends up filling the output.
    #[test]
    fn content_inside_quad_is_sampled() {
        let mut img = RgbaImage::from_pixel(200, 200, Rgba([255, 255, 255, 255]));
        for y in 50..150 {
            for x in 50..150 {
                img.put_pixel(x, y, Rgba([200, 0, 0, 255]));
            }
        }
        let quad = Quad::rect(50.0, 50.0, 150.0, 150.0);
        let out = rectify(&DynamicImage::ImageRgba8(img), &quad, 100).expect("rectify");
        let rgba = out.to_rgba8();

        assert_eq!((rgba.width(), rgba.height()), (100, 100));
        for &(x, y) in &[(50, 50), (10, 10), (90, 90), (10, 90)] {
            let px = rgba.get_pixel(x, y).0;
            assert!(px[0] > 150 && px[1] < 60, "pixel ({x},{y}) = {px:?}");
        }
    }

    #[test]
    fn quad_outside_source_fills_white() {
        let quad = Quad::rect(500.0, 500.0, 600.0, 600.0);
        let out = rectify(&white(100, 100), &quad, 50).expect("rectify");
        assert_eq!(out.to_rgba8().get_pixel(25, 25).0, [255, 255, 255, 255]);
    }
}

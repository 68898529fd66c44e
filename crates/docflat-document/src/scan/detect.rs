// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Classical corner detector — Canny edges, Hough lines, and line
// intersections.
//
// One pluggable implementation of `CornerDetector`. It suits photos of a
// light page on a darker, uncluttered background; anything else reports no
// corners and the pipeline falls back to the inset policy.

use docflat_bridge::traits::CornerDetector;
use docflat_core::geometry::{Point, Quad};
use image::DynamicImage;
use imageproc::edges::canny;
use imageproc::filter::gaussian_blur_f32;
use imageproc::hough::{LineDetectionOptions, PolarLine, detect_lines};
use tracing::{debug, instrument};

/// Finds the document boundary from its four dominant straight edges.
///
/// ## Pipeline
///
/// 1. Convert to grayscale and apply a Gaussian blur
/// 2. Canny edge detection
/// 3. Hough line detection, with a vote threshold scaled to the image diagonal
/// 4. Split lines into roughly horizontal and roughly vertical
/// 5. Take the outermost line on each side
/// 6. Intersect neighbouring sides to get the four corners
/// 7. Reject quads smaller than `min_area_fraction` of the image
#[derive(Debug, Clone, Copy)]
pub struct EdgeCornerDetector {
    /// Gaussian blur sigma applied before edge detection.
    pub blur_sigma: f32,
    /// Canny hysteresis thresholds.
    pub canny_low: f32,
    pub canny_high: f32,
    /// Smallest accepted quad, as a fraction of the image area.
    pub min_area_fraction: f64,
}

impl Default for EdgeCornerDetector {
    fn default() -> Self {
        Self {
            blur_sigma: 2.0,
            canny_low: 50.0,
            canny_high: 150.0,
            min_area_fraction: 0.10,
        }
    }
}

impl EdgeCornerDetector {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CornerDetector for EdgeCornerDetector {
    #[instrument(skip(self, image), fields(width = image.width(), height = image.height()))]
    fn detect(&self, image: &DynamicImage) -> Option<Quad> {
        let (width, height) = (image.width(), image.height());
        if width < 3 || height < 3 {
            return None;
        }

        let gray = image.to_luma8();
        let blurred = gaussian_blur_f32(&gray, self.blur_sigma);
        let edges = canny(&blurred, self.canny_low, self.canny_high);

        // Scale the vote threshold with resolution; the suppression radius
        // merges near-duplicate lines.
        let diagonal = f64::from(width).hypot(f64::from(height));
        let vote_threshold = (diagonal * 0.25).max(80.0) as u32;
        let options = LineDetectionOptions {
            vote_threshold,
            suppression_radius: 8,
        };
        let lines = detect_lines(&edges, options);
        debug!(line_count = lines.len(), vote_threshold, "Hough lines detected");

        let (horizontal, vertical) = classify_lines(&lines);
        if horizontal.len() < 2 || vertical.len() < 2 {
            debug!(
                horizontal = horizontal.len(),
                vertical = vertical.len(),
                "Not enough edges for a document boundary"
            );
            return None;
        }

        let centre = Point::new(f64::from(width) / 2.0, f64::from(height) / 2.0);
        let top = outermost(&horizontal, centre, Side::Near)?;
        let bottom = outermost(&horizontal, centre, Side::Far)?;
        let left = outermost(&vertical, centre, Side::Near)?;
        let right = outermost(&vertical, centre, Side::Far)?;

        let quad = Quad::new(
            intersect_polar_lines(&top, &left)?,
            intersect_polar_lines(&top, &right)?,
            intersect_polar_lines(&bottom, &right)?,
            intersect_polar_lines(&bottom, &left)?,
        );

        let min_area = f64::from(width) * f64::from(height) * self.min_area_fraction;
        if quad.is_degenerate() || quad.area() < min_area {
            debug!(area = quad.area(), min_area, "Detected quadrilateral too small");
            return None;
        }

        debug!(?quad, "Document corners detected");
        Some(quad)
    }

    fn name(&self) -> &str {
        "edge"
    }
}

// -- Line helpers -------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
enum Side {
    /// Top for horizontal lines, left for vertical lines.
    Near,
    /// Bottom for horizontal lines, right for vertical lines.
    Far,
}

/// Split Hough lines by orientation.
///
/// A `PolarLine` is `x*cos(θ) + y*sin(θ) = r`, so θ near 90° is a horizontal
/// line and θ near 0° or 180° a vertical one. Lines within 30° of either
/// axis are kept; diagonals are dropped.
fn classify_lines(lines: &[PolarLine]) -> (Vec<PolarLine>, Vec<PolarLine>) {
    let mut horizontal = Vec::new();
    let mut vertical = Vec::new();

    for line in lines {
        let angle = line.angle_in_degrees;
        if (60..=120).contains(&angle) {
            horizontal.push(*line);
        } else if angle <= 30 || angle >= 150 {
            vertical.push(*line);
        }
    }

    (horizontal, vertical)
}

/// Where `line` crosses the image's central axis: its y at `centre.x` for a
/// horizontal line, its x at `centre.y` for a vertical one.
fn axis_crossing(line: &PolarLine, centre: Point) -> f64 {
    let theta = f64::from(line.angle_in_degrees).to_radians();
    let r = f64::from(line.r);
    let (sin, cos) = theta.sin_cos();
    if sin.abs() >= cos.abs() {
        (r - centre.x * cos) / sin
    } else {
        (r - centre.y * sin) / cos
    }
}

fn outermost(lines: &[PolarLine], centre: Point, side: Side) -> Option<PolarLine> {
    let by_position = |a: &&PolarLine, b: &&PolarLine| {
        axis_crossing(a, centre).total_cmp(&axis_crossing(b, centre))
    };
    match side {
        Side::Near => lines.iter().min_by(by_position).copied(),
        Side::Far => lines.iter().max_by(by_position).copied(),
    }
}

/// Intersection of two lines in polar (Hough) form, or `None` when they are
/// nearly parallel.
fn intersect_polar_lines(a: &PolarLine, b: &PolarLine) -> Option<Point> {
    let (sin_a, cos_a) = f64::from(a.angle_in_degrees).to_radians().sin_cos();
    let (sin_b, cos_b) = f64::from(b.angle_in_degrees).to_radians().sin_cos();

    let denom = cos_a * sin_b - sin_a * cos_b;
    if denom.abs() < 1e-6 {
        return None;
    }

    let (r_a, r_b) = (f64::from(a.r), f64::from(b.r));
    Some(Point::new(
        (r_a * sin_b - r_b * sin_a) / denom,
        (r_b * cos_a - r_a * cos_b) / denom,
    ))
}

// -- Tests --------------------------------------------------------------------

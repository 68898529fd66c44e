// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Document geometry — points, quadrilaterals, and the mapping between the
// original photo's pixel space and a letterboxed on-screen preview.

use serde::{Deserialize, Serialize};

/// Area (in square pixels) below which a quadrilateral is treated as flat.
pub const DEGENERATE_AREA_EPSILON: f64 = 1e-6;

/// Distance below which two corners are considered the same point.
pub const COINCIDENT_EPSILON: f64 = 1e-9;

/// A 2D coordinate in either original-image or preview space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    pub fn distance(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Shift the point by `(dx, dy)`.
    pub fn translate(&self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Multiply both coordinates by `factor`.
    pub fn scale(&self, factor: f64) -> Self {
        Self::new(self.x * factor, self.y * factor)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Single-precision pair, as expected by `imageproc`.
    pub fn to_f32_pair(&self) -> (f32, f32) {
        (self.x as f32, self.y as f32)
    }
}

/// The four corners of a document, in clockwise order starting top-left.
///
/// A `Quad` is a plain value. Mapping it into another coordinate space
/// returns a new `Quad`; nothing is mutated in place.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quad {
    pub top_left: Point,
    pub top_right: Point,
    pub bottom_right: Point,
    pub bottom_left: Point,
}

impl Quad {
    pub const fn new(
        top_left: Point,
        top_right: Point,
        bottom_right: Point,
        bottom_left: Point,
    ) -> Self {
        Self {
            top_left,
            top_right,
            bottom_right,
            bottom_left,
        }
    }

    /// An axis-aligned rectangle spanning `(left, top)` to `(right, bottom)`.
    pub fn rect(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self::new(
            Point::new(left, top),
            Point::new(right, top),
            Point::new(right, bottom),
            Point::new(left, bottom),
        )
    }

    /// Corners in winding order: top-left, top-right, bottom-right, bottom-left.
    pub fn corners(&self) -> [Point; 4] {
        [
            self.top_left,
            self.top_right,
            self.bottom_right,
            self.bottom_left,
        ]
    }

    /// Apply `f` to every corner, preserving the winding order.
    pub fn map_points(&self, f: impl Fn(Point) -> Point) -> Self {
        Self::new(
            f(self.top_left),
            f(self.top_right),
            f(self.bottom_right),
            f(self.bottom_left),
        )
    }

    pub fn translate(&self, dx: f64, dy: f64) -> Self {
        self.map_points(|p| p.translate(dx, dy))
    }

    pub fn scale(&self, factor: f64) -> Self {
        self.map_points(|p| p.scale(factor))
    }

    /// Length of the top edge (top-left to top-right).
    pub fn top_edge(&self) -> f64 {
        self.top_left.distance(&self.top_right)
    }

    /// Length of the bottom edge (bottom-left to bottom-right).
    pub fn bottom_edge(&self) -> f64 {
        self.bottom_left.distance(&self.bottom_right)
    }

    /// Length of the left edge (top-left to bottom-left).
    pub fn left_edge(&self) -> f64 {
        self.top_left.distance(&self.bottom_left)
    }

    /// Length of the right edge (top-right to bottom-right).
    pub fn right_edge(&self) -> f64 {
        self.top_right.distance(&self.bottom_right)
    }

    /// Enclosed area via the shoelace formula. Always non-negative.
    pub fn area(&self) -> f64 {
        let corners = self.corners();
        let mut twice_area = 0.0;
        for i in 0..corners.len() {
            let j = (i + 1) % corners.len();
            twice_area += corners[i].x * corners[j].y;
            twice_area -= corners[j].x * corners[i].y;
        }
        twice_area.abs() / 2.0
    }

    /// True when the quad encloses no usable area, has coincident adjacent
    /// corners, or contains a non-finite coordinate.
    pub fn is_degenerate(&self) -> bool {
        let corners = self.corners();
        if corners.iter().any(|p| !p.is_finite()) {
            return true;
        }
        let coincident = (0..4).any(|i| {
            corners[i].distance(&corners[(i + 1) % 4]) <= COINCIDENT_EPSILON
        });
        coincident || self.area() <= DEGENERATE_AREA_EPSILON
    }

    /// Map a quad from original-image space into preview space.
    ///
    /// Each corner is scaled by `scale_factor` and then shifted by the
    /// letterbox offset `(bounds.left, bounds.top)`.
    pub fn map_original_to_preview(&self, bounds: &PreviewBounds, scale_factor: f64) -> Self {
        self.map_points(|p| p.scale(scale_factor).translate(bounds.left, bounds.top))
    }

    /// Map a quad from preview space back into original-image space.
    ///
    /// Inverse of [`Quad::map_original_to_preview`] when called with
    /// `1.0 / scale_factor`.
    pub fn map_preview_to_original(
        &self,
        bounds: &PreviewBounds,
        inverse_scale_factor: f64,
    ) -> Self {
        self.map_points(|p| {
            p.translate(-bounds.left, -bounds.top)
                .scale(inverse_scale_factor)
        })
    }
}

/// Where a scaled image sits inside a fixed-size preview container.
///
/// `left`/`top` are the letterbox margins; `width`/`height` the rendered
/// image size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PreviewBounds {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
    /// Height of the source image the bounds were fitted for.
    pub original_height: f64,
}

impl PreviewBounds {
    /// Fit an `image_width` x `image_height` image into a
    /// `container_width` x `container_height` preview, preserving aspect
    /// ratio and centering it on whichever axis has slack.
    pub fn fit(
        container_width: f64,
        container_height: f64,
        image_width: f64,
        image_height: f64,
    ) -> Self {
        let scale = (container_width / image_width).min(container_height / image_height);
        let width = image_width * scale;
        let height = image_height * scale;
        Self {
            left: (container_width - width) / 2.0,
            top: (container_height - height) / 2.0,
            width,
            height,
            original_height: image_height,
        }
    }

    /// `rendered height / original height`, the factor for
    /// [`Quad::map_original_to_preview`].
    pub fn scale_factor(&self) -> f64 {
        self.height / self.original_height
    }

    /// Reciprocal of [`PreviewBounds::scale_factor`].
    pub fn inverse_scale_factor(&self) -> f64 {
        self.original_height / self.height
    }
}

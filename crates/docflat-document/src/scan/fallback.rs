// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Fallback corners for photos where no document boundary was found.

use docflat_core::error::PageError;
use docflat_core::geometry::Quad;

/// The image bounds inset by `margin` on every side.
///
/// Fails with [`PageError::ImageTooSmall`] unless the image is wider and
/// taller than twice the margin; otherwise the quad always has positive area.
pub fn fallback_quad(width: u32, height: u32, margin: f64) -> Result<Quad, PageError> {
    let (w, h) = (f64::from(width), f64::from(height));
    if !(w > 2.0 * margin && h > 2.0 * margin) {
        return Err(PageError::ImageTooSmall {
            width,
            height,
            margin,
        });
    }
    Ok(Quad::rect(margin, margin, w - margin, h - margin))
}

#[cfg(test)]
mod tests {
    use super::*;
    use docflat_core::geometry::Point;

    #[test]
    fn inset_by_margin() {
        let quad = fallback_quad(800, 600, 100.0).expect("fallback");
        assert_eq!(quad.top_left, Point::new(100.0, 100.0));
        assert_eq!(quad.top_right, Point::new(700.0, 100.0));
        assert_eq!(quad.bottom_right, Point::new(700.0, 500.0));
        assert_eq!(quad.bottom_left, Point::new(100.0, 500.0));
        assert!(quad.area() > 0.0);
    }

    #[test]
    fn exactly_twice_the_margin_is_too_small() {
        assert_eq!(
            fallback_quad(200, 600, 100.0),
            Err(PageError::ImageTooSmall {
                width: 200,
                height: 600,
                margin: 100.0
            })
        );
        assert!(fallback_quad(800, 200, 100.0).is_err());
    }

    #[test]
    fn positive_area_whenever_accepted() {
        for (w, h) in [(201, 201), (1000, 250), (4032, 3024), (300, 9000)] {
            let quad = fallback_quad(w, h, 100.0).expect("fallback");
            assert!(quad.area() > 0.0, "{w}x{h}");
            assert!(!quad.is_degenerate());
        }
    }

    #[test]
    fn zero_margin_covers_whole_image() {
        let quad = fallback_quad(10, 20, 0.0).expect("fallback");
        assert_eq!(quad, Quad::rect(0.0, 0.0, 10.0, 20.0));
    }
}

// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Stub detectors for builds without a native corner detector, and for tests.

use docflat_core::geometry::Quad;
use image::DynamicImage;

use crate::traits::CornerDetector;

/// Never finds corners, so every page takes the fallback quad.
pub struct NullDetector;

impl CornerDetector for NullDetector {
    fn detect(&self, image: &DynamicImage) -> Option<Quad> {
        tracing::debug!(
            width = image.width(),
            height = image.height(),
            "null detector: no corners"
        );
        None
    }

    fn name(&self) -> &str {
        "null"
    }
}

/// Reports the same quad for every image.
pub struct FixedDetector(pub Quad);

impl CornerDetector for FixedDetector {
    fn detect(&self, _image: &DynamicImage) -> Option<Quad> {
        Some(self.0)
    }

    fn name(&self) -> &str {
        "fixed"
    }
}

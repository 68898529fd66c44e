// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// docflat-document — Raster work for the docflat capture pipeline.
//
// Provides EXIF-aware decoding and JPEG output (image), corner resolution,
// the classical corner detector and perspective rectification (scan), page
// fingerprints (integrity), and multi-page PDF assembly (pdf).

pub mod image;
pub mod integrity;
pub mod pdf;
pub mod scan;

pub use crate::image::decode::ImageDecoder;
pub use crate::image::encode::JpegEncoder;
pub use crate::pdf::writer::PdfWriter;
pub use crate::scan::detect::EdgeCornerDetector;
pub use crate::scan::fallback::fallback_quad;
pub use crate::scan::rectify::{Rectifier, rectify};
pub use crate::scan::resolve::resolve_corners;

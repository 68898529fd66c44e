// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scanning — corner detection, fallback policy, and perspective rectification.

pub mod detect;
pub mod fallback;
pub mod rectify;
pub mod resolve;

pub use detect::EdgeCornerDetector;
pub use fallback::fallback_quad;
pub use rectify::{Rectifier, rectify};
pub use resolve::resolve_corners;

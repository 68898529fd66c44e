// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// docflat — Capability bridge.
//
// The pipeline never decodes, detects, or encodes on its own. It calls the
// traits defined here, so a host can plug in a platform image loader, a
// native or learned corner detector, or a test double.

pub mod stub;
pub mod traits;

pub use stub::{FixedDetector, NullDetector};
pub use traits::{CornerDetector, OutputEncoder, SourceDecoder};

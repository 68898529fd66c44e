// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// docflat — Core geometry, domain types, and error definitions shared across
// all crates.

pub mod config;
pub mod error;
pub mod geometry;
pub mod human_errors;
pub mod types;

pub use config::{ResponseType, ScanConfig};
pub use error::{PageError, ScanError};
pub use geometry::{Point, PreviewBounds, Quad};
pub use types::*;

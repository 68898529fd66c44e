// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// docflat-pipeline — Batch capture pipeline.
//
// Runs decode, corner resolution, rectification, and encoding for every
// photo of a batch on a bounded set of blocking workers, and reassembles the
// outcomes in input order regardless of completion order.

pub mod adjust;
pub mod batch;
pub mod cancel;
pub mod result;

pub use adjust::{AdjustmentRequest, BatchMode};
pub use batch::BatchPipeline;
pub use cancel::CancelHandle;
pub use result::{BatchResult, PageResult, RectifiedPage};

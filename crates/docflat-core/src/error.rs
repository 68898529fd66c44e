// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Error types for docflat.
//
// `PageError` is scoped to a single captured page and is stored in that
// page's batch slot. `ScanError` aborts the whole call.

use thiserror::Error;

/// A failure that affects exactly one page of a batch.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PageError {
    #[error("image too small ({width}x{height}) for a {margin}px fallback margin")]
    ImageTooSmall { width: u32, height: u32, margin: f64 },

    #[error("document corners enclose no area")]
    DegenerateQuad,

    #[error("source image unreadable: {0}")]
    SourceImageUnreadable(String),

    #[error("perspective transform could not be computed")]
    TransformSingular,

    #[error("failed to encode output: {0}")]
    EncodeFailure(String),

    #[error("rectified page would be {width}x{height} pixels, over the size limit")]
    OutputTooLarge { width: u32, height: u64 },

    #[error("page worker panicked: {0}")]
    WorkerPanicked(String),
}

/// Top-level error type for docflat operations.
#[derive(Debug, Error)]
pub enum ScanError {
    // -- Pipeline errors --
    #[error("no images were submitted")]
    PipelineEmptyInput,

    #[error("{count} images submitted, at most {max} allowed per batch")]
    TooManyDocuments { count: usize, max: usize },

    #[error("corner adjustment needs exactly one image, got {0}")]
    AdjustableBatchSize(usize),

    #[error("worker pool failure: {0}")]
    WorkerPool(String),

    // -- Configuration --
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    // -- Output --
    #[error("PDF operation failed: {0}")]
    Pdf(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, ScanError>;

// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Batch outcome types.

use docflat_core::error::PageError;
use docflat_core::geometry::Quad;
use docflat_core::human_errors::humanize_page_error;
use docflat_core::types::{BatchId, CornerOrigin, OutputHandle, SourceRef};

/// A successfully flattened and published page.
#[derive(Debug, Clone, PartialEq)]
pub struct RectifiedPage {
    pub width: u32,
    pub height: u32,
    /// Corners the page was rectified from, in original-image space.
    pub corners: Quad,
    pub corner_origin: CornerOrigin,
    /// SHA-256 of the rectified raster (hex).
    pub sha256: String,
    pub output: OutputHandle,
}

/// The outcome for one input photo.
#[derive(Debug, Clone)]
pub struct PageResult {
    /// Position of the photo in the submitted batch.
    pub index: usize,
    pub source: SourceRef,
    pub outcome: Result<RectifiedPage, PageError>,
}

impl PageResult {
    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Everything a batch produced, ordered by input index.
#[derive(Debug, Clone)]
pub struct BatchResult {
    pub batch_id: BatchId,
    /// One entry per completed page, sorted by `index`.
    pub pages: Vec<PageResult>,
    /// Indices of pages abandoned because the batch was cancelled.
    pub cancelled: Vec<usize>,
}

impl BatchResult {
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// True when no page was abandoned.
    pub fn is_complete(&self) -> bool {
        self.cancelled.is_empty()
    }

    pub fn succeeded(&self) -> impl Iterator<Item = &RectifiedPage> {
        self.pages.iter().filter_map(|page| page.outcome.as_ref().ok())
    }

    pub fn failed(&self) -> impl Iterator<Item = (usize, &PageError)> {
        self.pages
            .iter()
            .filter_map(|page| page.outcome.as_ref().err().map(|err| (page.index, err)))
    }

    /// `(index, "reason suggestion")` for every failed page, ready to show
    /// next to the page thumbnails.
    pub fn failure_labels(&self) -> Vec<(usize, String)> {
        self.failed()
            .map(|(index, err)| (index, humanize_page_error(err).label()))
            .collect()
    }
}

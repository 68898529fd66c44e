// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for docflat.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use base64::{Engine as _, engine::general_purpose::STANDARD};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::PageError;
use crate::geometry::Quad;

/// Unique identifier for one batch run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BatchId(pub Uuid);

impl BatchId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// First eight hex digits, used in output file names.
    pub fn short(&self) -> String {
        self.0.simple().to_string()[..8].to_owned()
    }
}

impl Default for BatchId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for BatchId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque handle to the bytes of a captured photo.
#[derive(Debug, Clone)]
pub enum SourceRef {
    /// A photo on the local filesystem.
    Path(PathBuf),
    /// Bytes handed over by a camera or picker bridge.
    Memory { label: String, bytes: Arc<[u8]> },
}

impl SourceRef {
    pub fn path(path: impl Into<PathBuf>) -> Self {
        Self::Path(path.into())
    }

    pub fn memory(label: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self::Memory {
            label: label.into(),
            bytes: bytes.into(),
        }
    }
}

impl std::fmt::Display for SourceRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Path(path) => write!(f, "{}", path.display()),
            Self::Memory { label, bytes } => write!(f, "{label} ({} bytes)", bytes.len()),
        }
    }
}

/// How a document's current corners were obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CornerOrigin {
    /// Found by the corner detector.
    Detected,
    /// Detector found nothing; image bounds inset by the fallback margin.
    Fallback,
    /// Overridden once by the user.
    Adjusted,
}

/// One captured page while a batch is in flight.
///
/// Source and original dimensions are fixed at creation. The corners may be
/// replaced once by [`Document::adjust`] before rectification reads them.
#[derive(Debug, Clone)]
pub struct Document {
    source: SourceRef,
    original_width: u32,
    original_height: u32,
    corners: Quad,
    origin: CornerOrigin,
}

impl Document {
    pub fn new(
        source: SourceRef,
        original_width: u32,
        original_height: u32,
        corners: Quad,
        origin: CornerOrigin,
    ) -> Self {
        Self {
            source,
            original_width,
            original_height,
            corners,
            origin,
        }
    }

    pub fn source(&self) -> &SourceRef {
        &self.source
    }

    pub fn original_width(&self) -> u32 {
        self.original_width
    }

    pub fn original_height(&self) -> u32 {
        self.original_height
    }

    /// Current corners, in original-image coordinates.
    pub fn corners(&self) -> Quad {
        self.corners
    }

    pub fn origin(&self) -> CornerOrigin {
        self.origin
    }

    /// Replace the corners with a user-edited quad (original-image space).
    ///
    /// Rejects degenerate quads and leaves the document untouched in that
    /// case. Only one adjustment is accepted per document.
    pub fn adjust(&mut self, corners: Quad) -> Result<(), PageError> {
        if self.origin == CornerOrigin::Adjusted {
            tracing::warn!(source = %self.source, "ignoring second corner adjustment");
            return Ok(());
        }
        if corners.is_degenerate() {
            return Err(PageError::DegenerateQuad);
        }
        self.corners = corners;
        self.origin = CornerOrigin::Adjusted;
        Ok(())
    }
}

/// Where an encoded page should go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// Write to this file path.
    File(PathBuf),
    /// Keep the encoded bytes in memory.
    Memory,
}

/// The published result of encoding one rectified page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputHandle {
    File(PathBuf),
    Bytes(Vec<u8>),
}

impl OutputHandle {
    pub fn as_path(&self) -> Option<&Path> {
        match self {
            Self::File(path) => Some(path),
            Self::Bytes(_) => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::File(_) => None,
            Self::Bytes(bytes) => Some(bytes),
        }
    }

    /// Base64 of in-memory bytes; `None` for file outputs.
    pub fn to_base64(&self) -> Option<String> {
        self.as_bytes().map(|bytes| STANDARD.encode(bytes))
    }

    /// Load the encoded bytes, reading from disk for file outputs.
    pub fn read_bytes(&self) -> std::io::Result<Vec<u8>> {
        match self {
            Self::File(path) => std::fs::read(path),
            Self::Bytes(bytes) => Ok(bytes.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document() -> Document {
        Document::new(
            SourceRef::path("page.jpg"),
            800,
            600,
            Quad::rect(100.0, 100.0, 700.0, 500.0),
            CornerOrigin::Fallback,
        )
    }

    #[test]
    fn adjust_replaces_corners_once() {
        let mut doc = document();
        let edited = Quad::rect(50.0, 60.0, 750.0, 560.0);
        doc.adjust(edited).expect("adjust");
        assert_eq!(doc.corners(), edited);
        assert_eq!(doc.origin(), CornerOrigin::Adjusted);

        doc.adjust(Quad::rect(0.0, 0.0, 10.0, 10.0)).expect("second adjust");
        assert_eq!(doc.corners(), edited);
    }

    #[test]
    fn adjust_rejects_degenerate_quad() {
        let mut doc = document();
        let flat = Quad::rect(0.0, 0.0, 100.0, 0.0);
        assert_eq!(doc.adjust(flat), Err(PageError::DegenerateQuad));
        assert_eq!(doc.origin(), CornerOrigin::Fallback);
    }

    #[test]
    fn memory_output_encodes_base64() {
        let handle = OutputHandle::Bytes(b"hello".to_vec());
        assert_eq!(handle.to_base64().as_deref(), Some("aGVsbG8="));
        assert!(OutputHandle::File("a.jpg".into()).to_base64().is_none());
    }

    #[test]
    fn batch_id_short_form() {
        let id = BatchId::new();
        assert_eq!(id.short().len(), 8);
    }
}

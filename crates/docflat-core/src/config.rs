// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scanner configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScanError};

/// Width every rectified page is scaled to.
pub const DEFAULT_TARGET_WIDTH: u32 = 500;
/// Inset used when no document corners are detected.
pub const DEFAULT_FALLBACK_MARGIN: f64 = 100.0;
/// Lossy-encoding quality for rectified pages.
pub const DEFAULT_QUALITY: u8 = 100;
/// Upper bound on images accepted in one batch.
pub const DEFAULT_MAX_DOCUMENTS: usize = 24;

/// Shape in which rectified pages are handed back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseType {
    /// Each page is written to a JPEG file and its path returned.
    ImageFilePath,
    /// Each page is kept in memory; callers read it as base64.
    Base64,
}

/// Settings for a scanning session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Output width of every rectified page, in pixels.
    pub target_width: u32,
    /// Fallback corner inset in pixels.
    pub fallback_margin: f64,
    /// JPEG quality, 0-100.
    pub quality: u8,
    /// Maximum number of images in one batch.
    pub max_documents: usize,
    /// Pages processed concurrently. `None` uses the available CPU parallelism.
    pub concurrency: Option<usize>,
    /// File paths or in-memory bytes.
    pub response_type: ResponseType,
    /// Directory for file outputs. `None` lets the caller choose.
    pub output_dir: Option<PathBuf>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            target_width: DEFAULT_TARGET_WIDTH,
            fallback_margin: DEFAULT_FALLBACK_MARGIN,
            quality: DEFAULT_QUALITY,
            max_documents: DEFAULT_MAX_DOCUMENTS,
            concurrency: None,
            response_type: ResponseType::ImageFilePath,
            output_dir: None,
        }
    }
}

impl ScanConfig {
    /// Read a JSON config file. Missing fields take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every field is within its allowed range.
    pub fn validate(&self) -> Result<()> {
        if self.quality > 100 {
            return Err(ScanError::InvalidConfig(format!(
                "quality must be between 0 and 100, got {}",
                self.quality
            )));
        }
        if self.target_width == 0 {
            return Err(ScanError::InvalidConfig(
                "target_width must be positive".into(),
            ));
        }
        if !self.fallback_margin.is_finite() || self.fallback_margin < 0.0 {
            return Err(ScanError::InvalidConfig(format!(
                "fallback_margin must be a non-negative number, got {}",
                self.fallback_margin
            )));
        }
        if self.max_documents == 0 {
            return Err(ScanError::InvalidConfig(
                "max_documents must be a positive number".into(),
            ));
        }
        if self.concurrency == Some(0) {
            return Err(ScanError::InvalidConfig(
                "concurrency must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Resolved number of concurrent page tasks.
    pub fn effective_concurrency(&self) -> usize {
        self.concurrency.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        })
    }
}

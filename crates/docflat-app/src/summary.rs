// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// JSON summary printed after a batch.

use std::path::PathBuf;

use docflat_core::human_errors::humanize_page_error;
use docflat_core::types::CornerOrigin;
use docflat_pipeline::{BatchResult, PageResult};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct BatchSummary {
    pub batch_id: String,
    pub pages: Vec<PageSummary>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub cancelled: Vec<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pdf: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PageSummary {
    Ok {
        index: usize,
        source: String,
        width: u32,
        height: u32,
        corner_origin: CornerOrigin,
        sha256: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        path: Option<PathBuf>,
        #[serde(skip_serializing_if = "Option::is_none")]
        base64: Option<String>,
    },
    Failed {
        index: usize,
        source: String,
        error: String,
        message: String,
        suggestion: String,
    },
}

impl BatchSummary {
    pub fn new(result: &BatchResult, pdf: Option<PathBuf>) -> Self {
        Self {
            batch_id: result.batch_id.to_string(),
            pages: result.pages.iter().map(PageSummary::from).collect(),
            cancelled: result.cancelled.clone(),
            pdf,
        }
    }
}

impl From<&PageResult> for PageSummary {
    fn from(page: &PageResult) -> Self {
        let source = page.source.to_string();
        match &page.outcome {
            Ok(rectified) => Self::Ok {
                index: page.index,
                source,
                width: rectified.width,
                height: rectified.height,
                corner_origin: rectified.corner_origin,
                sha256: rectified.sha256.clone(),
                path: rectified.output.as_path().map(|p| p.to_path_buf()),
                base64: rectified.output.to_base64(),
            },
            Err(err) => {
                let human = humanize_page_error(err);
                Self::Failed {
                    index: page.index,
                    source,
                    error: err.to_string(),
                    message: human.message,
                    suggestion: human.suggestion,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docflat_core::error::PageError;
    use docflat_core::geometry::Quad;
    use docflat_core::types::{BatchId, OutputHandle, SourceRef};
    use docflat_pipeline::RectifiedPage;

    #[test]
    fn serialises_both_outcomes() {
        let result = BatchResult {
            batch_id: BatchId::new(),
            pages: vec![
                PageResult {
                    index: 0,
                    source: SourceRef::path("a.jpg"),
                    outcome: Ok(RectifiedPage {
                        width: 500,
                        height: 650,
                        corners: Quad::rect(0.0, 0.0, 10.0, 13.0),
                        corner_origin: CornerOrigin::Fallback,
                        sha256: "ab".repeat(32),
                        output: OutputHandle::Bytes(b"hi".to_vec()),
                    }),
                },
                PageResult {
                    index: 1,
                    source: SourceRef::path("b.jpg"),
                    outcome: Err(PageError::DegenerateQuad),
                },
            ],
            cancelled: Vec::new(),
        };

        let json = serde_json::to_value(BatchSummary::new(&result, None)).expect("json");
        assert_eq!(json["pages"][0]["status"], "ok");
        assert_eq!(json["pages"][0]["base64"], "aGk=");
        assert_eq!(json["pages"][0]["corner_origin"], "Fallback");
        assert_eq!(json["pages"][1]["status"], "failed");
        assert_eq!(json["pages"][1]["source"], "b.jpg");
        assert!(json.get("cancelled").is_none());
        assert!(json.get("pdf").is_none());
    }
}

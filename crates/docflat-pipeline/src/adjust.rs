// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Adjustable mode — hand the resolved corners to the caller for one edit
// before the page is rectified.

use docflat_core::error::PageError;
use docflat_core::geometry::{PreviewBounds, Quad};
use docflat_core::types::Document;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

/// How a batch treats the resolved corners.
#[derive(Debug, Clone, Default)]
pub enum BatchMode {
    /// Rectify with the detected or fallback corners as they are.
    #[default]
    Automatic,
    /// Single-page mode: send an [`AdjustmentRequest`] on this channel and
    /// wait for the caller's answer before rectifying.
    Adjustable(mpsc::Sender<AdjustmentRequest>),
}

/// A page waiting for the caller to confirm or move its corners.
///
/// Consuming the request with [`submit`](Self::submit) overrides the corners,
/// [`accept`](Self::accept) keeps them, and dropping it unanswered also keeps
/// them.
#[derive(Debug)]
pub struct AdjustmentRequest {
    document: Document,
    reply: oneshot::Sender<Option<Quad>>,
}

impl AdjustmentRequest {
    /// Snapshot of the page with its resolved corners.
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Resolved corners in preview space, for drawing over a letterboxed
    /// preview.
    pub fn preview_corners(&self, bounds: &PreviewBounds) -> Quad {
        self.document
            .corners()
            .map_original_to_preview(bounds, bounds.scale_factor())
    }

    /// Replace the corners with `corners`, given in original-image space.
    pub fn submit(self, corners: Quad) {
        // The pipeline stops listening only when the batch was cancelled.
        let _ = self.reply.send(Some(corners));
    }

    /// Replace the corners with `corners` as edited on the preview described
    /// by `bounds`.
    pub fn submit_from_preview(self, corners: Quad, bounds: &PreviewBounds) {
        let original = corners.map_preview_to_original(bounds, bounds.inverse_scale_factor());
        self.submit(original);
    }

    /// Keep the resolved corners.
    pub fn accept(self) {
        let _ = self.reply.send(None);
    }
}

/// Offer `document` for adjustment and apply the answer, if any.
pub(crate) async fn request_adjustment(
    adjuster: &mpsc::Sender<AdjustmentRequest>,
    document: &mut Document,
) -> Result<(), PageError> {
    let (reply, answer) = oneshot::channel();
    let request = AdjustmentRequest {
        document: document.clone(),
        reply,
    };

    if adjuster.send(request).await.is_err() {
        warn!("Adjustment receiver closed; keeping resolved corners");
        return Ok(());
    }

    match answer.await {
        Ok(Some(corners)) => {
            document.adjust(corners)?;
            info!(?corners, "Corners adjusted");
        }
        Ok(None) => debug!("Resolved corners accepted"),
        Err(_) => debug!("Adjustment request dropped; keeping resolved corners"),
    }
    Ok(())
}

// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Batch pipeline — bounded fan-out of per-page work, ordered fan-in.
//
// Every page runs decode -> resolve -> (adjust) -> rectify -> encode. The
// CPU-bound steps run on tokio's blocking pool; at most `concurrency` pages
// are in flight. Outcomes arrive in completion order and are written into a
// pre-sized slot vector by input index, which the collector owns exclusively.

use std::path::PathBuf;
use std::sync::Arc;

use docflat_bridge::traits::{CornerDetector, OutputEncoder, SourceDecoder};
use docflat_core::config::{ResponseType, ScanConfig};
use docflat_core::error::{PageError, Result, ScanError};
use docflat_core::types::{BatchId, Destination, Document, OutputHandle, SourceRef};
use docflat_document::integrity::hash_raster;
use docflat_document::{ImageDecoder, JpegEncoder, Rectifier, resolve_corners};
use futures::stream::{self, StreamExt};
use image::DynamicImage;
use tokio::sync::mpsc;
use tokio::task::JoinError;
use tracing::{debug, info, instrument, warn};

use crate::adjust::{AdjustmentRequest, BatchMode, request_adjustment};
use crate::cancel::CancelHandle;
use crate::result::{BatchResult, PageResult, RectifiedPage};

/// Runs capture batches with a fixed configuration and set of capabilities.
pub struct BatchPipeline {
    config: ScanConfig,
    decoder: Arc<dyn SourceDecoder>,
    detector: Arc<dyn CornerDetector>,
    encoder: Arc<dyn OutputEncoder>,
    cancel: CancelHandle,
}

impl BatchPipeline {
    // -- Construction ---------------------------------------------------------

    /// Create a pipeline using `detector`, the EXIF-aware [`ImageDecoder`],
    /// and the [`JpegEncoder`]. Fails if `config` is invalid.
    pub fn new(config: ScanConfig, detector: Arc<dyn CornerDetector>) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            decoder: Arc::new(ImageDecoder::new()),
            detector,
            encoder: Arc::new(JpegEncoder::new()),
            cancel: CancelHandle::new(),
        })
    }

    pub fn with_decoder(mut self, decoder: Arc<dyn SourceDecoder>) -> Self {
        self.decoder = decoder;
        self
    }

    pub fn with_encoder(mut self, encoder: Arc<dyn OutputEncoder>) -> Self {
        self.encoder = encoder;
        self
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Handle that cancels whichever batch is running on this pipeline.
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    // -- Batch ----------------------------------------------------------------

    /// Process `sources` and return one outcome per completed page, in input
    /// order.
    ///
    /// Page failures are recorded in their slot and never abort siblings. The
    /// call itself fails only for an empty or oversized batch, an adjustable
    /// batch with more than one photo, or a blocking pool that shut down.
    /// A page whose worker panics fails on its own.
    #[instrument(skip_all, fields(count = sources.len(), mode = mode_name(&mode)))]
    pub async fn run_batch(&self, sources: Vec<SourceRef>, mode: BatchMode) -> Result<BatchResult> {
        let count = sources.len();
        if count == 0 {
            return Err(ScanError::PipelineEmptyInput);
        }
        if count > self.config.max_documents {
            return Err(ScanError::TooManyDocuments {
                count,
                max: self.config.max_documents,
            });
        }
        let adjuster = match mode {
            BatchMode::Automatic => None,
            BatchMode::Adjustable(_) if count != 1 => {
                return Err(ScanError::AdjustableBatchSize(count));
            }
            BatchMode::Adjustable(sender) => Some(sender),
        };

        let batch_id = BatchId::new();
        let concurrency = self.config.effective_concurrency();
        info!(%batch_id, concurrency, "Starting batch");

        let ctx = Arc::new(PageContext {
            batch_id,
            timestamp: chrono::Local::now().format("%Y%m%d_%H%M%S").to_string(),
            output_dir: self.output_dir(),
            config: self.config.clone(),
            decoder: Arc::clone(&self.decoder),
            detector: Arc::clone(&self.detector),
            encoder: Arc::clone(&self.encoder),
            rectifier: Rectifier::from_config(&self.config),
            cancel: self.cancel.clone(),
        });

        let mut pages = stream::iter(sources.into_iter().enumerate().map(|(index, source)| {
            process_page(Arc::clone(&ctx), index, source, adjuster.clone())
        }))
        .buffer_unordered(concurrency);

        let mut slots: Vec<Option<PageResult>> = (0..count).map(|_| None).collect();
        let cancelled = self.cancel.cancelled();
        tokio::pin!(cancelled);

        loop {
            tokio::select! {
                biased;

                _ = &mut cancelled => {
                    warn!(%batch_id, "Batch cancelled; abandoning pages in flight");
                    break;
                }

                next = pages.next() => match next {
                    Some(Ok(TaskOutcome::Done(page))) => {
                        debug!(index = page.index, ok = page.is_ok(), "Page finished");
                        let index = page.index;
                        slots[index] = Some(page);
                    }
                    Some(Ok(TaskOutcome::Abandoned(index))) => {
                        debug!(index, "Page abandoned before publishing");
                    }
                    Some(Err(join_err)) => {
                        return Err(ScanError::WorkerPool(join_err.to_string()));
                    }
                    None => break,
                },
            }
        }

        let mut completed = Vec::with_capacity(count);
        let mut abandoned = Vec::new();
        for (index, slot) in slots.into_iter().enumerate() {
            match slot {
                Some(page) => completed.push(page),
                None => abandoned.push(index),
            }
        }

        info!(
            %batch_id,
            completed = completed.len(),
            failed = completed.iter().filter(|p| !p.is_ok()).count(),
            cancelled = abandoned.len(),
            "Batch finished"
        );

        Ok(BatchResult {
            batch_id,
            pages: completed,
            cancelled: abandoned,
        })
    }

    fn output_dir(&self) -> PathBuf {
        self.config
            .output_dir
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("docflat"))
    }
}

fn mode_name(mode: &BatchMode) -> &'static str {
    match mode {
        BatchMode::Automatic => "automatic",
        BatchMode::Adjustable(_) => "adjustable",
    }
}

// -- Per-page work ------------------------------------------------------------

/// Result of one page task as seen by the collector.
enum TaskOutcome {
    Done(PageResult),
    /// The batch was cancelled before the page was published.
    Abandoned(usize),
}

impl TaskOutcome {
    fn new(index: usize, source: SourceRef, outcome: PageOutcome) -> Self {
        match outcome {
            Ok(None) => Self::Abandoned(index),
            Ok(Some(page)) => Self::Done(PageResult {
                index,
                source,
                outcome: Ok(page),
            }),
            Err(err) => Self::Done(PageResult {
                index,
                source,
                outcome: Err(err),
            }),
        }
    }
}

/// State shared read-only by every page task of one batch.
struct PageContext {
    batch_id: BatchId,
    timestamp: String,
    output_dir: PathBuf,
    config: ScanConfig,
    decoder: Arc<dyn SourceDecoder>,
    detector: Arc<dyn CornerDetector>,
    encoder: Arc<dyn OutputEncoder>,
    rectifier: Rectifier,
    cancel: CancelHandle,
}

impl PageContext {
    /// Decode the photo and resolve its corners.
    fn prepare(&self, source: &SourceRef) -> std::result::Result<(Document, DynamicImage), PageError> {
        let image = self.decoder.decode(source)?;
        let (corners, origin) =
            resolve_corners(&image, self.detector.as_ref(), self.config.fallback_margin)?;
        let document = Document::new(source.clone(), image.width(), image.height(), corners, origin);
        Ok((document, image))
    }

    /// Rectify and publish. `Ok(None)` when the batch was cancelled first.
    ///
    /// The flag is checked again once the output exists; a file published
    /// after the cancel is removed so nothing unreported stays behind.
    fn finish(&self, index: usize, document: &Document, image: &DynamicImage) -> PageOutcome {
        let corners = document.corners();
        let flat = self.rectifier.rectify(image, &corners)?;

        if self.cancel.is_cancelled() {
            return Ok(None);
        }

        let output = self
            .encoder
            .encode(&flat, self.config.quality, &self.destination(index))?;

        if self.cancel.is_cancelled() {
            discard(&output);
            return Ok(None);
        }

        Ok(Some(RectifiedPage {
            width: flat.width(),
            height: flat.height(),
            corners,
            corner_origin: document.origin(),
            sha256: hash_raster(&flat),
            output,
        }))
    }

    fn destination(&self, index: usize) -> Destination {
        match self.config.response_type {
            ResponseType::Base64 => Destination::Memory,
            ResponseType::ImageFilePath => Destination::File(self.output_dir.join(format!(
                "DOCUMENT_SCAN_{index}_{}_{}.jpg",
                self.timestamp,
                self.batch_id.short()
            ))),
        }
    }
}

/// What one page task produced. `Ok(None)` means it was abandoned.
type PageOutcome = std::result::Result<Option<RectifiedPage>, PageError>;

/// Remove a file output that lost the race with a cancel.
fn discard(output: &OutputHandle) {
    if let Some(path) = output.as_path() {
        match std::fs::remove_file(path) {
            Ok(()) => debug!(path = %path.display(), "Removed page published after cancel"),
            Err(err) => warn!(path = %path.display(), %err, "Failed to remove cancelled page"),
        }
    }
}

/// Run one page, turning a panic inside its worker into a failure of that
/// page alone. Any other join failure means the blocking pool itself is
/// gone and is returned to the collector.
async fn process_page(
    ctx: Arc<PageContext>,
    index: usize,
    source: SourceRef,
    adjuster: Option<mpsc::Sender<AdjustmentRequest>>,
) -> std::result::Result<TaskOutcome, JoinError> {
    let outcome = match run_page(ctx, index, source.clone(), adjuster).await {
        Ok(outcome) => outcome,
        Err(join_err) if join_err.is_panic() => {
            warn!(index, error = %join_err, "Page worker panicked");
            Err(PageError::WorkerPanicked(panic_message(join_err)))
        }
        Err(join_err) => return Err(join_err),
    };
    Ok(TaskOutcome::new(index, source, outcome))
}

async fn run_page(
    ctx: Arc<PageContext>,
    index: usize,
    source: SourceRef,
    adjuster: Option<mpsc::Sender<AdjustmentRequest>>,
) -> std::result::Result<PageOutcome, JoinError> {
    let Some(adjuster) = adjuster else {
        return tokio::task::spawn_blocking(move || {
            let (document, image) = ctx.prepare(&source)?;
            ctx.finish(index, &document, &image)
        })
        .await;
    };

    let prepared = {
        let ctx = Arc::clone(&ctx);
        tokio::task::spawn_blocking(move || ctx.prepare(&source)).await?
    };
    let (mut document, image) = match prepared {
        Ok(prepared) => prepared,
        Err(err) => return Ok(Err(err)),
    };

    if let Err(err) = request_adjustment(&adjuster, &mut document).await {
        return Ok(Err(err));
    }

    tokio::task::spawn_blocking(move || ctx.finish(index, &document, &image)).await
}

fn panic_message(join_err: JoinError) -> String {
    let payload = join_err.into_panic();
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}

// -- Tests --------------------------------------------------------------------

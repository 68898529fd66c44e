// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// docflat — Document capture CLI
//
// Entry point. Initialises logging, builds the scan configuration, runs one
// batch over the given photos, optionally paginates the pages into a PDF,
// and prints a JSON summary on stdout.

mod cli;
mod services;
mod summary;

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::Parser;
use docflat_bridge::stub::NullDetector;
use docflat_bridge::traits::CornerDetector;
use docflat_core::config::ResponseType;
use docflat_core::geometry::{PreviewBounds, Quad};
use docflat_core::human_errors::humanize_scan_error;
use docflat_core::types::SourceRef;
use docflat_document::{EdgeCornerDetector, PdfWriter};
use docflat_pipeline::{AdjustmentRequest, BatchMode, BatchPipeline, BatchResult};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use cli::{Cli, DetectorArg};
use services::data_dir::data_subdir;
use summary::BatchSummary;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_filter())),
        )
        .with_writer(io::stderr)
        .init();

    tracing::info!("docflat starting");

    let mut config = cli.scan_config().context("invalid configuration")?;
    if config.response_type == ResponseType::ImageFilePath && config.output_dir.is_none() {
        config.output_dir = Some(data_subdir("scans"));
    }

    let detector: Arc<dyn CornerDetector> = match cli.detector {
        DetectorArg::Edge => Arc::new(EdgeCornerDetector::new()),
        DetectorArg::None => Arc::new(NullDetector),
    };
    let pipeline = BatchPipeline::new(config, detector)?;

    let cancel = pipeline.cancel_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupt received, cancelling batch");
            cancel.cancel();
        }
    });

    let mode = match cli.corners {
        Some(corners) => BatchMode::Adjustable(spawn_adjuster(corners, cli.preview)),
        None => BatchMode::Automatic,
    };

    let sources = cli.inputs.iter().cloned().map(SourceRef::Path).collect();
    let result = match pipeline.run_batch(sources, mode).await {
        Ok(result) => result,
        Err(err) => {
            let human = humanize_scan_error(&err);
            tracing::error!(suggestion = %human.suggestion, "{}", human.message);
            return Err(err.into());
        }
    };

    let pdf = match &cli.pdf {
        Some(path) => Some(write_pdf(&result, path).await?),
        None => None,
    };

    let summary = BatchSummary::new(&result, pdf);
    println!("{}", serde_json::to_string_pretty(&summary)?);

    for (index, label) in result.failure_labels() {
        tracing::warn!(index, "{label}");
    }
    if result.succeeded().next().is_none() {
        bail!("no page could be rectified");
    }
    Ok(())
}

/// Answer the single adjustment request with the corners from the command
/// line, mapping them out of preview space first when a preview size was
/// given.
fn spawn_adjuster(corners: Quad, preview: Option<(f64, f64)>) -> mpsc::Sender<AdjustmentRequest> {
    let (tx, mut rx) = mpsc::channel::<AdjustmentRequest>(1);
    tokio::spawn(async move {
        let Some(request) = rx.recv().await else {
            return;
        };
        match preview {
            Some((container_w, container_h)) => {
                let doc = request.document();
                let bounds = PreviewBounds::fit(
                    container_w,
                    container_h,
                    f64::from(doc.original_width()),
                    f64::from(doc.original_height()),
                );
                tracing::debug!(?bounds, "mapping corners out of preview space");
                request.submit_from_preview(corners, &bounds);
            }
            None => request.submit(corners),
        }
    });
    tx
}

/// Paginate every successful page, in input order, into `path`.
async fn write_pdf(result: &BatchResult, path: &Path) -> Result<PathBuf> {
    let pages = result
        .succeeded()
        .map(|page| page.output.read_bytes())
        .collect::<io::Result<Vec<_>>>()
        .context("failed to read rectified pages")?;
    if pages.is_empty() {
        bail!("no rectified pages to put in the PDF");
    }

    let path = path.to_path_buf();
    let written = path.clone();
    tokio::task::spawn_blocking(move || {
        let mut writer = PdfWriter::new();
        writer.set_title("docflat scan");
        writer.write_to_file(&pages, &path)
    })
    .await
    .context("PDF worker failed")??;

    Ok(written)
}

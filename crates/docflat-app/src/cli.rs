// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Command-line arguments and their mapping onto `ScanConfig`.

use std::path::PathBuf;

use clap::Parser;
use docflat_core::config::{ResponseType, ScanConfig};
use docflat_core::geometry::{Point, Quad};

const AFTER_HELP: &str = r#"EXAMPLES:
  # Flatten photos into JPEGs in the data directory
  docflat receipt.jpg invoice.jpg

  # Also paginate them into a PDF
  docflat page-*.jpg --pdf scan.pdf -o ./out

  # Keep pages in memory and print them as base64 in the JSON summary
  docflat --base64 photo.jpg

  # Place the corners by hand (original-image pixels, clockwise from top-left)
  docflat photo.jpg --corners 120,80,1880,95,1900,1400,100,1380

  # Corners picked on a 1080x1920 preview of the photo
  docflat photo.jpg --corners 40,300,1040,310,1050,1500,30,1490 --preview 1080x1920
"#;

/// Flatten photographed documents into straight, evenly sized pages.
#[derive(Parser, Debug)]
#[command(
    name = "docflat",
    version,
    about = "Flatten photographed documents into straight pages or a PDF",
    arg_required_else_help = true,
    after_long_help = AFTER_HELP
)]
pub struct Cli {
    /// Photos to process, in page order.
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// JSON config file (missing fields take defaults).
    #[arg(short, long, env = "DOCFLAT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Directory for rectified JPEGs. Default: <data dir>/docflat/scans.
    #[arg(short, long, env = "DOCFLAT_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// JPEG quality (0-100).
    #[arg(long, env = "DOCFLAT_QUALITY",
          value_parser = clap::value_parser!(u8).range(0..=100))]
    pub quality: Option<u8>,

    /// Width of every rectified page in pixels.
    #[arg(long, env = "DOCFLAT_TARGET_WIDTH",
          value_parser = clap::value_parser!(u32).range(1..))]
    pub target_width: Option<u32>,

    /// Pages processed at the same time. Default: number of CPUs.
    #[arg(short = 'j', long, env = "DOCFLAT_CONCURRENCY")]
    pub concurrency: Option<usize>,

    /// Inset in pixels used when no document edges are found.
    #[arg(long, env = "DOCFLAT_MARGIN")]
    pub margin: Option<f64>,

    /// Keep pages in memory and print them as base64 instead of writing files.
    #[arg(long)]
    pub base64: bool,

    /// Also write every rectified page, in order, into this PDF.
    #[arg(long)]
    pub pdf: Option<PathBuf>,

    /// Corner detector to use.
    #[arg(long, value_enum, default_value = "edge")]
    pub detector: DetectorArg,

    /// Override the corners of a single photo: x1,y1,...,x4,y4 clockwise
    /// from top-left.
    #[arg(long, value_parser = parse_quad)]
    pub corners: Option<Quad>,

    /// Interpret --corners in a WIDTHxHEIGHT preview the photo was fitted
    /// into, rather than in photo pixels.
    #[arg(long, value_parser = parse_size, requires = "corners")]
    pub preview: Option<(f64, f64)>,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress logs except errors.
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum DetectorArg {
    /// Canny edges + Hough lines.
    Edge,
    /// Always use the fallback inset.
    None,
}

impl Cli {
    /// Load the config file (or defaults) and apply flag overrides.
    pub fn scan_config(&self) -> docflat_core::error::Result<ScanConfig> {
        let mut config = match &self.config {
            Some(path) => ScanConfig::load(path)?,
            None => ScanConfig::default(),
        };

        if let Some(dir) = &self.output_dir {
            config.output_dir = Some(dir.clone());
        }
        if let Some(quality) = self.quality {
            config.quality = quality;
        }
        if let Some(width) = self.target_width {
            config.target_width = width;
        }
        if let Some(concurrency) = self.concurrency {
            config.concurrency = Some(concurrency);
        }
        if let Some(margin) = self.margin {
            config.fallback_margin = margin;
        }
        if self.base64 {
            config.response_type = ResponseType::Base64;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn log_filter(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else if self.quiet {
            "error"
        } else {
            "info"
        }
    }
}

/// Parse `x1,y1,x2,y2,x3,y3,x4,y4` into a quad.
pub fn parse_quad(raw: &str) -> Result<Quad, String> {
    let values = raw
        .split(',')
        .map(|v| v.trim().parse::<f64>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|err| format!("invalid coordinate: {err}"))?;
    if values.len() != 8 {
        return Err(format!("expected 8 comma-separated numbers, got {}", values.len()));
    }
    let point = |i: usize| Point::new(values[2 * i], values[2 * i + 1]);
    Ok(Quad::new(point(0), point(1), point(2), point(3)))
}

/// Parse `WIDTHxHEIGHT`.
pub fn parse_size(raw: &str) -> Result<(f64, f64), String> {
    let (w, h) = raw
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got {raw:?}"))?;
    let w: f64 = w.trim().parse().map_err(|err| format!("invalid width: {err}"))?;
    let h: f64 = h.trim().parse().map_err(|err| format!("invalid height: {err}"))?;
    if !(w > 0.0 && h > 0.0) {
        return Err("preview size must be positive".into());
    }
    Ok((w, h))
}

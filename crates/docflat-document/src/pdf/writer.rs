// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF writer — one page per rectified image using `printpdf` 0.8.
//
// Each page is exactly the size of its image at 72 dpi, so one image pixel
// is one PDF point and the page carries no margins.

use std::path::Path;

use docflat_core::error::{Result, ScanError};
use printpdf::{
    Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg, Pt, RawImage, RawImageData,
    RawImageFormat, XObjectTransform,
};
use tracing::{debug, info, instrument};

/// Resolution at which image pixels map one-to-one onto PDF points.
const PAGE_DPI: f32 = 72.0;

/// Millimetres per PDF point.
const MM_PER_PT: f32 = 25.4 / 72.0;

/// Assembles encoded page images into a multi-page PDF.
#[derive(Debug, Clone, Default)]
pub struct PdfWriter {
    /// Title metadata embedded in the PDF /Info dictionary.
    title: Option<String>,
}

impl PdfWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a title for the PDF metadata.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    /// Create a PDF with one page per entry of `pages`, in order.
    ///
    /// Each entry is an encoded image (JPEG, PNG, ...). The page is sized to
    /// the image at 72 dpi.
    #[instrument(skip(self, pages), fields(page_count = pages.len()))]
    pub fn create_from_pages<B: AsRef<[u8]>>(&self, pages: &[B]) -> Result<Vec<u8>> {
        if pages.is_empty() {
            return Err(ScanError::Pdf("cannot create a PDF with no pages".into()));
        }
        let title = self.title.as_deref().unwrap_or("docflat scan");
        info!(title, "Creating multi-page PDF");

        let mut doc = PdfDocument::new(title);
        let mut pdf_pages = Vec::with_capacity(pages.len());

        for (index, bytes) in pages.iter().enumerate() {
            let dynamic_image = ::image::load_from_memory(bytes.as_ref()).map_err(|err| {
                ScanError::Pdf(format!("failed to decode page {index} for PDF: {err}"))
            })?;

            let (img_w, img_h) = (dynamic_image.width(), dynamic_image.height());
            let raw = RawImage {
                pixels: RawImageData::U8(dynamic_image.to_rgb8().into_raw()),
                width: img_w as usize,
                height: img_h as usize,
                data_format: RawImageFormat::RGB8,
                tag: Vec::new(),
            };
            let xobject_id = doc.add_image(&raw);

            let ops = vec![Op::UseXobject {
                id: xobject_id,
                transform: XObjectTransform {
                    translate_x: Some(Pt(0.0)),
                    translate_y: Some(Pt(0.0)),
                    scale_x: None,
                    scale_y: None,
                    dpi: Some(PAGE_DPI),
                    rotate: None,
                },
            }];

            let page_w = Mm(img_w as f32 * MM_PER_PT);
            let page_h = Mm(img_h as f32 * MM_PER_PT);
            pdf_pages.push(PdfPage::new(page_w, page_h, ops));
            debug!(index, img_w, img_h, "Page added");
        }

        doc.with_pages(pdf_pages);

        let mut warnings: Vec<PdfWarnMsg> = Vec::new();
        let output = doc.save(&PdfSaveOptions::default(), &mut warnings);
        debug!(bytes = output.len(), warnings = warnings.len(), "PDF serialised");
        Ok(output)
    }

    /// Create the PDF and write it directly to a file.
    pub fn write_to_file<B: AsRef<[u8]>>(
        &self,
        pages: &[B],
        path: impl AsRef<Path>,
    ) -> Result<()> {
        let bytes = self.create_from_pages(pages)?;
        std::fs::write(path.as_ref(), &bytes)?;
        info!("Wrote PDF to {}", path.as_ref().display());
        Ok(())
    }
}

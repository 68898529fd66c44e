// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for the docflat-document crate: corner detection and
// rectification on a synthetic photo.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use docflat_bridge::traits::CornerDetector;
use docflat_core::geometry::{Point, Quad};
use docflat_document::{EdgeCornerDetector, Rectifier};
use image::{DynamicImage, GrayImage, Luma};

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// 800x600 dark background with a bright page from (120, 90) to (680, 510).
fn synthetic_photo() -> DynamicImage {
    let mut img = GrayImage::from_pixel(800, 600, Luma([30u8]));
    for y in 90..510 {
        for x in 120..680 {
            img.put_pixel(x, y, Luma([235u8]));
        }
    }
    DynamicImage::ImageLuma8(img)
}

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

fn bench_detection(c: &mut Criterion) {
    let photo = synthetic_photo();
    let detector = EdgeCornerDetector::new();
    c.bench_function("edge_corner_detection (800x600)", |b| {
        b.iter(|| black_box(detector.detect(black_box(&photo))));
    });
}

/// Rectify a skewed quad to the default 500px width.
fn bench_rectify(c: &mut Criterion) {
    let photo = synthetic_photo();
    let quad = Quad::new(
        Point::new(130.0, 95.0),
        Point::new(670.0, 110.0),
        Point::new(690.0, 505.0),
        Point::new(110.0, 500.0),
    );
    let rectifier = Rectifier::default();
    c.bench_function("rectify (800x600 -> 500 wide)", |b| {
        b.iter(|| black_box(rectifier.rectify(black_box(&photo), &quad)));
    });
}

criterion_group!(benches, bench_detection, bench_rectify);
criterion_main!(benches);

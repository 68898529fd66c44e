// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page integrity — SHA-256 fingerprints of rectified rasters.

use image::DynamicImage;
use sha2::{Digest, Sha256};

/// Fingerprint a raster by its dimensions and raw pixel buffer.
///
/// Independent of the output encoding, so a page rectified twice from the
/// same photo and corners hashes the same whether it went to a file or to
/// base64.
pub fn hash_raster(image: &DynamicImage) -> String {
    let mut hasher = Sha256::new();
    hasher.update(image.width().to_le_bytes());
    hasher.update(image.height().to_le_bytes());
    hasher.update(image.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    /// SHA-256 over width, height and the RGBA bytes of a 1x1 black pixel.
    #[test]
    fn raster_hash_known_value() {
        let pixel = DynamicImage::ImageRgba8(RgbaImage::from_pixel(1, 1, Rgba([0, 0, 0, 255])));
        let mut hasher = Sha256::new();
        hasher.update([1u8, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 255]);
        assert_eq!(hash_raster(&pixel), hex::encode(hasher.finalize()));
    }

    #[test]
    fn raster_hash_depends_on_shape_and_pixels() {
        let a = DynamicImage::ImageRgba8(RgbaImage::from_pixel(4, 2, Rgba([1, 2, 3, 255])));
        let b = DynamicImage::ImageRgba8(RgbaImage::from_pixel(2, 4, Rgba([1, 2, 3, 255])));
        let c = DynamicImage::ImageRgba8(RgbaImage::from_pixel(4, 2, Rgba([9, 2, 3, 255])));

        assert_eq!(hash_raster(&a), hash_raster(&a.clone()));
        assert_ne!(hash_raster(&a), hash_raster(&b));
        assert_ne!(hash_raster(&a), hash_raster(&c));
        assert_eq!(hash_raster(&a).len(), 64);
    }
}

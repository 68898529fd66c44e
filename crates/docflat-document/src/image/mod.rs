// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image module — source decoding and output encoding.

pub mod decode;
pub mod encode;

pub use decode::ImageDecoder;
pub use encode::JpegEncoder;

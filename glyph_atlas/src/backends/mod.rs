// Copyright 2025 the Glyph Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Ready-made collaborators.
//!
//! [`memory::MemoryTextures`] keeps texture pages in host memory and is what
//! the tests and the `render_text` demo use. With the `swash` feature,
//! [`swash::SwashFonts`] loads, rasterizes and shapes real font files.

pub mod memory;

#[cfg(feature = "swash")]
pub mod swash;

// Copyright 2025 the Glyph Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A single atlas page: pixels plus the packer describing their allocation.

use crate::{GlyphBitmap, Packer};

/// The BGRA8 value every pixel holds before a glyph is written to it.
///
/// Transparent white keeps bilinear sampling at glyph edges from pulling in a
/// dark fringe.
pub const CLEAR_PIXEL: [u8; 4] = [255, 255, 255, 0];

/// A square BGRA8 pixel buffer and the packer tree for it.
#[derive(Clone)]
pub struct Page {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
    packer: Packer,
}

impl Page {
    /// Creates a page of `size` x `size` transparent white pixels.
    pub fn new(size: u32) -> Self {
        let len = size as usize * size as usize * 4;
        let mut pixels = Vec::with_capacity(len);
        for _ in 0..len / 4 {
            pixels.extend_from_slice(&CLEAR_PIXEL);
        }
        Self {
            width: size,
            height: size,
            pixels,
            packer: Packer::new(),
        }
    }

    /// Width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// BGRA8 pixels, row-major, `width * height * 4` bytes.
    #[inline]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// The packer tree of this page.
    #[inline]
    pub fn packer(&self) -> &Packer {
        &self.packer
    }

    /// Reserves a rectangle; see [`Packer::reserve`].
    pub(crate) fn reserve(&mut self, width: u32, height: u32) -> Option<(u32, u32)> {
        self.packer.reserve(width, height, self.width, self.height)
    }

    /// Frees the whole page and paints it transparent white again.
    pub(crate) fn clear(&mut self) {
        self.packer.reset();
        for pixel in self.pixels.chunks_exact_mut(4) {
            pixel.copy_from_slice(&CLEAR_PIXEL);
        }
    }

    /// Writes `bitmap` at (`x`, `y`) as white with the coverage in alpha.
    ///
    /// The caller guarantees the bitmap lies inside the page.
    pub(crate) fn write_coverage(&mut self, x: u32, y: u32, bitmap: &GlyphBitmap) {
        debug_assert!(
            x + bitmap.width <= self.width && y + bitmap.rows <= self.height,
            "glyph bitmap escapes the page"
        );
        let stride = self.width as usize * 4;
        let width = bitmap.width as usize;
        for (row, coverage) in bitmap.alpha.chunks_exact(width.max(1)).enumerate() {
            let start = (y as usize + row) * stride + x as usize * 4;
            let dst = &mut self.pixels[start..start + width * 4];
            for (pixel, &alpha) in dst.chunks_exact_mut(4).zip(coverage) {
                pixel.copy_from_slice(&[255, 255, 255, alpha]);
            }
        }
    }

    /// Copies a rectangle out of the page as tightly packed BGRA8 rows.
    pub fn copy_rect(&self, x: u32, y: u32, width: u32, height: u32) -> Vec<u8> {
        let stride = self.width as usize * 4;
        let row_len = width as usize * 4;
        let mut out = Vec::with_capacity(row_len * height as usize);
        for row in 0..height as usize {
            let start = (y as usize + row) * stride + x as usize * 4;
            out.extend_from_slice(&self.pixels[start..start + row_len]);
        }
        out
    }
}

impl core::fmt::Debug for Page {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Page")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("packer_nodes", &self.packer.node_count())
            .finish_non_exhaustive()
    }
}

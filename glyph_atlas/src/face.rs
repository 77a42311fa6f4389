// Copyright 2025 the Glyph Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A registered font face.

use crate::{FontBackend, GlyphCache, Rasterizer, Result, SizeMetrics};

/// A face registered with a [`FontAtlas`](crate::FontAtlas).
///
/// Owns the face's rasterizer, the shaper bound to it and its glyph cache.
/// Nothing here is shared with other faces.
pub struct Face<F: FontBackend> {
    pub(crate) rasterizer: F::Rasterizer,
    pub(crate) shaper: F::Shaper,
    pub(crate) cache: GlyphCache,
}

impl<F: FontBackend> Face<F> {
    pub(crate) fn new(rasterizer: F::Rasterizer, shaper: F::Shaper) -> Self {
        Self {
            rasterizer,
            shaper,
            cache: GlyphCache::new(),
        }
    }

    /// The glyph cache of this face.
    pub fn cache(&self) -> &GlyphCache {
        &self.cache
    }

    /// The rasterizer handle of this face.
    pub fn rasterizer(&self) -> &F::Rasterizer {
        &self.rasterizer
    }

    /// Applies a character size and re-binds the shaper to it.
    pub(crate) fn set_size(&mut self, fonts: &mut F, size: u32, dpi: u32) -> Result<()> {
        self.rasterizer.set_char_size(size, dpi)?;
        self.shaper = fonts.bind_shaper(&self.rasterizer)?;
        Ok(())
    }

    /// Vertical metrics at `size`/`dpi`.
    pub(crate) fn size_metrics(&mut self, size: u32, dpi: u32) -> Result<SizeMetrics> {
        self.rasterizer.set_char_size(size, dpi)?;
        Ok(self.rasterizer.size_metrics())
    }
}

impl<F: FontBackend> core::fmt::Debug for Face<F> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Face")
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

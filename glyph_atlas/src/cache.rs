// Copyright 2025 the Glyph Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-face glyph cache mapping glyph keys to atlas placements.

use hashbrown::HashMap;

use crate::{
    GLYPH_PADDING, GlyphMetrics, PageManager, Rasterizer, Result, TextureBackend,
};

/// Identifies one rendering of a glyph within a face.
///
/// Two keys are equal only if glyph id, size and resolution all match, so the
/// same glyph at two sizes never shares a bitmap.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GlyphKey {
    /// Glyph id within the face.
    pub glyph_id: u32,
    /// Character size in points.
    pub size: u32,
    /// Resolution the size was applied at.
    pub dpi: u32,
}

/// Where a cached glyph lives in the atlas and how to lay it out.
///
/// Records are written once per key and never modified.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GlyphRecord {
    /// Index of the atlas page holding the bitmap.
    ///
    /// This is a weak reference: it refers to whatever page has this index
    /// after a later eviction.
    pub page_index: usize,
    /// Top edge as a fraction of the page height.
    pub top: f32,
    /// Left edge as a fraction of the page width.
    pub left: f32,
    /// Bottom edge as a fraction of the page height.
    pub bottom: f32,
    /// Right edge as a fraction of the page width.
    pub right: f32,
    /// Glyph metrics in font units.
    pub metrics: GlyphMetrics,
}

/// Lazily filled map from [`GlyphKey`] to [`GlyphRecord`] for one face.
///
/// A miss rasterizes the glyph, reserves space for it in the
/// [`PageManager`] and uploads it; a hit returns the stored record as is.
///
/// The cache remembers the page generation it was filled under. After pages
/// have been evicted its records point at wiped pixels, so the first lookup in
/// a newer generation drops them all and starts over.
pub struct GlyphCache {
    entries: HashMap<GlyphKey, GlyphRecord>,
    generation: u64,
    cache_hits: u64,
    cache_misses: u64,
}

impl GlyphCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            generation: 0,
            cache_hits: 0,
            cache_misses: 0,
        }
    }

    /// Returns the record for `glyph_id` at `size`/`dpi`, rasterizing and
    /// uploading the glyph on a miss.
    ///
    /// Errors from the rasterizer or the page manager are returned unchanged;
    /// no record is stored in that case.
    pub fn lookup<R: Rasterizer, T: TextureBackend>(
        &mut self,
        rasterizer: &mut R,
        pages: &mut PageManager<T>,
        glyph_id: u32,
        size: u32,
        dpi: u32,
    ) -> Result<GlyphRecord> {
        self.sync_generation(pages.generation());

        let key = GlyphKey {
            glyph_id,
            size,
            dpi,
        };
        if let Some(record) = self.entries.get(&key) {
            self.cache_hits += 1;
            log::trace!("glyph cache hit: {key:?}");
            return Ok(*record);
        }
        self.cache_misses += 1;
        log::trace!("glyph cache miss: {key:?}");

        rasterizer.set_char_size(size, dpi)?;
        let glyph = rasterizer.render_glyph(glyph_id)?;
        let bitmap = &glyph.bitmap;

        let placement = pages.reserve_space_for_glyph(
            bitmap.width + GLYPH_PADDING,
            bitmap.rows + GLYPH_PADDING,
        )?;
        pages.upload_glyph(placement, bitmap)?;

        let page_size = pages.page_size() as f32;
        let (x, y) = (placement.x as f32, placement.y as f32);
        let record = GlyphRecord {
            page_index: placement.page_index,
            top: y / page_size,
            left: x / page_size,
            bottom: (y + bitmap.rows as f32) / page_size,
            right: (x + bitmap.width as f32) / page_size,
            metrics: glyph.metrics,
        };
        self.entries.insert(key, record);
        Ok(record)
    }

    /// Drops every record if pages were evicted since the cache was filled.
    fn sync_generation(&mut self, generation: u64) {
        if self.generation != generation {
            if !self.entries.is_empty() {
                log::debug!(
                    "dropping {} glyph records from before atlas eviction",
                    self.entries.len()
                );
            }
            self.entries.clear();
            self.generation = generation;
        }
    }

    /// Returns the stored record for `key` without touching the atlas.
    pub fn get(&self, key: &GlyphKey) -> Option<&GlyphRecord> {
        self.entries.get(key)
    }

    /// Number of cached glyphs.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no glyph is cached.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of hits since the last [`clear_stats`](Self::clear_stats).
    #[inline]
    pub fn cache_hits(&self) -> u64 {
        self.cache_hits
    }

    /// Number of misses since the last [`clear_stats`](Self::clear_stats).
    #[inline]
    pub fn cache_misses(&self) -> u64 {
        self.cache_misses
    }

    /// Resets hit/miss statistics without touching the entries.
    pub fn clear_stats(&mut self) {
        self.cache_hits = 0;
        self.cache_misses = 0;
    }
}

impl Default for GlyphCache {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for GlyphCache {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("GlyphCache")
            .field("entries", &self.entries.len())
            .field("generation", &self.generation)
            .field("cache_hits", &self.cache_hits)
            .field("cache_misses", &self.cache_misses)
            .finish()
    }
}

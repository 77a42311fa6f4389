// Copyright 2025 the Glyph Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Font collaborators: face loading, rasterization and shaping.

use std::path::Path;

use crate::Result;

/// Number of font units in one pixel.
///
/// Font units are 26.6 fixed point: every glyph metric, size metric and
/// shaping position reported by a collaborator uses them.
pub const FONT_UNITS_PER_PIXEL: i32 = 64;

/// Opens faces and binds shapers to them.
///
/// One backend serves every face registered with a
/// [`FontAtlas`](crate::FontAtlas). The rasterizer it returns for a face is
/// that face's handle; shapers are bound to a rasterizer and re-bound each
/// time a session changes the character size.
pub trait FontBackend {
    /// Per-face rasterizer handle.
    type Rasterizer: Rasterizer;
    /// Per-face shaper handle.
    type Shaper: Shaper<Self::Rasterizer>;

    /// Opens face `face_index` of the font file at `path`.
    fn open_face(&mut self, path: &Path, face_index: u32) -> Result<Self::Rasterizer>;

    /// Opens face `face_index` of an in-memory font file.
    fn open_face_data(&mut self, data: Vec<u8>, face_index: u32) -> Result<Self::Rasterizer>;

    /// Binds a shaper to the current state of `rasterizer`.
    fn bind_shaper(&mut self, rasterizer: &Self::Rasterizer) -> Result<Self::Shaper>;
}

/// Rasterizes glyphs of one face.
pub trait Rasterizer {
    /// Selects the character size used by later calls.
    ///
    /// `size` is in points; the pixel size is `size * dpi / 72`.
    fn set_char_size(&mut self, size: u32, dpi: u32) -> Result<()>;

    /// Renders `glyph_id` at the current character size.
    fn render_glyph(&mut self, glyph_id: u32) -> Result<RasterizedGlyph>;

    /// Vertical metrics at the current character size.
    fn size_metrics(&self) -> SizeMetrics;
}

/// Shapes text with one face.
pub trait Shaper<R: Rasterizer> {
    /// Shapes `text` into positioned glyph ids, using the rasterizer's current
    /// character size. Script, direction and language are inferred.
    fn shape(&mut self, rasterizer: &R, text: &str) -> Result<ShapedRun>;
}

/// An alpha coverage bitmap.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GlyphBitmap {
    /// Width in pixels.
    pub width: u32,
    /// Number of rows.
    pub rows: u32,
    /// One coverage byte per pixel, row-major, `width * rows` bytes.
    pub alpha: Vec<u8>,
}

impl GlyphBitmap {
    /// Returns `true` if the bitmap has no pixels.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.rows == 0
    }
}

/// Glyph metrics in font units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct GlyphMetrics {
    /// Width of the glyph's bounding box.
    pub width: i32,
    /// Height of the glyph's bounding box.
    pub height: i32,
    /// Distance from the pen position to the left edge of the bounding box.
    pub bearing_x: i32,
    /// Distance from the baseline up to the top edge of the bounding box.
    pub bearing_y: i32,
}

/// A rendered glyph and its metrics.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RasterizedGlyph {
    /// Coverage bitmap.
    pub bitmap: GlyphBitmap,
    /// Metrics in font units.
    pub metrics: GlyphMetrics,
}

/// Vertical face metrics in font units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct SizeMetrics {
    /// Distance from the baseline to the top of the tallest glyphs.
    pub ascender: i32,
    /// Distance from the baseline to the bottom of the lowest glyphs; usually negative.
    pub descender: i32,
    /// Baseline-to-baseline distance.
    pub line_height: i32,
}

/// Glyph id and source cluster of one shaped glyph.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct GlyphInfo {
    /// Glyph id within the face.
    pub glyph_id: u32,
    /// Byte offset of the cluster in the shaped text.
    pub cluster: u32,
}

/// Advance and offset of one shaped glyph, in font units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct GlyphPosition {
    /// Horizontal pen advance.
    pub x_advance: i32,
    /// Vertical pen advance.
    pub y_advance: i32,
    /// Horizontal offset from the pen position.
    pub x_offset: i32,
    /// Vertical offset from the pen position.
    pub y_offset: i32,
}

/// Output of [`Shaper::shape`]: two index-aligned sequences in visual order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ShapedRun {
    /// Glyph ids and clusters.
    pub infos: Vec<GlyphInfo>,
    /// Advances and offsets, one per entry of `infos`.
    pub positions: Vec<GlyphPosition>,
}

impl ShapedRun {
    /// Number of glyphs in the run.
    pub fn len(&self) -> usize {
        self.infos.len()
    }

    /// Returns `true` if the run has no glyphs.
    pub fn is_empty(&self) -> bool {
        self.infos.is_empty()
    }

    /// Appends one glyph.
    pub fn push(&mut self, info: GlyphInfo, position: GlyphPosition) {
        self.infos.push(info);
        self.positions.push(position);
    }
}

/// Converts pixels to font units, rounding to the nearest unit.
#[expect(
    clippy::cast_possible_truncation,
    reason = "glyph and line metrics are far below i32::MAX / 64 pixels"
)]
#[inline]
pub(crate) fn px_to_font_units(px: f32) -> i32 {
    (px * FONT_UNITS_PER_PIXEL as f32).round() as i32
}

// Copyright 2025 the Glyph Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shaping sessions: a shaped run resolved glyph by glyph through the cache.

use crate::{
    Face, FontBackend, GlyphInfo, GlyphPosition, GlyphRecord, PageManager, Result, ShapedRun,
    TextureBackend,
};

/// What a renderer needs to draw one glyph quad.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderDescriptor<H> {
    /// Texture of the atlas page holding the glyph.
    pub texture: H,
    /// Top edge as a fraction of the page height.
    pub top: f32,
    /// Left edge as a fraction of the page width.
    pub left: f32,
    /// Bottom edge as a fraction of the page height.
    pub bottom: f32,
    /// Right edge as a fraction of the page width.
    pub right: f32,
}

impl<H> RenderDescriptor<H> {
    /// The normalized rectangle as `[left, top, right, bottom]`.
    pub fn uv(&self) -> [f32; 4] {
        [self.left, self.top, self.right, self.bottom]
    }
}

/// Where to place one glyph quad relative to the pen, in font units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct LayoutDescriptor {
    /// Horizontal pen advance after this glyph.
    pub x_advance: i32,
    /// Vertical pen advance after this glyph.
    pub y_advance: i32,
    /// Left edge of the quad relative to the pen: shaping offset plus bearing.
    pub x_offset: i32,
    /// Top edge of the quad above the baseline: shaping offset plus bearing.
    pub y_offset: i32,
    /// Width of the quad.
    pub width: i32,
    /// Height of the quad.
    pub height: i32,
}

impl LayoutDescriptor {
    fn new(position: GlyphPosition, record: &GlyphRecord) -> Self {
        Self {
            x_advance: position.x_advance,
            y_advance: position.y_advance,
            x_offset: position.x_offset + record.metrics.bearing_x,
            y_offset: position.y_offset + record.metrics.bearing_y,
            width: record.metrics.width,
            height: record.metrics.height,
        }
    }
}

/// One resolved glyph of a [`Session`].
#[derive(Clone, Debug, PartialEq)]
pub struct PositionedGlyph<H> {
    /// Glyph id within the face.
    pub glyph_id: u32,
    /// Byte offset of the source cluster in the shaped text.
    pub cluster: u32,
    /// Index of the atlas page holding the glyph.
    pub page_index: usize,
    /// Texture and normalized rectangle.
    pub render: RenderDescriptor<H>,
    /// Placement metrics.
    pub layout: LayoutDescriptor,
}

/// A shaped run being resolved through a face's glyph cache.
///
/// Created by [`FontAtlas::open_session`](crate::FontAtlas::open_session).
/// Iterating yields one [`PositionedGlyph`] per shaped glyph, in shaping
/// order; each step may rasterize and upload the glyph. The sequence is
/// forward-only and cannot be restarted.
///
/// A session mutably borrows its atlas, so only one can be open at a time.
/// Closing or dropping it runs the atlas page eviction check exactly once,
/// whether or not every glyph was consumed. Descriptors already handed out
/// may refer to evicted pages afterwards.
pub struct Session<'a, F: FontBackend, T: TextureBackend> {
    face: &'a mut Face<F>,
    pages: &'a mut PageManager<T>,
    run: ShapedRun,
    next: usize,
    size: u32,
    dpi: u32,
    closed: bool,
}

impl<'a, F: FontBackend, T: TextureBackend> Session<'a, F, T> {
    pub(crate) fn new(
        face: &'a mut Face<F>,
        pages: &'a mut PageManager<T>,
        run: ShapedRun,
        size: u32,
        dpi: u32,
    ) -> Self {
        debug_assert_eq!(
            run.infos.len(),
            run.positions.len(),
            "shaper output must be index-aligned"
        );
        Self {
            face,
            pages,
            run,
            next: 0,
            size,
            dpi,
            closed: false,
        }
    }

    /// Character size of the session, in points.
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Resolution of the session.
    pub fn dpi(&self) -> u32 {
        self.dpi
    }

    /// Total number of shaped glyphs, consumed or not.
    pub fn glyph_count(&self) -> usize {
        self.run.len()
    }

    /// The shaped glyph ids and clusters.
    pub fn glyph_infos(&self) -> &[GlyphInfo] {
        &self.run.infos
    }

    /// Ends the session and runs the eviction check.
    pub fn close(mut self) {
        self.finish();
    }

    fn finish(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        log::debug!(
            "closing session after {} of {} glyphs",
            self.next,
            self.run.len()
        );
        self.pages.check_clear_pages();
    }

    fn resolve(&mut self, index: usize) -> Result<PositionedGlyph<T::Handle>> {
        let info = self.run.infos[index];
        let position = self.run.positions[index];
        let face = &mut *self.face;
        let record = face.cache.lookup(
            &mut face.rasterizer,
            &mut *self.pages,
            info.glyph_id,
            self.size,
            self.dpi,
        )?;
        Ok(PositionedGlyph {
            glyph_id: info.glyph_id,
            cluster: info.cluster,
            page_index: record.page_index,
            render: RenderDescriptor {
                texture: self.pages.render_handle(record.page_index),
                top: record.top,
                left: record.left,
                bottom: record.bottom,
                right: record.right,
            },
            layout: LayoutDescriptor::new(position, &record),
        })
    }
}

impl<F: FontBackend, T: TextureBackend> Iterator for Session<'_, F, T> {
    type Item = Result<PositionedGlyph<T::Handle>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.closed || self.next >= self.run.len() {
            return None;
        }
        let index = self.next;
        self.next += 1;
        Some(self.resolve(index))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = if self.closed {
            0
        } else {
            self.run.len().saturating_sub(self.next)
        };
        (remaining, Some(remaining))
    }
}

impl<F: FontBackend, T: TextureBackend> ExactSizeIterator for Session<'_, F, T> {}

impl<F: FontBackend, T: TextureBackend> Drop for Session<'_, F, T> {
    fn drop(&mut self) {
        self.finish();
    }
}

impl<F: FontBackend, T: TextureBackend> core::fmt::Debug for Session<'_, F, T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Session")
            .field("glyphs", &self.run.len())
            .field("next", &self.next)
            .field("size", &self.size)
            .field("dpi", &self.dpi)
            .field("closed", &self.closed)
            .finish_non_exhaustive()
    }
}

// Copyright 2025 the Glyph Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::path::Path;

use crate::{
    Error, FontBackend, GlyphBitmap, GlyphInfo, GlyphMetrics, GlyphPosition, RasterizedGlyph,
    Rasterizer, ResourceOrigin, Result, ShapedRun, Shaper, SizeMetrics,
};

/// Shaping offsets every fake glyph gets, in font units.
pub(crate) const SHAPING_X_OFFSET: i32 = 10;
pub(crate) const SHAPING_Y_OFFSET: i32 = -5;

/// Pixel size of the box rendered for `glyph_id`.
///
/// Glyph 0 (what a space shapes to) renders nothing.
pub(crate) fn fake_glyph_size(glyph_id: u32, size: u32, dpi: u32) -> (u32, u32) {
    if glyph_id == 0 {
        return (0, 0);
    }
    let px = size * dpi / 72;
    (px / 2 + glyph_id % 5, px * 3 / 4)
}

/// Font backend producing solid boxes and one glyph per character.
///
/// Paths containing `missing` fail to open, as does empty font data.
#[derive(Debug, Default)]
pub(crate) struct FakeFonts {
    failing: Vec<u32>,
    binds: usize,
}

impl FakeFonts {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Makes every rasterizer opened afterwards fail on `glyph_id`.
    pub(crate) fn with_failing_glyph(mut self, glyph_id: u32) -> Self {
        self.failing.push(glyph_id);
        self
    }

    pub(crate) fn binds(&self) -> usize {
        self.binds
    }
}

impl FontBackend for FakeFonts {
    type Rasterizer = FakeRasterizer;
    type Shaper = FakeShaper;

    fn open_face(&mut self, path: &Path, _face_index: u32) -> Result<FakeRasterizer> {
        if path.to_string_lossy().contains("missing") {
            return Err(Error::resource(
                ResourceOrigin::Font,
                format!("cannot open {}", path.display()),
            ));
        }
        Ok(FakeRasterizer::new(self.failing.clone()))
    }

    fn open_face_data(&mut self, data: Vec<u8>, _face_index: u32) -> Result<FakeRasterizer> {
        if data.is_empty() {
            return Err(Error::resource(ResourceOrigin::Font, "empty font data"));
        }
        Ok(FakeRasterizer::new(self.failing.clone()))
    }

    fn bind_shaper(&mut self, rasterizer: &FakeRasterizer) -> Result<FakeShaper> {
        self.binds += 1;
        Ok(FakeShaper {
            size: rasterizer.size,
            dpi: rasterizer.dpi,
        })
    }
}

#[derive(Debug)]
pub(crate) struct FakeRasterizer {
    failing: Vec<u32>,
    size: u32,
    dpi: u32,
    renders: usize,
}

impl FakeRasterizer {
    fn new(failing: Vec<u32>) -> Self {
        Self {
            failing,
            size: 12,
            dpi: 72,
            renders: 0,
        }
    }

    /// Number of successful `render_glyph` calls.
    pub(crate) fn renders(&self) -> usize {
        self.renders
    }
}

impl Rasterizer for FakeRasterizer {
    fn set_char_size(&mut self, size: u32, dpi: u32) -> Result<()> {
        if size == 0 {
            return Err(Error::resource(ResourceOrigin::Rasterizer, "zero size"));
        }
        self.size = size;
        self.dpi = dpi;
        Ok(())
    }

    fn render_glyph(&mut self, glyph_id: u32) -> Result<RasterizedGlyph> {
        if self.failing.contains(&glyph_id) {
            return Err(Error::resource(
                ResourceOrigin::Rasterizer,
                format!("cannot render glyph {glyph_id}"),
            ));
        }
        self.renders += 1;
        let (width, rows) = fake_glyph_size(glyph_id, self.size, self.dpi);
        let coverage = u8::try_from(glyph_id % 250 + 1).unwrap();
        let (w, h) = (i32::try_from(width).unwrap(), i32::try_from(rows).unwrap());
        Ok(RasterizedGlyph {
            bitmap: GlyphBitmap {
                width,
                rows,
                alpha: vec![coverage; width as usize * rows as usize],
            },
            metrics: GlyphMetrics {
                width: w * 64,
                height: h * 64,
                bearing_x: 64,
                bearing_y: h * 64,
            },
        })
    }

    fn size_metrics(&self) -> SizeMetrics {
        let px = i32::try_from(self.size * self.dpi / 72).unwrap();
        SizeMetrics {
            ascender: px * 64 * 4 / 5,
            descender: -(px * 64 / 5),
            line_height: px * 64 * 6 / 5,
        }
    }
}

#[derive(Debug)]
pub(crate) struct FakeShaper {
    size: u32,
    dpi: u32,
}

impl Shaper<FakeRasterizer> for FakeShaper {
    fn shape(&mut self, _rasterizer: &FakeRasterizer, text: &str) -> Result<ShapedRun> {
        let mut run = ShapedRun::default();
        for (offset, ch) in text.char_indices() {
            let glyph_id = if ch == ' ' { 0 } else { u32::from(ch) };
            let (width, _) = fake_glyph_size(glyph_id, self.size, self.dpi);
            run.push(
                GlyphInfo {
                    glyph_id,
                    cluster: u32::try_from(offset).unwrap(),
                },
                GlyphPosition {
                    x_advance: (i32::try_from(width).unwrap() + 1) * 64,
                    y_advance: 0,
                    x_offset: SHAPING_X_OFFSET,
                    y_offset: SHAPING_Y_OFFSET,
                },
            );
        }
        Ok(run)
    }
}

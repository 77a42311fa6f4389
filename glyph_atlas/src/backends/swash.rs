// Copyright 2025 the Glyph Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Font backend built on [swash](https://docs.rs/swash).

use std::path::Path;

use swash::scale::image::Content;
use swash::scale::{Render, ScaleContext, Source};
use swash::shape::{Direction, ShapeContext};
use swash::text::{Codepoint as _, Script};
use swash::zeno::Format;
use swash::{CacheKey, FontRef};

use crate::font::px_to_font_units;
use crate::{
    DEFAULT_DPI, Error, FontBackend, GlyphBitmap, GlyphInfo, GlyphMetrics, GlyphPosition,
    RasterizedGlyph, Rasterizer, ResourceOrigin, Result, ShapedRun, Shaper, SizeMetrics,
};

/// Opens TrueType/OpenType faces and shapes and rasterizes them with swash.
#[derive(Debug, Default)]
pub struct SwashFonts {
    _private: (),
}

impl SwashFonts {
    /// Creates the backend.
    pub fn new() -> Self {
        Self::default()
    }
}

impl FontBackend for SwashFonts {
    type Rasterizer = SwashRasterizer;
    type Shaper = SwashShaper;

    fn open_face(&mut self, path: &Path, face_index: u32) -> Result<SwashRasterizer> {
        let data = std::fs::read(path).map_err(|err| Error::resource(ResourceOrigin::Font, err))?;
        self.open_face_data(data, face_index)
    }

    fn open_face_data(&mut self, data: Vec<u8>, face_index: u32) -> Result<SwashRasterizer> {
        SwashRasterizer::new(data, face_index)
    }

    fn bind_shaper(&mut self, rasterizer: &SwashRasterizer) -> Result<SwashShaper> {
        Ok(SwashShaper {
            context: ShapeContext::new(),
            px_size: rasterizer.px_size,
        })
    }
}

/// One face loaded into memory, plus the scaler state for it.
pub struct SwashRasterizer {
    data: Vec<u8>,
    offset: u32,
    key: CacheKey,
    context: ScaleContext,
    size: u32,
    dpi: u32,
    px_size: f32,
}

impl SwashRasterizer {
    fn new(data: Vec<u8>, face_index: u32) -> Result<Self> {
        let (offset, key) = {
            let font = FontRef::from_index(&data, face_index as usize).ok_or_else(|| {
                Error::resource(
                    ResourceOrigin::Font,
                    format!("no valid face at index {face_index}"),
                )
            })?;
            (font.offset, font.key)
        };
        let mut rasterizer = Self {
            data,
            offset,
            key,
            context: ScaleContext::new(),
            size: 0,
            dpi: DEFAULT_DPI,
            px_size: 0.0,
        };
        rasterizer.set_char_size(12, DEFAULT_DPI)?;
        Ok(rasterizer)
    }

    /// The face as a swash font reference.
    pub fn font(&self) -> FontRef<'_> {
        FontRef {
            data: &self.data,
            offset: self.offset,
            key: self.key,
        }
    }

    /// Current character size in points.
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Current resolution.
    pub fn dpi(&self) -> u32 {
        self.dpi
    }

    /// Current pixels-per-em.
    pub fn px_size(&self) -> f32 {
        self.px_size
    }
}

impl Rasterizer for SwashRasterizer {
    fn set_char_size(&mut self, size: u32, dpi: u32) -> Result<()> {
        if size == 0 || dpi == 0 {
            return Err(Error::resource(
                ResourceOrigin::Rasterizer,
                format!("invalid character size {size}pt at {dpi}dpi"),
            ));
        }
        self.size = size;
        self.dpi = dpi;
        self.px_size = size as f32 * dpi as f32 / 72.0;
        Ok(())
    }

    fn render_glyph(&mut self, glyph_id: u32) -> Result<RasterizedGlyph> {
        let id = u16::try_from(glyph_id).map_err(|_| {
            Error::resource(
                ResourceOrigin::Rasterizer,
                format!("glyph id {glyph_id} is out of range"),
            )
        })?;
        let font = FontRef {
            data: &self.data,
            offset: self.offset,
            key: self.key,
        };
        let mut scaler = self
            .context
            .builder(font)
            .size(self.px_size)
            .hint(true)
            .build();

        // Outlines without contours (spaces) render nothing.
        let Some(image) = Render::new(&[Source::Outline])
            .format(Format::Alpha)
            .render(&mut scaler, id)
        else {
            return Ok(RasterizedGlyph::default());
        };

        let placement = image.placement;
        let alpha = match image.content {
            Content::Mask => image.data,
            Content::Color | Content::SubpixelMask => {
                image.data.chunks_exact(4).map(|px| px[3]).collect()
            }
        };
        Ok(RasterizedGlyph {
            bitmap: GlyphBitmap {
                width: placement.width,
                rows: placement.height,
                alpha,
            },
            metrics: GlyphMetrics {
                width: px_to_font_units(placement.width as f32),
                height: px_to_font_units(placement.height as f32),
                bearing_x: px_to_font_units(placement.left as f32),
                bearing_y: px_to_font_units(placement.top as f32),
            },
        })
    }

    fn size_metrics(&self) -> SizeMetrics {
        let metrics = self.font().metrics(&[]).scale(self.px_size);
        SizeMetrics {
            ascender: px_to_font_units(metrics.ascent),
            descender: -px_to_font_units(metrics.descent),
            line_height: px_to_font_units(metrics.ascent + metrics.descent + metrics.leading),
        }
    }
}

impl core::fmt::Debug for SwashRasterizer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SwashRasterizer")
            .field("data", &self.data.len())
            .field("offset", &self.offset)
            .field("size", &self.size)
            .field("dpi", &self.dpi)
            .finish_non_exhaustive()
    }
}

/// A shaper bound to the pixel size of a [`SwashRasterizer`].
pub struct SwashShaper {
    context: ShapeContext,
    px_size: f32,
}

impl Shaper<SwashRasterizer> for SwashShaper {
    fn shape(&mut self, rasterizer: &SwashRasterizer, text: &str) -> Result<ShapedRun> {
        let script = text
            .chars()
            .map(|ch| ch.script())
            .find(|&script| real_script(script))
            .unwrap_or(Script::Latin);

        let mut shaper = self
            .context
            .builder(rasterizer.font())
            .script(script)
            .direction(script_direction(script))
            .size(self.px_size)
            .build();
        shaper.add_str(text);

        let mut run = ShapedRun::default();
        shaper.shape_with(|cluster| {
            for glyph in cluster.glyphs {
                run.push(
                    GlyphInfo {
                        glyph_id: glyph.id.into(),
                        cluster: cluster.source.start,
                    },
                    GlyphPosition {
                        x_advance: px_to_font_units(glyph.advance),
                        y_advance: 0,
                        x_offset: px_to_font_units(glyph.x),
                        y_offset: px_to_font_units(glyph.y),
                    },
                );
            }
        });
        Ok(run)
    }
}

impl core::fmt::Debug for SwashShaper {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SwashShaper")
            .field("px_size", &self.px_size)
            .finish_non_exhaustive()
    }
}

/// Direction of the scripts written right to left; everything else runs LTR.
fn script_direction(script: Script) -> Direction {
    match script {
        Script::Arabic | Script::Hebrew | Script::Syriac | Script::Thaana => Direction::RightToLeft,
        _ => Direction::LeftToRight,
    }
}

fn real_script(script: Script) -> bool {
    script != Script::Common && script != Script::Unknown && script != Script::Inherited
}

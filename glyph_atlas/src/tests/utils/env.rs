// Copyright 2025 the Glyph Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::backends::memory::MemoryTextures;
use crate::{AtlasConfig, FontAtlas, GlyphRecord, Page};

use super::FakeFonts;

/// Name of the face every [`TestEnv`] registers.
pub(crate) const FACE: &str = "fake";

/// An atlas over fake fonts and in-memory textures with [`FACE`] registered.
pub(crate) struct TestEnv {
    pub(crate) atlas: FontAtlas<FakeFonts, MemoryTextures>,
}

impl TestEnv {
    pub(crate) fn new(page_size: u32, max_pages: usize) -> Self {
        Self::with_fonts(FakeFonts::new(), page_size, max_pages)
    }

    pub(crate) fn with_fonts(fonts: FakeFonts, page_size: u32, max_pages: usize) -> Self {
        let config = AtlasConfig::default()
            .with_page_size(page_size)
            .with_max_pages(max_pages);
        let mut atlas = FontAtlas::new(fonts, MemoryTextures::new(), config).unwrap();
        atlas.register_face(FACE, "fake.ttf", 0).unwrap();
        Self { atlas }
    }

    /// Glyphs rasterized so far by [`FACE`].
    pub(crate) fn renders(&self) -> usize {
        self.atlas.face(FACE).unwrap().rasterizer().renders()
    }

    pub(crate) fn cached(&self) -> usize {
        self.atlas.face(FACE).unwrap().cache().len()
    }

    pub(crate) fn lookup(&mut self, glyph_id: u32, size: u32) -> GlyphRecord {
        self.atlas.lookup_glyph(FACE, glyph_id, size, None).unwrap()
    }

    /// Shapes `text` with face `face` and resolves every glyph before closing.
    pub(crate) fn run_session(&mut self, face: &str, size: u32, text: &str) {
        let mut session = self.atlas.open_session(face, size, None, text).unwrap();
        for glyph in session.by_ref() {
            glyph.unwrap();
        }
        session.close();
    }

    pub(crate) fn page(&self, page_index: usize) -> &Page {
        self.atlas.pages().page(page_index).unwrap()
    }

    /// Pixel rectangle `(x, y, width, height)` a record covers, border excluded.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "normalized coordinates times the page size are small whole numbers"
    )]
    pub(crate) fn pixel_rect(&self, record: &GlyphRecord) -> (u32, u32, u32, u32) {
        let size = self.atlas.config().page_size as f32;
        let px = |v: f32| (v * size).round() as u32;
        let (x, y) = (px(record.left), px(record.top));
        (x, y, px(record.right) - x, px(record.bottom) - y)
    }
}

// Copyright 2025 the Glyph Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The top-level atlas: face registry, page manager and public entry points.

use std::path::Path;

use hashbrown::HashMap;

use crate::{
    AtlasConfig, Error, Face, FontBackend, GlyphRecord, PageManager, Result, Session, Shaper,
    SizeMetrics, TextureBackend,
};

/// Registry of named faces sharing one set of atlas pages.
///
/// `F` opens faces, rasterizes and shapes; `T` owns the textures mirroring the
/// pages. The atlas owns both, every [`Face`] and the [`PageManager`].
pub struct FontAtlas<F: FontBackend, T: TextureBackend> {
    fonts: F,
    faces: HashMap<String, Face<F>>,
    pages: PageManager<T>,
    config: AtlasConfig,
}

impl<F: FontBackend, T: TextureBackend> FontAtlas<F, T> {
    /// Creates an atlas with no faces and no pages.
    pub fn new(fonts: F, textures: T, config: AtlasConfig) -> Result<Self> {
        let config = config.validated()?;
        Ok(Self {
            fonts,
            faces: HashMap::new(),
            pages: PageManager::new(textures, config.page_size, config.max_pages),
            config,
        })
    }

    /// Registers face `face_index` of the font file at `path` under `name`.
    ///
    /// Fails if `name` is taken or the face cannot be opened; nothing is
    /// registered in either case.
    pub fn register_face(
        &mut self,
        name: &str,
        path: impl AsRef<Path>,
        face_index: u32,
    ) -> Result<()> {
        self.check_name_free(name)?;
        let rasterizer = self.fonts.open_face(path.as_ref(), face_index)?;
        self.insert_face(name, rasterizer)?;
        log::debug!(
            "registered face `{name}` from {} (index {face_index})",
            path.as_ref().display()
        );
        Ok(())
    }

    /// Registers face `face_index` of an in-memory font file under `name`.
    pub fn register_face_data(&mut self, name: &str, data: Vec<u8>, face_index: u32) -> Result<()> {
        self.check_name_free(name)?;
        let rasterizer = self.fonts.open_face_data(data, face_index)?;
        self.insert_face(name, rasterizer)?;
        log::debug!("registered face `{name}` from memory (index {face_index})");
        Ok(())
    }

    fn check_name_free(&self, name: &str) -> Result<()> {
        if self.faces.contains_key(name) {
            return Err(Error::DuplicateFace { name: name.into() });
        }
        Ok(())
    }

    fn insert_face(&mut self, name: &str, rasterizer: F::Rasterizer) -> Result<()> {
        let shaper = self.fonts.bind_shaper(&rasterizer)?;
        self.faces.insert(name.into(), Face::new(rasterizer, shaper));
        Ok(())
    }

    /// Returns `true` if a face named `name` is registered.
    pub fn has_face(&self, name: &str) -> bool {
        self.faces.contains_key(name)
    }

    /// Returns the face named `name`.
    pub fn face(&self, name: &str) -> Option<&Face<F>> {
        self.faces.get(name)
    }

    /// Iterates over the registered face names in no particular order.
    pub fn face_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.faces.keys().map(String::as_str)
    }

    /// Shapes `text` with face `name` at `size` points and returns a session
    /// resolving the shaped glyphs.
    ///
    /// `dpi` defaults to [`AtlasConfig::default_dpi`]. The returned session
    /// borrows the atlas until it is closed or dropped.
    pub fn open_session(
        &mut self,
        name: &str,
        size: u32,
        dpi: Option<u32>,
        text: &str,
    ) -> Result<Session<'_, F, T>> {
        let dpi = dpi.unwrap_or(self.config.default_dpi);
        let face = self
            .faces
            .get_mut(name)
            .ok_or_else(|| Error::unknown_face(name))?;
        face.set_size(&mut self.fonts, size, dpi)?;
        let run = face.shaper.shape(&face.rasterizer, text)?;
        log::debug!(
            "opened session on `{name}` at {size}pt/{dpi}dpi: {} glyphs",
            run.len()
        );
        Ok(Session::new(face, &mut self.pages, run, size, dpi))
    }

    /// Vertical metrics of face `name` at `size` points.
    pub fn size_metrics(&mut self, name: &str, size: u32, dpi: Option<u32>) -> Result<SizeMetrics> {
        let dpi = dpi.unwrap_or(self.config.default_dpi);
        self.faces
            .get_mut(name)
            .ok_or_else(|| Error::unknown_face(name))?
            .size_metrics(size, dpi)
    }

    /// Resolves a single glyph through face `name`'s cache without shaping.
    ///
    /// Unlike a session this never runs the eviction check.
    pub fn lookup_glyph(
        &mut self,
        name: &str,
        glyph_id: u32,
        size: u32,
        dpi: Option<u32>,
    ) -> Result<GlyphRecord> {
        let dpi = dpi.unwrap_or(self.config.default_dpi);
        let face = self
            .faces
            .get_mut(name)
            .ok_or_else(|| Error::unknown_face(name))?;
        face.cache
            .lookup(&mut face.rasterizer, &mut self.pages, glyph_id, size, dpi)
    }

    /// Resets hit/miss statistics of every face's cache.
    pub fn clear_cache_stats(&mut self) {
        for face in self.faces.values_mut() {
            face.cache.clear_stats();
        }
    }

    /// The page manager.
    pub fn pages(&self) -> &PageManager<T> {
        &self.pages
    }

    /// Number of live atlas pages.
    pub fn page_count(&self) -> usize {
        self.pages.page_count()
    }

    /// The texture backend.
    pub fn textures(&self) -> &T {
        self.pages.textures()
    }

    /// The texture backend, mutably.
    pub fn textures_mut(&mut self) -> &mut T {
        self.pages.textures_mut()
    }

    /// The font backend.
    pub fn fonts(&self) -> &F {
        &self.fonts
    }

    /// The configuration the atlas was built with.
    pub fn config(&self) -> &AtlasConfig {
        &self.config
    }
}

impl<F: FontBackend, T: TextureBackend> core::fmt::Debug for FontAtlas<F, T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FontAtlas")
            .field("faces", &self.faces.len())
            .field("pages", &self.pages)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

// Copyright 2025 the Glyph Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Glyph Atlas packs rasterized glyph bitmaps into fixed-size texture pages and
//! caches their placements per font face.
//!
//! A text renderer hands a string to a [`Session`], which shapes it and yields
//! one [`PositionedGlyph`] per glyph: the texture page to sample from, the
//! normalized rectangle inside that page, and the layout metrics needed to
//! place the quad. Glyphs that were seen before are served from the face's
//! [`GlyphCache`] without rasterizing or uploading anything.
//!
//! The crate does not parse fonts, shape text or own GPU memory itself. Those
//! concerns are reached through a few narrow traits:
//!
//! - [`FontBackend`] opens faces and produces a [`Rasterizer`] and a [`Shaper`]
//!   for each of them.
//! - [`TextureBackend`] receives page create/update/destroy calls and hands out
//!   opaque texture handles.
//!
//! ## Features
//!
//! - `swash` (enabled by default): Provides [`backends::swash::SwashFonts`], a
//!   [`FontBackend`] that rasterizes and shapes with [swash].
//! - `png`: Enables [`backends::memory::MemoryTextures::save_png`] for dumping
//!   atlas pages while debugging.
//!
//! ## Example
//!
//! ```no_run
//! use glyph_atlas::backends::memory::MemoryTextures;
//! use glyph_atlas::backends::swash::SwashFonts;
//! use glyph_atlas::{AtlasConfig, FontAtlas};
//!
//! # fn main() -> Result<(), glyph_atlas::Error> {
//! let mut atlas = FontAtlas::new(SwashFonts::new(), MemoryTextures::new(), AtlasConfig::default())?;
//! atlas.register_face("sans", "/usr/share/fonts/TTF/DejaVuSans.ttf", 0)?;
//!
//! for glyph in atlas.open_session("sans", 16, None, "Hello")? {
//!     let glyph = glyph?;
//!     println!("page {} uv {:?}", glyph.render.texture, glyph.render.uv());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! [swash]: https://docs.rs/swash

// LINEBENDER LINT SET - lib.rs - v3
// See https://linebender.org/wiki/canonical-lints/
// These lints shouldn't apply to examples or tests.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
// These lints shouldn't apply to examples.
#![warn(clippy::print_stdout, clippy::print_stderr)]
// Targeting e.g. 32-bit means structs containing usize can give false positives for 64-bit.
#![cfg_attr(target_pointer_width = "64", warn(clippy::trivially_copy_pass_by_ref))]
// END LINEBENDER LINT SET
#![cfg_attr(docsrs, feature(doc_cfg))]

mod atlas;
mod cache;
mod config;
mod error;
mod face;
mod font;
mod packer;
mod page;
mod pages;
mod session;
mod texture;

pub mod backends;

#[cfg(test)]
mod tests;

pub use atlas::FontAtlas;
pub use cache::{GlyphCache, GlyphKey, GlyphRecord};
pub use config::{AtlasConfig, DEFAULT_DPI, DEFAULT_MAX_PAGES, DEFAULT_PAGE_SIZE};
pub use error::{BoxedSource, Error, ErrorKind, ResourceOrigin, Result};
pub use face::Face;
pub use font::{
    FONT_UNITS_PER_PIXEL, FontBackend, GlyphBitmap, GlyphInfo, GlyphMetrics, GlyphPosition,
    RasterizedGlyph, Rasterizer, ShapedRun, Shaper, SizeMetrics,
};
pub use packer::Packer;
pub use page::{CLEAR_PIXEL, Page};
pub use pages::{GLYPH_PADDING, PageManager, Placement};
pub use session::{LayoutDescriptor, PositionedGlyph, RenderDescriptor, Session};
pub use texture::TextureBackend;

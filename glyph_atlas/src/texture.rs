// Copyright 2025 the Glyph Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Texture backend collaborator.

use crate::Result;

/// Owns the device-side copies of atlas pages.
///
/// The atlas keeps the authoritative BGRA8 pixels on the host and mirrors every
/// change through this trait. Pages are addressed by their index in the
/// [`PageManager`](crate::PageManager); indices are reused after eviction.
pub trait TextureBackend {
    /// Opaque reference handed back to callers in render descriptors.
    type Handle: Clone;

    /// Creates the texture for page `page_index` with `width * height * 4`
    /// bytes of initial BGRA8 pixels.
    fn create_texture(
        &mut self,
        page_index: usize,
        width: u32,
        height: u32,
        pixels: &[u8],
    ) -> Result<()>;

    /// Replaces a `width` x `height` rectangle at (`x`, `y`) of page
    /// `page_index` with tightly packed BGRA8 `pixels`.
    fn update_texture(
        &mut self,
        page_index: usize,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        pixels: &[u8],
    ) -> Result<()>;

    /// Releases the texture for page `page_index`.
    ///
    /// Runs while a session is being torn down, so it cannot report failure.
    fn destroy_texture(&mut self, page_index: usize);

    /// Returns the handle callers use to sample page `page_index`.
    fn render_handle(&self, page_index: usize) -> Self::Handle;
}

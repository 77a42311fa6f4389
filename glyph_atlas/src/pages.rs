// Copyright 2025 the Glyph Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Page manager: page selection, on-demand creation and bounded eviction.

use crate::{Error, GlyphBitmap, Page, Result, TextureBackend};

/// Border in pixels added to the right and bottom of every glyph so bilinear
/// sampling never reads a neighbouring glyph.
pub const GLYPH_PADDING: u32 = 1;

/// Where a rectangle was reserved.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Placement {
    /// Index of the page in the manager.
    pub page_index: usize,
    /// Left edge in pixels.
    pub x: u32,
    /// Top edge in pixels.
    pub y: u32,
}

/// Owns every atlas page and mirrors them into a [`TextureBackend`].
///
/// Pages are kept in creation order. New rectangles only ever go to the most
/// recently created page; once it is full a fresh page is appended. When the
/// page count reaches the configured cap, [`check_clear_pages`] drops every
/// page except the first and wipes that one.
///
/// [`check_clear_pages`]: PageManager::check_clear_pages
pub struct PageManager<T: TextureBackend> {
    pages: Vec<Page>,
    page_size: u32,
    max_pages: usize,
    /// Incremented on every eviction; placements from an older generation are stale.
    generation: u64,
    textures: T,
}

impl<T: TextureBackend> PageManager<T> {
    /// Creates an empty manager.
    pub fn new(textures: T, page_size: u32, max_pages: usize) -> Self {
        Self {
            pages: Vec::new(),
            page_size,
            max_pages,
            generation: 0,
            textures,
        }
    }

    /// Reserves a `width` x `height` rectangle, creating a page if the newest
    /// one cannot hold it.
    ///
    /// Only the newest page is tried; older pages are never searched again.
    /// Fails with [`Error::GlyphTooLarge`] when the rectangle exceeds the page
    /// size, in which case no page is created.
    pub fn reserve_space_for_glyph(&mut self, width: u32, height: u32) -> Result<Placement> {
        if let Some(page) = self.pages.last_mut() {
            if let Some((x, y)) = page.reserve(width, height) {
                return Ok(Placement {
                    page_index: self.pages.len() - 1,
                    x,
                    y,
                });
            }
        }

        if width > self.page_size || height > self.page_size {
            return Err(Error::GlyphTooLarge {
                width,
                height,
                page_size: self.page_size,
            });
        }

        let page_index = self.create_page()?;
        let (x, y) = self.pages[page_index]
            .reserve(width, height)
            .ok_or(Error::GlyphTooLarge {
                width,
                height,
                page_size: self.page_size,
            })?;
        Ok(Placement { page_index, x, y })
    }

    /// Allocates a page, creates its texture and appends it.
    ///
    /// The page is only appended once the texture exists.
    fn create_page(&mut self) -> Result<usize> {
        let page_index = self.pages.len();
        let page = Page::new(self.page_size);
        self.textures.create_texture(
            page_index,
            page.width(),
            page.height(),
            page.pixels(),
        )?;
        log::debug!(
            "created atlas page {page_index} ({size}x{size})",
            size = self.page_size
        );
        self.pages.push(page);
        Ok(page_index)
    }

    /// Uploads a coverage bitmap at `placement`, then writes it into the page.
    ///
    /// The host page only changes once the texture update succeeded, so host
    /// and device pixels never disagree. Empty bitmaps issue no upload.
    pub fn upload_glyph(&mut self, placement: Placement, bitmap: &GlyphBitmap) -> Result<()> {
        if bitmap.is_empty() {
            return Ok(());
        }
        let pixels: Vec<u8> = bitmap
            .alpha
            .iter()
            .flat_map(|&alpha| [255, 255, 255, alpha])
            .collect();
        self.textures.update_texture(
            placement.page_index,
            placement.x,
            placement.y,
            bitmap.width,
            bitmap.rows,
            &pixels,
        )?;
        self.pages[placement.page_index].write_coverage(placement.x, placement.y, bitmap);
        Ok(())
    }

    /// Bounds the number of live pages.
    ///
    /// Does nothing while fewer than `max_pages` pages exist. Otherwise every
    /// page but the first is destroyed, and the first is reset to an empty tree
    /// and transparent white pixels. Returns `true` if pages were evicted.
    pub fn check_clear_pages(&mut self) -> bool {
        if self.pages.is_empty() || self.pages.len() < self.max_pages {
            return false;
        }

        let dropped = self.pages.len() - 1;
        for page_index in (1..self.pages.len()).rev() {
            self.textures.destroy_texture(page_index);
        }
        self.pages.truncate(1);

        let first = &mut self.pages[0];
        first.clear();
        // The device copy must match the wiped host pixels.
        let (width, height) = (first.width(), first.height());
        if let Err(err) = self
            .textures
            .update_texture(0, 0, 0, width, height, first.pixels())
        {
            log::warn!("failed to clear atlas page 0 after eviction: {err}");
        }

        self.generation += 1;
        log::info!(
            "evicted {dropped} atlas pages; generation is now {}",
            self.generation
        );
        true
    }

    /// Number of live pages.
    #[inline]
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Returns the page at `page_index`, if it exists.
    pub fn page(&self, page_index: usize) -> Option<&Page> {
        self.pages.get(page_index)
    }

    /// Iterates over live pages in creation order.
    pub fn pages(&self) -> impl ExactSizeIterator<Item = &Page> + '_ {
        self.pages.iter()
    }

    /// Width and height of every page.
    #[inline]
    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// The soft page cap.
    #[inline]
    pub fn max_pages(&self) -> usize {
        self.max_pages
    }

    /// Number of evictions so far.
    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Texture handle for page `page_index`.
    pub fn render_handle(&self, page_index: usize) -> T::Handle {
        self.textures.render_handle(page_index)
    }

    /// The texture backend.
    pub fn textures(&self) -> &T {
        &self.textures
    }

    /// The texture backend, mutably.
    pub fn textures_mut(&mut self) -> &mut T {
        &mut self.textures
    }
}

impl<T: TextureBackend> core::fmt::Debug for PageManager<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PageManager")
            .field("pages", &self.pages.len())
            .field("page_size", &self.page_size)
            .field("max_pages", &self.max_pages)
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}

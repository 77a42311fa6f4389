// Copyright 2025 the Glyph Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Atlas configuration.

use crate::{Error, Result};

/// Default width and height of an atlas page in pixels.
pub const DEFAULT_PAGE_SIZE: u32 = 512;

/// Default soft cap on the number of live atlas pages.
pub const DEFAULT_MAX_PAGES: usize = 64;

/// Resolution used when a caller does not pass one.
pub const DEFAULT_DPI: u32 = 72;

/// Settings fixed for the lifetime of a [`FontAtlas`](crate::FontAtlas).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AtlasConfig {
    /// Width and height of every atlas page, in pixels.
    pub page_size: u32,
    /// Soft cap on live pages; reaching it triggers eviction when a session ends.
    pub max_pages: usize,
    /// Resolution used when a session or lookup does not specify one.
    pub default_dpi: u32,
}

impl AtlasConfig {
    /// Returns the configuration with a different page size.
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Returns the configuration with a different page cap.
    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// Returns the configuration with a different default resolution.
    pub fn with_default_dpi(mut self, default_dpi: u32) -> Self {
        self.default_dpi = default_dpi;
        self
    }

    /// Checks the configuration and normalizes the page cap.
    ///
    /// A cap of zero behaves like a cap of one, since eviction always keeps
    /// one page alive.
    pub(crate) fn validated(mut self) -> Result<Self> {
        if self.page_size == 0 {
            return Err(Error::InvalidConfig {
                reason: "page size must be at least one pixel",
            });
        }
        if self.page_size > u32::from(u16::MAX) {
            return Err(Error::InvalidConfig {
                reason: "page size must not exceed 65535 pixels",
            });
        }
        if self.default_dpi == 0 {
            return Err(Error::InvalidConfig {
                reason: "default dpi must be positive",
            });
        }
        self.max_pages = self.max_pages.max(1);
        Ok(self)
    }
}

impl Default for AtlasConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            max_pages: DEFAULT_MAX_PAGES,
            default_dpi: DEFAULT_DPI,
        }
    }
}

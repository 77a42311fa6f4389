// Copyright 2025 the Glyph Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A texture backend that keeps every page in host memory.

use crate::{Error, ResourceOrigin, Result, TextureBackend};

struct MemoryTexture {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

/// Mirrors atlas pages into plain byte buffers.
///
/// Besides being a usable backend for software renderers, it counts every call
/// it receives and can be told to fail the next create or update, which makes
/// it the backend of choice for tests. Handles are page indices.
#[derive(Default)]
pub struct MemoryTextures {
    textures: Vec<Option<MemoryTexture>>,
    created: usize,
    destroyed: usize,
    updates: Vec<(usize, u32, u32, u32, u32)>,
    update_count: usize,
    fail_create: bool,
    fail_update: bool,
}

impl MemoryTextures {
    /// Creates a backend with no textures.
    pub fn new() -> Self {
        Self::default()
    }

    /// BGRA8 pixels of the texture for page `page_index`, if it exists.
    pub fn texture(&self, page_index: usize) -> Option<&[u8]> {
        self.textures
            .get(page_index)?
            .as_ref()
            .map(|texture| texture.pixels.as_slice())
    }

    /// Number of live textures.
    pub fn live(&self) -> usize {
        self.textures.iter().filter(|t| t.is_some()).count()
    }

    /// Number of successful `create_texture` calls.
    pub fn created(&self) -> usize {
        self.created
    }

    /// Number of `destroy_texture` calls.
    pub fn destroyed(&self) -> usize {
        self.destroyed
    }

    /// Successful `update_texture` calls as `(page, x, y, width, height)`
    /// since the log was last drained.
    ///
    /// The log grows with every upload; long-running callers should drain it
    /// with [`take_updates`](Self::take_updates), typically once per frame.
    pub fn updates(&self) -> &[(usize, u32, u32, u32, u32)] {
        &self.updates
    }

    /// Drains the update log, returning the updates recorded so far.
    pub fn take_updates(&mut self) -> Vec<(usize, u32, u32, u32, u32)> {
        core::mem::take(&mut self.updates)
    }

    /// Number of successful `update_texture` calls, drained or not.
    pub fn update_count(&self) -> usize {
        self.update_count
    }

    /// Makes the next `create_texture` call fail.
    pub fn fail_next_create(&mut self) {
        self.fail_create = true;
    }

    /// Makes the next `update_texture` call fail.
    pub fn fail_next_update(&mut self) {
        self.fail_update = true;
    }

    /// Writes the texture for page `page_index` to a PNG file.
    #[cfg(feature = "png")]
    pub fn save_png(&self, page_index: usize, path: &std::path::Path) -> std::io::Result<()> {
        use std::fs::File;
        use std::io::BufWriter;

        let texture = self
            .textures
            .get(page_index)
            .and_then(Option::as_ref)
            .ok_or_else(|| {
                std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("no texture for atlas page {page_index}"),
                )
            })?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = File::create(path)?;
        let w = BufWriter::new(file);

        let mut encoder = png::Encoder::new(w, texture.width, texture.height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);

        let mut writer = encoder.write_header().map_err(std::io::Error::other)?;

        // BGRA to RGBA.
        let mut rgba = texture.pixels.clone();
        for pixel in rgba.chunks_exact_mut(4) {
            pixel.swap(0, 2);
        }
        writer
            .write_image_data(&rgba)
            .map_err(std::io::Error::other)?;

        Ok(())
    }
}

impl TextureBackend for MemoryTextures {
    type Handle = usize;

    fn create_texture(
        &mut self,
        page_index: usize,
        width: u32,
        height: u32,
        pixels: &[u8],
    ) -> Result<()> {
        if core::mem::take(&mut self.fail_create) {
            return Err(Error::resource(
                ResourceOrigin::Texture,
                "injected texture creation failure",
            ));
        }
        if self.textures.len() <= page_index {
            self.textures.resize_with(page_index + 1, || None);
        }
        self.textures[page_index] = Some(MemoryTexture {
            width,
            height,
            pixels: pixels.to_vec(),
        });
        self.created += 1;
        Ok(())
    }

    fn update_texture(
        &mut self,
        page_index: usize,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        pixels: &[u8],
    ) -> Result<()> {
        if core::mem::take(&mut self.fail_update) {
            return Err(Error::resource(
                ResourceOrigin::Texture,
                "injected texture update failure",
            ));
        }
        let Some(texture) = self.textures.get_mut(page_index).and_then(Option::as_mut) else {
            return Err(Error::resource(
                ResourceOrigin::Texture,
                format!("no texture for atlas page {page_index}"),
            ));
        };
        if x + width > texture.width
            || y + height > texture.height
            || pixels.len() != width as usize * height as usize * 4
        {
            return Err(Error::resource(
                ResourceOrigin::Texture,
                format!("update {width}x{height} at ({x}, {y}) does not fit page {page_index}"),
            ));
        }

        let stride = texture.width as usize * 4;
        let row_len = width as usize * 4;
        for (row, src) in pixels.chunks_exact(row_len.max(1)).enumerate() {
            let start = (y as usize + row) * stride + x as usize * 4;
            texture.pixels[start..start + row_len].copy_from_slice(src);
        }
        self.updates.push((page_index, x, y, width, height));
        self.update_count += 1;
        Ok(())
    }

    fn destroy_texture(&mut self, page_index: usize) {
        if let Some(slot) = self.textures.get_mut(page_index) {
            if slot.take().is_some() {
                self.destroyed += 1;
                return;
            }
        }
        log::warn!("destroying missing texture for atlas page {page_index}");
    }

    fn render_handle(&self, page_index: usize) -> usize {
        page_index
    }
}

impl core::fmt::Debug for MemoryTextures {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("MemoryTextures")
            .field("live", &self.live())
            .field("created", &self.created)
            .field("destroyed", &self.destroyed)
            .field("updates", &self.update_count)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[test]
    fn updates_land_in_the_right_rows() {
        let mut textures = MemoryTextures::new();
        textures.create_texture(0, 4, 4, &[0; 64]).unwrap();
        textures.update_texture(0, 1, 2, 2, 1, &[1, 2, 3, 4, 5, 6, 7, 8]).unwrap();
        let pixels = textures.texture(0).unwrap();
        let row = 2 * 16;
        assert_eq!(&pixels[row + 4..row + 12], &[1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(pixels.iter().filter(|&&b| b != 0).count(), 8);
    }

    #[test]
    fn out_of_bounds_update_is_rejected() {
        let mut textures = MemoryTextures::new();
        textures.create_texture(0, 4, 4, &[0; 64]).unwrap();
        let err = textures.update_texture(0, 3, 0, 2, 1, &[0; 8]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Resource);
        assert!(textures.updates().is_empty());
    }

    #[test]
    fn injected_failures_fire_once() {
        let mut textures = MemoryTextures::new();
        textures.fail_next_create();
        assert!(textures.create_texture(0, 1, 1, &[0; 4]).is_err());
        textures.create_texture(0, 1, 1, &[0; 4]).unwrap();

        textures.fail_next_update();
        assert!(textures.update_texture(0, 0, 0, 1, 1, &[9; 4]).is_err());
        textures.update_texture(0, 0, 0, 1, 1, &[9; 4]).unwrap();
        assert_eq!(textures.created(), 1);
        assert_eq!(textures.updates().len(), 1);
    }

    #[test]
    fn taking_updates_drains_the_log_but_not_the_count() {
        let mut textures = MemoryTextures::new();
        textures.create_texture(0, 2, 2, &[0; 16]).unwrap();
        textures.update_texture(0, 0, 0, 1, 1, &[1; 4]).unwrap();
        textures.update_texture(0, 1, 1, 1, 1, &[2; 4]).unwrap();

        assert_eq!(textures.take_updates(), [(0, 0, 0, 1, 1), (0, 1, 1, 1, 1)]);
        assert!(textures.updates().is_empty());
        assert!(textures.take_updates().is_empty());

        textures.update_texture(0, 1, 0, 1, 1, &[3; 4]).unwrap();
        assert_eq!(textures.updates(), [(0, 1, 0, 1, 1)]);
        assert_eq!(textures.update_count(), 3);
    }

    #[test]
    fn destroyed_textures_are_gone_and_indices_reusable() {
        let mut textures = MemoryTextures::new();
        textures.create_texture(0, 1, 1, &[0; 4]).unwrap();
        textures.create_texture(1, 1, 1, &[0; 4]).unwrap();
        textures.destroy_texture(1);
        assert!(textures.texture(1).is_none());
        assert_eq!(textures.live(), 1);
        textures.create_texture(1, 1, 1, &[1; 4]).unwrap();
        assert_eq!(textures.texture(1), Some(&[1, 1, 1, 1][..]));
        assert_eq!(textures.destroyed(), 1);
    }
}

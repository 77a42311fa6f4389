// Copyright 2025 the Glyph Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::{CLEAR_PIXEL, ErrorKind, GLYPH_PADDING};

use super::utils::{FACE, FakeFonts, TestEnv, fake_glyph_size};

const A: u32 = 'a' as u32;
const B: u32 = 'b' as u32;

#[test]
fn repeated_lookup_rasterizes_and_uploads_once() {
    let mut env = TestEnv::new(512, 4);
    let first = env.lookup(A, 16);
    let second = env.lookup(A, 16);

    assert_eq!(first, second);
    assert_eq!(first.top.to_bits(), second.top.to_bits());
    assert_eq!(first.right.to_bits(), second.right.to_bits());
    assert_eq!(env.renders(), 1);
    assert_eq!(env.atlas.textures().updates().len(), 1);

    let cache = env.atlas.face(FACE).unwrap().cache();
    assert_eq!(cache.cache_hits(), 1);
    assert_eq!(cache.cache_misses(), 1);
}

#[test]
fn sizes_are_cached_independently() {
    let mut env = TestEnv::new(512, 4);
    let small = env.lookup(A, 16);
    let large = env.lookup(A, 24);

    assert_eq!(env.renders(), 2);
    assert_eq!(env.cached(), 2);
    assert_ne!(env.pixel_rect(&small), env.pixel_rect(&large));
    assert!(large.metrics.height > small.metrics.height);
}

#[test]
fn resolution_is_part_of_the_key() {
    let mut env = TestEnv::new(512, 4);
    let at_72 = env.atlas.lookup_glyph(FACE, A, 16, Some(72)).unwrap();
    let at_144 = env.atlas.lookup_glyph(FACE, A, 16, Some(144)).unwrap();
    assert_eq!(env.renders(), 2);
    assert_eq!(at_144.metrics.height, at_72.metrics.height * 2);

    // No dpi means the configured default.
    assert_eq!(env.lookup(A, 16), at_72);
    assert_eq!(env.renders(), 2);
}

#[test]
fn first_glyph_sits_at_the_page_origin() {
    let mut env = TestEnv::new(512, 4);
    let record = env.lookup(A, 32);
    let (width, rows) = fake_glyph_size(A, 32, 72);

    assert_eq!(record.page_index, 0);
    assert_eq!(record.left, 0.0);
    assert_eq!(record.top, 0.0);
    assert_eq!(record.right, width as f32 / 512.0);
    assert_eq!(record.bottom, rows as f32 / 512.0);
    assert_eq!(env.pixel_rect(&record), (0, 0, width, rows));
}

#[test]
fn glyphs_keep_a_clear_border() {
    let mut env = TestEnv::new(512, 4);
    let records = [env.lookup(A, 32), env.lookup(B, 32)];
    let page = env.page(0);
    let occupied = page.packer().occupied_rects(512, 512);
    assert_eq!(occupied.len(), 2);

    for record in &records {
        let (x, y, w, h) = env.pixel_rect(record);
        assert!(occupied.contains(&(x, y, w + GLYPH_PADDING, h + GLYPH_PADDING)));

        // Right column and bottom row of the padded box stay clear.
        let right = page.copy_rect(x + w, y, 1, h + 1);
        let bottom = page.copy_rect(x, y + h, w + 1, 1);
        assert!(right.chunks_exact(4).all(|p| p == CLEAR_PIXEL));
        assert!(bottom.chunks_exact(4).all(|p| p == CLEAR_PIXEL));

        let inside = page.copy_rect(x, y, w, h);
        assert!(inside.chunks_exact(4).all(|p| p[..3] == [255, 255, 255] && p[3] != 0));
    }
}

#[test]
fn uploads_cover_exactly_the_glyph() {
    let mut env = TestEnv::new(512, 4);
    let record = env.lookup(B, 20);
    let (x, y, w, h) = env.pixel_rect(&record);
    assert_eq!(env.atlas.textures().updates(), &[(0, x, y, w, h)]);

    let texture = env.atlas.textures().texture(0).unwrap();
    assert_eq!(texture, env.page(0).pixels());
}

#[test]
fn empty_glyph_reserves_a_slot_without_uploading() {
    let mut env = TestEnv::new(512, 4);
    let record = env.lookup(0, 16);

    assert_eq!(env.atlas.page_count(), 1);
    assert_eq!(env.atlas.textures().created(), 1);
    assert!(env.atlas.textures().updates().is_empty());
    assert_eq!(record.left, record.right);
    assert_eq!(record.top, record.bottom);
    assert_eq!(env.page(0).packer().occupied_rects(512, 512), vec![(0, 0, 1, 1)]);

    env.lookup(0, 16);
    assert_eq!(env.renders(), 1);
}

#[test]
fn rasterizer_failure_commits_nothing() {
    let fonts = FakeFonts::new().with_failing_glyph(B);
    let mut env = TestEnv::with_fonts(fonts, 512, 4);

    let err = env.atlas.lookup_glyph(FACE, B, 16, None).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Resource);
    assert_eq!(env.cached(), 0);
    assert_eq!(env.atlas.page_count(), 0);

    // The failure is not cached either.
    assert!(env.atlas.lookup_glyph(FACE, B, 16, None).is_err());
    assert_eq!(env.atlas.face(FACE).unwrap().cache().cache_misses(), 2);

    env.lookup(A, 16);
    assert_eq!(env.cached(), 1);
}

#[test]
fn oversized_glyph_is_a_capacity_error() {
    let mut env = TestEnv::new(64, 4);
    let err = env.atlas.lookup_glyph(FACE, A, 200, None).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Capacity);
    assert_eq!(env.cached(), 0);
    assert_eq!(env.atlas.page_count(), 0);

    env.lookup(A, 16);
    assert_eq!(env.atlas.page_count(), 1);
}

#[test]
fn glyph_filling_the_page_exactly_fits() {
    // 'd' is 100 and renders px / 2 wide, px * 3 / 4 tall.
    let d = 'd' as u32;
    let (w, h) = fake_glyph_size(d, 84, 72);
    assert_eq!((w + 1, h + 1), (43, 64));

    let mut env = TestEnv::new(64, 4);
    let record = env.lookup(d, 84);
    assert_eq!(record.bottom, 63.0 / 64.0);
    assert_eq!(env.atlas.page_count(), 1);
}

#[test]
fn stats_reset_without_dropping_entries() {
    let mut env = TestEnv::new(512, 4);
    env.lookup(A, 16);
    env.lookup(A, 16);
    env.atlas.clear_cache_stats();
    env.lookup(A, 16);

    let cache = env.atlas.face(FACE).unwrap().cache();
    assert_eq!(cache.cache_hits(), 1);
    assert_eq!(cache.cache_misses(), 0);
    assert_eq!(cache.len(), 1);
}

#[test]
fn failed_upload_leaves_host_and_device_in_sync() {
    let mut env = TestEnv::new(512, 4);
    env.lookup(B, 16);
    env.atlas.textures_mut().fail_next_update();

    let err = env.atlas.lookup_glyph(FACE, A, 16, None).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Resource);
    assert_eq!(env.cached(), 1);
    assert_eq!(env.atlas.textures().updates().len(), 1);
    assert_eq!(env.atlas.textures().texture(0).unwrap(), env.page(0).pixels());

    // A retry rasterizes again and lands in a fresh slot.
    let record = env.lookup(A, 16);
    assert_eq!(env.renders(), 3);
    assert_eq!(env.cached(), 2);
    assert_eq!(env.atlas.textures().texture(0).unwrap(), env.page(0).pixels());
    let (x, y, w, h) = env.pixel_rect(&record);
    assert!(env.page(0).copy_rect(x, y, w, h).chunks_exact(4).all(|p| p[3] != 0));
}

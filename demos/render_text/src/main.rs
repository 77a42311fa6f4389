// Copyright 2025 the Glyph Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shapes a string with a font file, resolves every glyph through a
//! [`FontAtlas`] and writes each live atlas page to a PNG file.
//!
//! ```text
//! cargo run -p render_text -- <font-file> [text] [size]
//! ```
//!
//! Pages are written to `demos/render_text/_output/page_<index>.png`. Set
//! `RUST_LOG=glyph_atlas=trace` to watch cache hits and misses.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use glyph_atlas::backends::memory::MemoryTextures;
use glyph_atlas::backends::swash::SwashFonts;
use glyph_atlas::{AtlasConfig, FONT_UNITS_PER_PIXEL, FontAtlas};

const FACE: &str = "demo";
const DEFAULT_TEXT: &str = "Sphinx of black quartz, judge my vow.";
const DEFAULT_SIZE: u32 = 24;

fn main() -> ExitCode {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let Some(font_path) = args.next() else {
        eprintln!("usage: render_text <font-file> [text] [size]");
        return ExitCode::FAILURE;
    };
    let text = args.next().unwrap_or_else(|| DEFAULT_TEXT.to_owned());
    let size = match args.next().map(|s| s.parse::<u32>()) {
        None => DEFAULT_SIZE,
        Some(Ok(size)) => size,
        Some(Err(err)) => {
            eprintln!("invalid size: {err}");
            return ExitCode::FAILURE;
        }
    };

    match run(Path::new(&font_path), &text, size) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("render_text: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(font_path: &Path, text: &str, size: u32) -> Result<(), Box<dyn std::error::Error>> {
    // Small pages so that longer strings spill over several of them.
    let config = AtlasConfig::default().with_page_size(256).with_max_pages(8);
    let mut atlas = FontAtlas::new(SwashFonts::new(), MemoryTextures::new(), config)?;
    atlas.register_face(FACE, font_path, 0)?;

    let metrics = atlas.size_metrics(FACE, size, None)?;
    println!(
        "ascender {:.1}px, descender {:.1}px, line height {:.1}px",
        px(metrics.ascender),
        px(metrics.descender),
        px(metrics.line_height)
    );

    let mut pen_x = 0;
    for glyph in atlas.open_session(FACE, size, None, text)? {
        let glyph = glyph?;
        let [left, top, right, bottom] = glyph.render.uv();
        println!(
            "glyph {:>5} @ {:>7.1}px  page {}  uv [{left:.4}, {top:.4}, {right:.4}, {bottom:.4}]",
            glyph.glyph_id,
            px(pen_x + glyph.layout.x_offset),
            glyph.render.texture,
        );
        pen_x += glyph.layout.x_advance;
    }
    // Reaching the page cap would have wiped everything but an empty page 0.
    if atlas.pages().generation() > 0 {
        log::warn!("atlas pages were evicted; use a shorter text or smaller size");
    }
    let uploads = atlas.textures_mut().take_updates();
    log::debug!("{} texture uploads this run", uploads.len());

    let out_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("_output");
    for page_index in 0..atlas.page_count() {
        let path = out_dir.join(format!("page_{page_index}.png"));
        atlas.textures().save_png(page_index, &path)?;
        println!("wrote {}", path.display());
    }

    if let Some(cache) = atlas.face(FACE).map(|face| face.cache()) {
        log::info!(
            "{} glyphs cached, {} hits, {} misses",
            cache.len(),
            cache.cache_hits(),
            cache.cache_misses()
        );
    }
    Ok(())
}

fn px(font_units: i32) -> f32 {
    font_units as f32 / FONT_UNITS_PER_PIXEL as f32
}

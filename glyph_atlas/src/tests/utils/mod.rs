// Copyright 2025 the Glyph Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

mod env;
mod fake_fonts;

pub(crate) use env::{FACE, TestEnv};
pub(crate) use fake_fonts::{FakeFonts, SHAPING_X_OFFSET, SHAPING_Y_OFFSET, fake_glyph_size};

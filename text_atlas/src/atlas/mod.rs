// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Glyph atlas packing and location caching.
//!
//! This module provides:
//! - [`RectanglePack`], an online shelf packer that never moves placed rectangles
//! - [`AtlasKey`], the identity of a glyph's appearance under one paint pass
//! - [`Atlas`], which groups glyphs into [`TextRun`]s, packs them and rasterizes the
//!   resulting texture once
//! - [`TextAtlas`], which splits glyphs into a mask atlas and a color atlas

mod cache;
mod key;
mod pack;
mod run;
mod text_atlas;

pub use cache::Atlas;
pub use key::AtlasKey;
pub use pack::{RectanglePack, GLYPH_PADDING};
pub use run::TextRun;
pub use text_atlas::TextAtlas;

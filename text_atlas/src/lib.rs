// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Text Atlas packs many independently styled glyphs into shared texture atlases.
//!
//! A renderer that has to draw large volumes of text can resolve a text source once into a
//! [`TextAtlas`], which groups the glyphs by style, packs one rectangle per glyph and paint
//! pass into a mask atlas (monochrome glyphs) and a color atlas (glyphs whose typeface has
//! intrinsic color, such as emoji), and rasterizes each atlas into a texture the first time it
//! is drawn. Every later frame only looks up atlas locations and issues a single batched
//! [`Canvas::draw_atlas`] call per atlas, see [`Text::draw`].
//!
//! The crate does not shape text or rasterize glyph outlines itself. Shaping is provided
//! through [`GlyphBuilder`] and rasterization through the [`RenderTarget`] and [`Surface`]
//! traits. The [`renderers::recording`] backend records draw calls and is useful for
//! inspection and tests.
//!
//! Loaded typefaces can be retained in a [`TypefaceCache`], which evicts only typefaces that
//! nothing outside the cache still references.

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

pub use peniko::{color, kurbo, Color};

mod document;
mod glyph;
mod math;
mod render;
mod text;
mod typeface_cache;

pub mod atlas;
pub mod renderers;

#[cfg(test)]
mod testing;

pub use atlas::{Atlas, AtlasKey, RectanglePack, TextAtlas, TextRun, GLYPH_PADDING};
pub use document::{GlyphBuilder, Keyframe, Property, TextDocument, TextPaint};
pub use glyph::{Font, Glyph, GlyphHandle, GlyphId, PaintStyle, StyleKey, TextStyle, Typeface};
pub use render::{
    AtlasDraw, Canvas, Paint, RenderTarget, Surface, Texture, TextureFormat, TextureId,
};
pub use text::Text;
pub use typeface_cache::{TypefaceCache, TYPEFACE_CACHE_CAPACITY};

// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mask and color atlases for one source text.

use core::cmp::Ordering;
use std::sync::Arc;

use log::debug;

use super::cache::Atlas;
use crate::document::glyphs_from_source_text;
use crate::kurbo::Rect;
use crate::{
    Glyph, GlyphBuilder, GlyphHandle, PaintStyle, Property, RenderTarget, TextDocument, Texture,
};

/// The packed atlases of every glyph a source text can display.
///
/// Glyphs of typefaces without intrinsic color go into a single-channel mask atlas, color
/// glyphs (e.g. emoji) into a full-color atlas. Either atlas is absent when it would be empty.
#[derive(Debug)]
pub struct TextAtlas {
    mask_atlas: Option<Atlas>,
    color_atlas: Option<Atlas>,
}

impl TextAtlas {
    /// Builds the atlases for every value `source_text` takes on a keyframe boundary.
    ///
    /// For animated text that is the start value of the first keyframe and the end value of
    /// every keyframe, so each state the text can be rendered in is packed up front. Returns
    /// `None` if no glyphs are produced.
    pub fn make(source_text: &Property<TextDocument>, builder: &impl GlyphBuilder) -> Option<Self> {
        Self::from_glyphs(glyphs_from_source_text(source_text, builder))
    }

    /// Builds the atlases from already resolved glyphs.
    ///
    /// Glyphs are packed largest first. Returns `None` if `glyphs` is empty.
    pub fn from_glyphs(mut glyphs: Vec<GlyphHandle>) -> Option<Self> {
        if glyphs.is_empty() {
            return None;
        }
        glyphs.sort_by(|a, b| compare_by_size(a, b));
        let (color_glyphs, mask_glyphs): (Vec<_>, Vec<_>) =
            glyphs.into_iter().partition(|glyph| glyph.font().has_color());
        debug!(
            "building text atlas from {} mask and {} color glyphs",
            mask_glyphs.len(),
            color_glyphs.len()
        );
        Some(Self {
            mask_atlas: Atlas::make(&mask_glyphs, true),
            color_atlas: Atlas::make(&color_glyphs, false),
        })
    }

    /// Returns the rectangle of `glyph` drawn with the `style` pass, looked up in the atlas
    /// matching the glyph's typeface.
    pub fn location(&self, glyph: &Glyph, style: PaintStyle) -> Option<Rect> {
        self.atlas_for(glyph)?.location(glyph, style)
    }

    /// Rasterizes both atlases on surfaces allocated from `target`.
    ///
    /// Once an atlas texture exists this does nothing.
    pub fn draw<R: RenderTarget>(&mut self, target: &mut R) {
        if self.has_texture() {
            return;
        }
        if let Some(atlas) = &mut self.mask_atlas {
            atlas.draw(target);
        }
        if let Some(atlas) = &mut self.color_atlas {
            atlas.draw(target);
        }
    }

    /// The mask atlas, if any glyph lacks intrinsic color.
    #[inline]
    pub fn mask_atlas(&self) -> Option<&Atlas> {
        self.mask_atlas.as_ref()
    }

    /// The color atlas, if any glyph has intrinsic color.
    #[inline]
    pub fn color_atlas(&self) -> Option<&Atlas> {
        self.color_atlas.as_ref()
    }

    /// The mask atlas texture once it has been rasterized.
    pub fn mask_atlas_texture(&self) -> Option<Arc<Texture>> {
        self.mask_atlas.as_ref()?.texture().cloned()
    }

    /// The color atlas texture once it has been rasterized.
    pub fn color_atlas_texture(&self) -> Option<Arc<Texture>> {
        self.color_atlas.as_ref()?.texture().cloned()
    }

    fn atlas_for(&self, glyph: &Glyph) -> Option<&Atlas> {
        if glyph.font().has_color() {
            self.color_atlas.as_ref()
        } else {
            self.mask_atlas.as_ref()
        }
    }

    fn has_texture(&self) -> bool {
        [&self.mask_atlas, &self.color_atlas]
            .into_iter()
            .flatten()
            .any(|atlas| atlas.texture().is_some())
    }
}

/// Orders glyphs by descending bounds area, then width, then height.
fn compare_by_size(a: &Glyph, b: &Glyph) -> Ordering {
    let (a, b) = (a.bounds(), b.bounds());
    b.area()
        .total_cmp(&a.area())
        .then_with(|| b.width().total_cmp(&a.width()))
        .then_with(|| b.height().total_cmp(&a.height()))
}

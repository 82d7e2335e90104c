// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A packed glyph atlas with a lazily rasterized texture.

use core::fmt::{Debug, Formatter};
use std::sync::Arc;

use hashbrown::HashMap;
use log::{debug, trace, warn};

use super::key::AtlasKey;
use super::pack::RectanglePack;
use super::run::TextRun;
use crate::kurbo::Rect;
use crate::{Canvas, Glyph, GlyphHandle, PaintStyle, RenderTarget, StyleKey, Surface, Texture};

/// Glyphs packed into one texture region, addressable by [`AtlasKey`].
///
/// The layout is computed once by [`Atlas::make`]. The texture is rasterized by the first
/// [`Atlas::draw`] and reused by every later one; an atlas is never rebuilt.
pub struct Atlas {
    alpha_only: bool,
    width: u32,
    height: u32,
    text_runs: Vec<TextRun>,
    glyph_locators: HashMap<AtlasKey, Rect>,
    texture: Option<Arc<Texture>>,
}

impl Atlas {
    /// Packs `glyphs` into a new atlas.
    ///
    /// Glyphs are grouped into [`TextRun`]s by [`StyleKey`] in order of first appearance, and
    /// packed in that order, so callers should sort larger glyphs first. An `alpha_only` atlas
    /// is rasterized into a single-channel texture.
    ///
    /// Returns `None` if `glyphs` is empty.
    pub fn make(glyphs: &[GlyphHandle], alpha_only: bool) -> Option<Self> {
        if glyphs.is_empty() {
            return None;
        }
        let mut group_index: HashMap<StyleKey, usize> = HashMap::new();
        let mut groups: Vec<Vec<&Glyph>> = Vec::new();
        for glyph in glyphs {
            let index = *group_index
                .entry(glyph.compute_style_key())
                .or_insert_with(|| {
                    groups.push(Vec::new());
                    groups.len() - 1
                });
            groups[index].push(glyph.as_ref());
        }

        let mut pack = RectanglePack::new();
        let mut glyph_locators = HashMap::new();
        let text_runs: Vec<_> = groups
            .iter()
            .filter_map(|group| TextRun::build(group, &mut pack, &mut glyph_locators))
            .collect();
        debug!(
            "packed {} glyphs into {} runs, {}x{} atlas with {} entries",
            glyphs.len(),
            text_runs.len(),
            pack.width(),
            pack.height(),
            glyph_locators.len()
        );

        Some(Self {
            alpha_only,
            width: pack.width(),
            height: pack.height(),
            text_runs,
            glyph_locators,
            texture: None,
        })
    }

    /// Width of the packed region in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height of the packed region in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Whether the atlas is rasterized into a single-channel texture.
    #[inline]
    pub fn is_alpha_only(&self) -> bool {
        self.alpha_only
    }

    /// The batches the atlas is rasterized from.
    #[inline]
    pub fn text_runs(&self) -> &[TextRun] {
        &self.text_runs
    }

    /// Number of distinct glyph appearances in the atlas.
    #[inline]
    pub fn len(&self) -> usize {
        self.glyph_locators.len()
    }

    /// Whether the atlas holds no glyphs.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.glyph_locators.is_empty()
    }

    /// The rasterized texture, if [`Atlas::draw`] has built it.
    #[inline]
    pub fn texture(&self) -> Option<&Arc<Texture>> {
        self.texture.as_ref()
    }

    /// Returns the rectangle of `glyph` drawn with the `style` pass.
    ///
    /// `None` means the atlas doesn't contain that appearance, e.g. because the glyph isn't
    /// stroked.
    pub fn location(&self, glyph: &Glyph, style: PaintStyle) -> Option<Rect> {
        self.glyph_locators
            .get(&AtlasKey::new(glyph, style))
            .copied()
    }

    /// Rasterizes the atlas texture on a surface allocated from `target`.
    ///
    /// Does nothing if the atlas is empty or its texture has already been built.
    pub fn draw<R: RenderTarget>(&mut self, target: &mut R) {
        if self.text_runs.is_empty() || self.texture.is_some() {
            return;
        }
        let Some(mut surface) = target.make_surface(self.width, self.height, self.alpha_only)
        else {
            warn!(
                "failed to allocate a {}x{} atlas surface",
                self.width, self.height
            );
            return;
        };
        trace!(
            "rasterizing {} runs into a {}x{} atlas (alpha only: {})",
            self.text_runs.len(),
            self.width,
            self.height,
            self.alpha_only
        );
        let canvas = surface.canvas();
        draw_text_runs(canvas, &self.text_runs, 0);
        draw_text_runs(canvas, &self.text_runs, 1);
        self.texture = surface.into_texture();
        if self.texture.is_none() {
            warn!("atlas surface produced no texture");
        }
    }
}

impl Debug for Atlas {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Atlas")
            .field("alpha_only", &self.alpha_only)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("text_runs", &self.text_runs.len())
            .field("glyph_locators", &self.glyph_locators.len())
            .field("texture", &self.texture)
            .finish()
    }
}

/// Draws the pass at `paint_index` of every run, restoring the canvas transform around each run.
fn draw_text_runs(canvas: &mut impl Canvas, text_runs: &[TextRun], paint_index: usize) {
    let base = canvas.matrix();
    for run in text_runs {
        let Some(paint) = &run.paints()[paint_index] else {
            continue;
        };
        canvas.set_matrix(base);
        canvas.concat(run.matrix());
        canvas.draw_glyphs(run.glyph_ids(), run.positions(paint_index), run.font(), paint);
    }
    canvas.set_matrix(base);
}

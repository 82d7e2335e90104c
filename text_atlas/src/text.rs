// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drawing text from its atlases.

use crate::kurbo::{Affine, Rect};
use crate::math::invert_or_identity;
use crate::{AtlasDraw, Canvas, Color, GlyphHandle, PaintStyle, RenderTarget, TextAtlas};

/// A text graphic: a list of glyphs drawn as textured quads out of a [`TextAtlas`].
#[derive(Clone, Debug)]
pub struct Text {
    glyphs: Vec<GlyphHandle>,
    bounds: Rect,
    has_alpha: bool,
}

impl Text {
    /// Creates a text graphic from `glyphs`.
    ///
    /// Unless `calculated_bounds` is given, the bounds are the union of every glyph's bounds
    /// mapped through its layout transform. Either way they are outset by the widest stroke.
    /// Returns `None` if `glyphs` is empty.
    pub fn make_from(glyphs: Vec<GlyphHandle>, calculated_bounds: Option<Rect>) -> Option<Self> {
        if glyphs.is_empty() {
            return None;
        }
        let mut union: Option<Rect> = None;
        let mut max_stroke_width = 0.0_f32;
        let mut has_alpha = false;
        for glyph in &glyphs {
            if calculated_bounds.is_none() {
                let mapped = glyph.matrix().transform_rect_bbox(glyph.bounds());
                union = Some(union.map_or(mapped, |bounds| bounds.union(mapped)));
            }
            max_stroke_width = max_stroke_width.max(glyph.stroke_width());
            has_alpha |= glyph.alpha() < 1.0;
        }
        let outset = f64::from(max_stroke_width);
        let bounds = calculated_bounds
            .or(union)
            .unwrap_or_default()
            .inflate(outset, outset);
        Some(Self {
            glyphs,
            bounds,
            has_alpha,
        })
    }

    /// The glyphs of the text.
    #[inline]
    pub fn glyphs(&self) -> &[GlyphHandle] {
        &self.glyphs
    }

    /// Conservative bounds of everything the text draws.
    #[inline]
    pub fn measure_bounds(&self) -> Rect {
        self.bounds
    }

    /// Whether any glyph is translucent.
    #[inline]
    pub fn has_alpha(&self) -> bool {
        self.has_alpha
    }

    /// Draws the text onto `canvas`, building the atlas textures first if needed.
    ///
    /// Mask glyphs are drawn in one batch tinted with their fill or stroke colors, color
    /// glyphs in a second batch with their own colors.
    pub fn draw<R: RenderTarget>(&self, canvas: &mut R, atlas: &mut TextAtlas) {
        atlas.draw(canvas);
        self.draw_batch(canvas, atlas, false);
        self.draw_batch(canvas, atlas, true);
    }

    fn draw_batch(&self, canvas: &mut impl Canvas, atlas: &TextAtlas, color_glyphs: bool) {
        let texture = if color_glyphs {
            atlas.color_atlas_texture()
        } else {
            atlas.mask_atlas_texture()
        };
        let Some(texture) = texture else {
            return;
        };

        let mut transforms = Vec::new();
        let mut rects = Vec::new();
        let mut colors = Vec::new();
        let mut alphas = Vec::new();
        for glyph in &self.glyphs {
            if !glyph.is_visible() || glyph.font().has_color() != color_glyphs {
                continue;
            }
            let origin_bounds =
                invert_or_identity(glyph.extra_matrix()).transform_rect_bbox(glyph.bounds());
            for style in glyph.paint_styles() {
                let Some(location) = atlas.location(glyph, style) else {
                    continue;
                };
                if location.width() <= 0.0 || location.height() <= 0.0 {
                    continue;
                }
                let (stroke_width, color): (f64, Color) = match style {
                    PaintStyle::Fill => (0.0, glyph.fill_color()),
                    PaintStyle::Stroke => {
                        (f64::from(glyph.stroke_width()), glyph.stroke_color())
                    }
                };
                let scale_x = (origin_bounds.width() + stroke_width * 2.0) / location.width();
                let scale_y = (origin_bounds.height() + stroke_width * 2.0) / location.height();
                let transform = glyph.total_matrix()
                    * Affine::translate((
                        origin_bounds.x0 - stroke_width,
                        origin_bounds.y0 - stroke_width,
                    ))
                    * Affine::scale_non_uniform(scale_x, scale_y);
                transforms.push(transform);
                rects.push(location);
                colors.push(color);
                alphas.push(glyph.alpha());
            }
        }
        if transforms.is_empty() {
            return;
        }
        canvas.draw_atlas(&AtlasDraw {
            texture: &texture,
            transforms: &transforms,
            rects: &rects,
            colors: (!color_glyphs).then_some(&colors[..]),
            alphas: &alphas,
        });
    }
}

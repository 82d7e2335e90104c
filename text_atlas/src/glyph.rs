// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Styled glyphs as they are consumed by the atlas.

use core::fmt::Debug;
use std::sync::Arc;

use smallvec::{smallvec, SmallVec};

use crate::kurbo::{Affine, Rect};
use crate::math::without_translation;
use crate::{Color, TextPaint};

/// The font-specific identifier of a glyph.
///
/// This is the glyph index within the font, *not* a Unicode code point.
pub type GlyphId = u16;

/// A glyph shared between the source glyph list and every structure that indexes it.
pub type GlyphHandle = Arc<Glyph>;

/// A loaded font resource.
///
/// Typefaces are shared as `Arc<dyn Typeface>`; see [`TypefaceCache`](crate::TypefaceCache)
/// for retaining them between lookups.
pub trait Typeface: Debug + Send + Sync {
    /// An identifier that is unique among all live typefaces.
    fn unique_id(&self) -> u32;

    /// The family name, e.g. "Noto Sans".
    fn font_family(&self) -> &str;

    /// The style name within the family, e.g. "Bold".
    fn font_style(&self) -> &str;

    /// Whether the glyphs of this typeface carry intrinsic color (e.g. emoji).
    fn has_color(&self) -> bool;
}

/// A typeface at a specific size, with optional synthesized emboldening and slanting.
#[derive(Clone, Debug)]
pub struct Font {
    typeface: Arc<dyn Typeface>,
    size: f32,
    faux_bold: bool,
    faux_italic: bool,
}

impl Font {
    /// Creates a font for `typeface` at `size` pixels per em.
    pub fn new(typeface: Arc<dyn Typeface>, size: f32) -> Self {
        Self {
            typeface,
            size,
            faux_bold: false,
            faux_italic: false,
        }
    }

    /// Sets whether glyphs are emboldened synthetically.
    pub fn with_faux_bold(mut self, faux_bold: bool) -> Self {
        self.faux_bold = faux_bold;
        self
    }

    /// Sets whether glyphs are slanted synthetically.
    pub fn with_faux_italic(mut self, faux_italic: bool) -> Self {
        self.faux_italic = faux_italic;
        self
    }

    /// The typeface of this font.
    #[inline]
    pub fn typeface(&self) -> &Arc<dyn Typeface> {
        &self.typeface
    }

    /// Font size in pixels per em.
    #[inline]
    pub fn size(&self) -> f32 {
        self.size
    }

    /// Whether glyphs are emboldened synthetically.
    #[inline]
    pub fn is_faux_bold(&self) -> bool {
        self.faux_bold
    }

    /// Whether glyphs are slanted synthetically.
    #[inline]
    pub fn is_faux_italic(&self) -> bool {
        self.faux_italic
    }

    /// Whether the typeface carries intrinsic color.
    #[inline]
    pub fn has_color(&self) -> bool {
        self.typeface.has_color()
    }
}

/// Which parts of a glyph are painted.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum TextStyle {
    /// Only the glyph's interior.
    #[default]
    Fill,
    /// Only the glyph's outline.
    Stroke,
    /// Both interior and outline.
    StrokeAndFill,
}

/// A single paint pass over a glyph.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PaintStyle {
    /// Fill the glyph.
    Fill,
    /// Stroke the glyph outline.
    Stroke,
}

/// One positioned, styled instance of a font glyph.
#[derive(Clone, Debug)]
pub struct Glyph {
    glyph_id: GlyphId,
    font: Font,
    style: TextStyle,
    fill_color: Color,
    stroke_color: Color,
    stroke_width: f32,
    stroke_over_fill: bool,
    bounds: Rect,
    matrix: Affine,
    extra_matrix: Affine,
    alpha: f32,
    visible: bool,
}

impl Glyph {
    /// Creates a glyph painted according to `paint`.
    ///
    /// `bounds` are the glyph's local bounds in font units scaled to the font size.
    pub fn new(glyph_id: GlyphId, font: Font, bounds: Rect, paint: &TextPaint) -> Self {
        Self {
            glyph_id,
            font,
            style: paint.style,
            fill_color: paint.fill_color,
            stroke_color: paint.stroke_color,
            stroke_width: paint.stroke_width,
            stroke_over_fill: paint.stroke_over_fill,
            bounds,
            matrix: Affine::IDENTITY,
            extra_matrix: Affine::IDENTITY,
            alpha: 1.0,
            visible: true,
        }
    }

    /// Sets the layout transform of the glyph.
    pub fn with_matrix(mut self, matrix: Affine) -> Self {
        self.matrix = matrix;
        self
    }

    /// Sets the glyph-local transform applied before the layout transform,
    /// e.g. the rotation of vertical text.
    pub fn with_extra_matrix(mut self, extra_matrix: Affine) -> Self {
        self.extra_matrix = extra_matrix;
        self
    }

    /// Sets the opacity of the glyph in `0.0..=1.0`.
    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.alpha = alpha;
        self
    }

    /// Sets whether the glyph is drawn at all.
    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    /// The glyph index within the font.
    #[inline]
    pub fn glyph_id(&self) -> GlyphId {
        self.glyph_id
    }

    /// The font the glyph is drawn with.
    #[inline]
    pub fn font(&self) -> &Font {
        &self.font
    }

    /// Which parts of the glyph are painted.
    #[inline]
    pub fn style(&self) -> TextStyle {
        self.style
    }

    /// Color of the fill pass.
    #[inline]
    pub fn fill_color(&self) -> Color {
        self.fill_color
    }

    /// Color of the stroke pass.
    #[inline]
    pub fn stroke_color(&self) -> Color {
        self.stroke_color
    }

    /// Width of the stroke pass.
    #[inline]
    pub fn stroke_width(&self) -> f32 {
        self.stroke_width
    }

    /// Whether the stroke is painted on top of the fill.
    #[inline]
    pub fn stroke_over_fill(&self) -> bool {
        self.stroke_over_fill
    }

    /// Local bounds of the glyph.
    #[inline]
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// The layout transform.
    #[inline]
    pub fn matrix(&self) -> Affine {
        self.matrix
    }

    /// The glyph-local transform.
    #[inline]
    pub fn extra_matrix(&self) -> Affine {
        self.extra_matrix
    }

    /// The full transform from glyph space: the extra matrix followed by the layout matrix.
    #[inline]
    pub fn total_matrix(&self) -> Affine {
        self.matrix * self.extra_matrix
    }

    /// Opacity of the glyph.
    #[inline]
    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    /// Whether the glyph is drawn.
    #[inline]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// The paint passes of this glyph in drawing order.
    pub fn paint_styles(&self) -> SmallVec<[PaintStyle; 2]> {
        match self.style {
            TextStyle::Fill => smallvec![PaintStyle::Fill],
            TextStyle::Stroke => smallvec![PaintStyle::Stroke],
            TextStyle::StrokeAndFill if self.stroke_over_fill => {
                smallvec![PaintStyle::Fill, PaintStyle::Stroke]
            }
            TextStyle::StrokeAndFill => smallvec![PaintStyle::Stroke, PaintStyle::Fill],
        }
    }

    /// Computes the key used to group glyphs that can be rasterized in one batch.
    ///
    /// Glyphs with equal style keys share a font, a paint setup and the linear part of their
    /// transform. Colors, opacity, visibility and translation never split a batch.
    pub fn compute_style_key(&self) -> StyleKey {
        let mut flags = 0;
        if self.font.faux_bold {
            flags |= StyleKey::FAUX_BOLD;
        }
        if self.font.faux_italic {
            flags |= StyleKey::FAUX_ITALIC;
        }
        if self.stroke_over_fill {
            flags |= StyleKey::STROKE_OVER_FILL;
        }
        let [a, b, c, d, _, _] = without_translation(self.total_matrix()).as_coeffs();
        StyleKey {
            typeface_id: self.font.typeface.unique_id(),
            font_size_bits: self.font.size.to_bits(),
            stroke_width_bits: self.stroke_width.to_bits(),
            style: self.style,
            flags,
            linear_bits: [a.to_bits(), b.to_bits(), c.to_bits(), d.to_bits()],
        }
    }
}

/// Identity of a batch of glyphs that can share one font and one set of paints.
///
/// Coarser than [`AtlasKey`](crate::AtlasKey): glyph ids don't take part, so many glyphs
/// share one style key while each of them gets its own atlas rectangle.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct StyleKey {
    typeface_id: u32,
    font_size_bits: u32,
    stroke_width_bits: u32,
    style: TextStyle,
    flags: u8,
    linear_bits: [u64; 4],
}

impl StyleKey {
    const FAUX_BOLD: u8 = 1 << 0;
    const FAUX_ITALIC: u8 = 1 << 1;
    const STROKE_OVER_FILL: u8 = 1 << 2;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{glyph, paint, typeface};

    #[test]
    fn total_matrix_applies_extra_matrix_first() {
        let g = glyph(1, typeface(1, false), 12.0, (10.0, 10.0))
            .with_matrix(Affine::translate((5.0, 0.0)))
            .with_extra_matrix(Affine::scale(2.0));
        assert_eq!(
            g.total_matrix().as_coeffs(),
            [2.0, 0.0, 0.0, 2.0, 5.0, 0.0]
        );
    }

    #[test]
    fn paint_styles_follow_stroke_over_fill() {
        let tf = typeface(1, false);
        let both = paint(TextStyle::StrokeAndFill);
        let under_paint = TextPaint {
            stroke_over_fill: false,
            ..both.clone()
        };
        let under = Glyph::new(1, Font::new(tf.clone(), 12.0), Rect::ZERO, &under_paint);
        assert_eq!(
            under.paint_styles().as_slice(),
            [PaintStyle::Stroke, PaintStyle::Fill]
        );

        let over_paint = TextPaint {
            stroke_over_fill: true,
            ..both
        };
        let over = Glyph::new(1, Font::new(tf, 12.0), Rect::ZERO, &over_paint);
        assert_eq!(
            over.paint_styles().as_slice(),
            [PaintStyle::Fill, PaintStyle::Stroke]
        );
    }

    #[test]
    fn style_key_ignores_glyph_id_and_translation() {
        let tf = typeface(1, false);
        let a = glyph(1, tf.clone(), 12.0, (10.0, 10.0));
        let b = glyph(2, tf, 12.0, (4.0, 8.0)).with_matrix(Affine::translate((30.0, 2.0)));
        assert_eq!(a.compute_style_key(), b.compute_style_key());
    }

    #[test]
    fn style_key_splits_on_font_and_transform() {
        let tf = typeface(1, false);
        let base = glyph(1, tf.clone(), 12.0, (10.0, 10.0));
        let bigger = glyph(1, tf.clone(), 14.0, (10.0, 10.0));
        let other_face = glyph(1, typeface(2, false), 12.0, (10.0, 10.0));
        let rotated = glyph(1, tf, 12.0, (10.0, 10.0)).with_matrix(Affine::rotate(0.5));
        let key = base.compute_style_key();
        assert_ne!(key, bigger.compute_style_key());
        assert_ne!(key, other_face.compute_style_key());
        assert_ne!(key, rotated.compute_style_key());
    }

    #[test]
    fn style_key_ignores_colors() {
        let tf = typeface(1, false);
        let red = TextPaint {
            fill_color: crate::color::palette::css::RED,
            ..paint(TextStyle::Fill)
        };
        let a = glyph(1, tf.clone(), 12.0, (10.0, 10.0));
        let b = Glyph::new(1, Font::new(tf, 12.0), Rect::new(0.0, 0.0, 10.0, 10.0), &red);
        assert_eq!(a.compute_style_key(), b.compute_style_key());
    }
}

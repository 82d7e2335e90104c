// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Batches of glyphs that are rasterized into an atlas with one draw call per paint pass.

#![allow(
    clippy::cast_possible_truncation,
    reason = "glyph bounds and stroke widths are small positive values that fit in u32"
)]

use hashbrown::HashMap;

use super::key::AtlasKey;
use super::pack::RectanglePack;
use crate::kurbo::{Affine, Point, Rect};
use crate::math::{invert_or_identity, without_translation};
use crate::{Font, Glyph, GlyphId, Paint, PaintStyle, TextStyle};

/// Glyphs sharing one style, laid out for rasterization into an atlas.
///
/// Paint index 0 is the background pass and index 1 the foreground pass. Positions are stored
/// per paint index, one per glyph, relative to [`TextRun::matrix`].
#[derive(Clone, Debug)]
pub struct TextRun {
    matrix: Affine,
    paints: [Option<Paint>; 2],
    font: Font,
    glyph_ids: Vec<GlyphId>,
    positions: [Vec<Point>; 2],
}

impl TextRun {
    /// Lays out `glyphs` in `pack` and records their rectangles in `locators`.
    ///
    /// All glyphs must share one [`StyleKey`](crate::StyleKey); the first glyph supplies the
    /// font, the paints and the baseline transform. Returns `None` for an empty group.
    pub(crate) fn build(
        glyphs: &[&Glyph],
        pack: &mut RectanglePack,
        locators: &mut HashMap<AtlasKey, Rect>,
    ) -> Option<Self> {
        let first = *glyphs.first()?;
        let paints = paints_for(first);
        let matrix = without_translation(first.total_matrix());
        let inverse = invert_or_identity(matrix);

        let mut glyph_ids = Vec::with_capacity(glyphs.len());
        let mut positions = [Vec::new(), Vec::new()];
        for glyph in glyphs {
            glyph_ids.push(glyph.glyph_id());
            let offset = (inverse * glyph.total_matrix()).translation();
            let bounds = glyph.bounds();
            let glyph_width = bounds.width() as u32;
            let glyph_height = bounds.height() as u32;
            for (paint, pass_positions) in paints.iter().zip(&mut positions) {
                let Some(paint) = paint else {
                    continue;
                };
                let outset = match paint.style {
                    PaintStyle::Stroke => glyph.stroke_width().ceil() as u32,
                    PaintStyle::Fill => 0,
                };
                let x = bounds.x0 - f64::from(outset);
                let y = bounds.y0 - f64::from(outset);
                let width = glyph_width.saturating_add(outset.saturating_mul(2));
                let height = glyph_height.saturating_add(outset.saturating_mul(2));
                let (px, py) = pack.add_rect(width, height);
                let (px, py) = (f64::from(px), f64::from(py));
                pass_positions.push(Point::new(offset.x - x + px, offset.y - y + py));
                locators.insert(
                    AtlasKey::new(glyph, paint.style),
                    Rect::new(px, py, px + f64::from(width), py + f64::from(height)),
                );
            }
        }

        Some(Self {
            matrix,
            paints,
            font: first.font().clone(),
            glyph_ids,
            positions,
        })
    }

    /// The transform shared by all glyphs of the run, without translation.
    #[inline]
    pub fn matrix(&self) -> Affine {
        self.matrix
    }

    /// The background and foreground paints.
    #[inline]
    pub fn paints(&self) -> &[Option<Paint>; 2] {
        &self.paints
    }

    /// The font all glyphs are drawn with.
    #[inline]
    pub fn font(&self) -> &Font {
        &self.font
    }

    /// Glyph ids in layout order.
    #[inline]
    pub fn glyph_ids(&self) -> &[GlyphId] {
        &self.glyph_ids
    }

    /// Glyph positions for the pass at `paint_index`; empty if that pass has no paint or the
    /// index is out of range.
    #[inline]
    pub fn positions(&self, paint_index: usize) -> &[Point] {
        self.positions
            .get(paint_index)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

fn paints_for(glyph: &Glyph) -> [Option<Paint>; 2] {
    let style = glyph.style();
    let fill = matches!(style, TextStyle::Fill | TextStyle::StrokeAndFill).then(Paint::fill);
    let stroke = matches!(style, TextStyle::Stroke | TextStyle::StrokeAndFill)
        .then(|| Paint::stroke(glyph.stroke_width()));
    let stroke_under_fill = style == TextStyle::StrokeAndFill && !glyph.stroke_over_fill();
    if stroke_under_fill || fill.is_none() {
        [stroke, fill]
    } else {
        [fill, stroke]
    }
}

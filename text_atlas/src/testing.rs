// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fixtures shared by the unit tests.

use std::sync::Arc;

use crate::kurbo::{Affine, Rect};
use crate::{Font, Glyph, GlyphBuilder, GlyphHandle, TextPaint, TextStyle, Typeface};

#[derive(Debug)]
struct TestTypeface {
    id: u32,
    has_color: bool,
}

impl Typeface for TestTypeface {
    fn unique_id(&self) -> u32 {
        self.id
    }

    fn font_family(&self) -> &str {
        "Test"
    }

    fn font_style(&self) -> &str {
        "Regular"
    }

    fn has_color(&self) -> bool {
        self.has_color
    }
}

/// A fresh typeface that nothing else references.
pub(crate) fn typeface(id: u32, has_color: bool) -> Arc<dyn Typeface> {
    Arc::new(TestTypeface { id, has_color })
}

/// The default paint with `style`.
pub(crate) fn paint(style: TextStyle) -> TextPaint {
    TextPaint {
        style,
        ..Default::default()
    }
}

/// A filled glyph of `width` x `height` sitting on the baseline.
pub(crate) fn glyph(
    id: u16,
    typeface: Arc<dyn Typeface>,
    size: f32,
    (width, height): (f64, f64),
) -> Glyph {
    Glyph::new(
        id,
        Font::new(typeface, size),
        Rect::new(0.0, -height, width, 0.0),
        &paint(TextStyle::Fill),
    )
}

/// Shapes text one glyph per character, using the character code as glyph id.
#[derive(Debug)]
pub(crate) struct MonospaceBuilder {
    typeface: Arc<dyn Typeface>,
    advance: f64,
}

impl Default for MonospaceBuilder {
    fn default() -> Self {
        Self {
            typeface: typeface(1, false),
            advance: 10.0,
        }
    }
}

impl GlyphBuilder for MonospaceBuilder {
    fn build_glyphs(&self, text: &str, paint: &TextPaint) -> Vec<GlyphHandle> {
        let mut x = 0.0;
        text.chars()
            .map(|ch| {
                let font = Font::new(self.typeface.clone(), paint.font_size)
                    .with_faux_bold(paint.faux_bold)
                    .with_faux_italic(paint.faux_italic);
                let id = u16::try_from(u32::from(ch)).unwrap_or_default();
                let glyph = Glyph::new(id, font, Rect::new(0.0, -8.0, 6.0, 0.0), paint)
                    .with_matrix(Affine::translate((x, 0.0)));
                x += self.advance;
                Arc::new(glyph)
            })
            .collect()
    }
}

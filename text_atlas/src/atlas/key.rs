// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Atlas rectangle key.

use bytemuck::{Pod, Zeroable};

use crate::{Glyph, PaintStyle};

/// Identifies the rendered appearance of a glyph under one paint pass.
///
/// Two glyphs with the same key look identical in the atlas and share one rectangle. The key
/// is a fixed-width value laid out as:
///
/// | field          | contents                                                       |
/// |----------------|----------------------------------------------------------------|
/// | `flags`        | glyph id (bits 0..16), faux bold (16), faux italic (17), fill (18) |
/// | `font_size`    | font size as `f32` bits                                        |
/// | `stroke_width` | stroke width as `f32` bits                                     |
/// | `typeface_id`  | unique id of the typeface                                      |
///
/// Keys carry no ordering; they are only an index into an atlas.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Pod, Zeroable)]
#[repr(C)]
pub struct AtlasKey {
    flags: u32,
    font_size: u32,
    stroke_width: u32,
    typeface_id: u32,
}

impl AtlasKey {
    const FAUX_BOLD: u32 = 1 << 16;
    const FAUX_ITALIC: u32 = 1 << 17;
    const FILL: u32 = 1 << 18;

    /// Computes the key of `glyph` drawn with the `style` pass.
    pub fn new(glyph: &Glyph, style: PaintStyle) -> Self {
        let font = glyph.font();
        let mut flags = u32::from(glyph.glyph_id());
        if font.is_faux_bold() {
            flags |= Self::FAUX_BOLD;
        }
        if font.is_faux_italic() {
            flags |= Self::FAUX_ITALIC;
        }
        if style == PaintStyle::Fill {
            flags |= Self::FILL;
        }
        Self {
            flags,
            font_size: font.size().to_bits(),
            stroke_width: glyph.stroke_width().to_bits(),
            typeface_id: font.typeface().unique_id(),
        }
    }

    /// The key as raw bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kurbo::Rect;
    use crate::testing::{glyph, paint, typeface};
    use crate::{Font, TextPaint, TextStyle};

    fn glyph_with(font: Font, stroke_width: f32) -> Glyph {
        glyph_with_id(7, font, stroke_width)
    }

    fn glyph_with_id(id: u16, font: Font, stroke_width: f32) -> Glyph {
        let paint = TextPaint {
            stroke_width,
            ..paint(TextStyle::StrokeAndFill)
        };
        Glyph::new(id, font, Rect::new(0.0, 0.0, 8.0, 8.0), &paint)
    }

    #[test]
    fn key_is_deterministic() {
        let tf = typeface(1, false);
        let a = glyph_with(Font::new(tf.clone(), 12.0), 2.0);
        let b = glyph_with(Font::new(tf, 12.0), 2.0);
        assert_eq!(
            AtlasKey::new(&a, PaintStyle::Fill),
            AtlasKey::new(&b, PaintStyle::Fill)
        );
        assert_eq!(
            AtlasKey::new(&a, PaintStyle::Stroke).as_bytes(),
            AtlasKey::new(&b, PaintStyle::Stroke).as_bytes()
        );
    }

    #[test]
    fn every_field_changes_the_key() {
        let tf = typeface(1, false);
        let font = Font::new(tf.clone(), 12.0);
        let base = glyph_with(font.clone(), 2.0);
        let key = AtlasKey::new(&base, PaintStyle::Fill);

        let variants = [
            AtlasKey::new(&base, PaintStyle::Stroke),
            AtlasKey::new(&glyph_with_id(8, font.clone(), 2.0), PaintStyle::Fill),
            AtlasKey::new(&glyph_with(font.clone().with_faux_bold(true), 2.0), PaintStyle::Fill),
            AtlasKey::new(&glyph_with(font.clone().with_faux_italic(true), 2.0), PaintStyle::Fill),
            AtlasKey::new(&glyph_with(Font::new(tf, 13.0), 2.0), PaintStyle::Fill),
            AtlasKey::new(&glyph_with(font, 3.0), PaintStyle::Fill),
            AtlasKey::new(&glyph_with(Font::new(typeface(2, false), 12.0), 2.0), PaintStyle::Fill),
        ];
        for variant in variants {
            assert_ne!(key, variant);
        }
    }

    #[test]
    fn key_ignores_position_and_color() {
        let tf = typeface(1, false);
        let a = glyph(3, tf.clone(), 12.0, (10.0, 10.0));
        let b = glyph(3, tf, 12.0, (20.0, 20.0))
            .with_matrix(crate::kurbo::Affine::translate((100.0, 0.0)))
            .with_alpha(0.5);
        assert_eq!(
            AtlasKey::new(&a, PaintStyle::Fill),
            AtlasKey::new(&b, PaintStyle::Fill)
        );
    }

    #[test]
    fn key_layout() {
        let g = glyph_with(Font::new(typeface(9, false), 1.0).with_faux_italic(true), 0.0);
        let key = AtlasKey::new(&g, PaintStyle::Fill);
        let bytes = key.as_bytes();
        assert_eq!(bytes.len(), 16);
        let flags = u32::from_ne_bytes(bytes[0..4].try_into().unwrap());
        assert_eq!(flags, 7 | 1 << 17 | 1 << 18);
        assert_eq!(&bytes[4..8], &1.0_f32.to_bits().to_ne_bytes());
    }
}

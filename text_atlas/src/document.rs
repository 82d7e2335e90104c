// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Text documents and the source-text property they are resolved from.

use crate::color::palette::css::BLACK;
use crate::{Color, GlyphHandle, TextStyle};

/// A run of text together with the attributes it is painted with.
#[derive(Clone, Debug, PartialEq)]
pub struct TextDocument {
    /// The text to shape.
    pub text: String,
    /// Whether the glyph interiors are painted.
    pub apply_fill: bool,
    /// Whether the glyph outlines are painted.
    pub apply_stroke: bool,
    /// Fill color.
    pub fill_color: Color,
    /// Stroke color.
    pub stroke_color: Color,
    /// Stroke width.
    pub stroke_width: f32,
    /// Whether the stroke is painted on top of the fill.
    pub stroke_over_fill: bool,
    /// Requested font family.
    pub font_family: String,
    /// Requested style within the family.
    pub font_style: String,
    /// Font size in pixels per em.
    pub font_size: f32,
    /// Whether glyphs are emboldened synthetically.
    pub faux_bold: bool,
    /// Whether glyphs are slanted synthetically.
    pub faux_italic: bool,
}

impl Default for TextDocument {
    fn default() -> Self {
        Self {
            text: String::new(),
            apply_fill: true,
            apply_stroke: false,
            fill_color: BLACK,
            stroke_color: BLACK,
            stroke_width: 1.0,
            stroke_over_fill: true,
            font_family: String::new(),
            font_style: String::new(),
            font_size: 24.0,
            faux_bold: false,
            faux_italic: false,
        }
    }
}

/// The paint attributes handed to a [`GlyphBuilder`] along with the text.
#[derive(Clone, Debug, PartialEq)]
pub struct TextPaint {
    /// Which parts of the glyphs are painted.
    pub style: TextStyle,
    /// Fill color.
    pub fill_color: Color,
    /// Stroke color.
    pub stroke_color: Color,
    /// Stroke width.
    pub stroke_width: f32,
    /// Whether the stroke is painted on top of the fill.
    pub stroke_over_fill: bool,
    /// Requested font family.
    pub font_family: String,
    /// Requested style within the family.
    pub font_style: String,
    /// Font size in pixels per em.
    pub font_size: f32,
    /// Whether glyphs are emboldened synthetically.
    pub faux_bold: bool,
    /// Whether glyphs are slanted synthetically.
    pub faux_italic: bool,
}

impl TextPaint {
    /// Derives the paint for the glyphs of `document`.
    ///
    /// A document that applies neither fill nor stroke is treated as fill-only.
    pub fn from_document(document: &TextDocument) -> Self {
        let style = match (document.apply_fill, document.apply_stroke) {
            (true, true) => TextStyle::StrokeAndFill,
            (false, true) => TextStyle::Stroke,
            _ => TextStyle::Fill,
        };
        Self {
            style,
            fill_color: document.fill_color,
            stroke_color: document.stroke_color,
            stroke_width: document.stroke_width,
            stroke_over_fill: document.stroke_over_fill,
            font_family: document.font_family.clone(),
            font_style: document.font_style.clone(),
            font_size: document.font_size,
            faux_bold: document.faux_bold,
            faux_italic: document.faux_italic,
        }
    }
}

impl Default for TextPaint {
    fn default() -> Self {
        Self::from_document(&TextDocument::default())
    }
}

/// One keyframe of an animated property.
#[derive(Clone, Debug, PartialEq)]
pub struct Keyframe<T> {
    /// Value at the start of the keyframe.
    pub start_value: T,
    /// Value at the end of the keyframe.
    pub end_value: T,
}

/// A value that is either constant or animated over keyframes.
#[derive(Clone, Debug, PartialEq)]
pub enum Property<T> {
    /// A value that never changes.
    Static(T),
    /// A value interpolated between keyframes.
    Animated(Vec<Keyframe<T>>),
}

impl<T> Property<T> {
    /// Whether the property changes over time.
    pub fn is_animatable(&self) -> bool {
        matches!(self, Self::Animated(_))
    }

    /// Every value the property can take on a keyframe boundary.
    ///
    /// For an animated property this is the start value of the first keyframe followed by the
    /// end value of every keyframe. Values aren't deduplicated.
    pub fn keyframe_values(&self) -> impl Iterator<Item = &T> {
        let (first, rest) = match self {
            Self::Static(value) => (Some(value), &[][..]),
            Self::Animated(keyframes) => {
                (keyframes.first().map(|k| &k.start_value), &keyframes[..])
            }
        };
        first
            .into_iter()
            .chain(rest.iter().map(|keyframe| &keyframe.end_value))
    }
}

/// Shapes text into positioned glyphs.
///
/// This is the seam to the typography layer: glyph lookup, font fallback and layout happen
/// behind it.
pub trait GlyphBuilder {
    /// Returns the glyphs of `text` painted with `paint`.
    fn build_glyphs(&self, text: &str, paint: &TextPaint) -> Vec<GlyphHandle>;
}

/// Resolves every glyph that `source_text` can display.
pub(crate) fn glyphs_from_source_text(
    source_text: &Property<TextDocument>,
    builder: &impl GlyphBuilder,
) -> Vec<GlyphHandle> {
    let mut glyphs = Vec::new();
    for document in source_text.keyframe_values() {
        let paint = TextPaint::from_document(document);
        glyphs.extend(builder.build_glyphs(&document.text, &paint));
    }
    glyphs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MonospaceBuilder;

    fn document(text: &str) -> TextDocument {
        TextDocument {
            text: text.into(),
            ..Default::default()
        }
    }

    #[test]
    fn paint_style_from_document() {
        let mut doc = document("a");
        assert_eq!(TextPaint::from_document(&doc).style, TextStyle::Fill);
        doc.apply_stroke = true;
        assert_eq!(TextPaint::from_document(&doc).style, TextStyle::StrokeAndFill);
        doc.apply_fill = false;
        assert_eq!(TextPaint::from_document(&doc).style, TextStyle::Stroke);
        doc.apply_stroke = false;
        assert_eq!(TextPaint::from_document(&doc).style, TextStyle::Fill);
    }

    #[test]
    fn static_property_has_one_value() {
        let property = Property::Static(document("abc"));
        assert!(!property.is_animatable());
        let values: Vec<_> = property.keyframe_values().map(|d| d.text.as_str()).collect();
        assert_eq!(values, ["abc"]);
    }

    #[test]
    fn animated_property_yields_first_start_and_every_end() {
        let property = Property::Animated(vec![
            Keyframe {
                start_value: document("a"),
                end_value: document("b"),
            },
            Keyframe {
                start_value: document("ignored"),
                end_value: document("c"),
            },
        ]);
        let values: Vec<_> = property.keyframe_values().map(|d| d.text.as_str()).collect();
        assert_eq!(values, ["a", "b", "c"]);
    }

    #[test]
    fn empty_animation_has_no_values() {
        let property: Property<TextDocument> = Property::Animated(Vec::new());
        assert_eq!(property.keyframe_values().count(), 0);
    }

    #[test]
    fn glyphs_are_collected_across_keyframes() {
        let property = Property::Animated(vec![Keyframe {
            start_value: document("ab"),
            end_value: document("ab"),
        }]);
        let glyphs = glyphs_from_source_text(&property, &MonospaceBuilder::default());
        // Duplicates are kept so every rendered state is packed.
        assert_eq!(glyphs.len(), 4);
    }
}

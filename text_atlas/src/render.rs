// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Interfaces to the drawing backend.

use std::sync::Arc;

use crate::kurbo::{Affine, Point, Rect};
use crate::{Color, Font, GlyphId, PaintStyle};

/// Identifies a texture owned by a drawing backend.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct TextureId(pub u64);

/// Pixel format of a texture.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TextureFormat {
    /// Single-channel coverage.
    Alpha8,
    /// Four-channel color.
    Rgba8,
}

/// A texture read back from a [`Surface`].
///
/// The pixels live in the backend; this handle carries the id the backend resolves them by.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Texture {
    id: TextureId,
    width: u32,
    height: u32,
    format: TextureFormat,
}

impl Texture {
    /// Creates a handle for a backend texture.
    pub fn new(id: TextureId, width: u32, height: u32, format: TextureFormat) -> Self {
        Self {
            id,
            width,
            height,
            format,
        }
    }

    /// The backend id of the texture.
    #[inline]
    pub fn id(&self) -> TextureId {
        self.id
    }

    /// Width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Pixel format.
    #[inline]
    pub fn format(&self) -> TextureFormat {
        self.format
    }

    /// Whether the texture only stores coverage.
    #[inline]
    pub fn is_alpha_only(&self) -> bool {
        self.format == TextureFormat::Alpha8
    }
}

/// How glyphs are painted into an atlas.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Paint {
    /// Fill or stroke.
    pub style: PaintStyle,
    /// Stroke width; ignored for fills.
    pub stroke_width: f32,
}

impl Paint {
    /// A fill paint.
    pub fn fill() -> Self {
        Self {
            style: PaintStyle::Fill,
            stroke_width: 0.0,
        }
    }

    /// A stroke paint of the given width.
    pub fn stroke(stroke_width: f32) -> Self {
        Self {
            style: PaintStyle::Stroke,
            stroke_width,
        }
    }
}

/// A batch of textured quads sampled from one atlas texture.
///
/// Instance `i` draws a quad the size of `rects[i]` whose top-left corner is the origin of the
/// instance's local space, mapped through `transforms[i]`. The quad samples `rects[i]` of the
/// texture, tinted with `colors[i]` when colors are given (mask atlases) and faded by
/// `alphas[i]`.
#[derive(Copy, Clone, Debug)]
pub struct AtlasDraw<'a> {
    /// The atlas texture.
    pub texture: &'a Texture,
    /// Per-instance transforms from texture space to the canvas.
    pub transforms: &'a [Affine],
    /// Per-instance source rectangles in the texture.
    pub rects: &'a [Rect],
    /// Per-instance colors; `None` keeps the texture's own colors.
    pub colors: Option<&'a [Color]>,
    /// Per-instance opacities.
    pub alphas: &'a [f32],
}

impl AtlasDraw<'_> {
    /// Number of instances in the batch.
    #[inline]
    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    /// Whether the batch draws nothing.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }
}

/// A 2D drawing surface with a current transform.
pub trait Canvas {
    /// The current transform.
    fn matrix(&self) -> Affine;

    /// Replaces the current transform.
    fn set_matrix(&mut self, matrix: Affine);

    /// Pre-concatenates `matrix` to the current transform.
    fn concat(&mut self, matrix: Affine) {
        let current = self.matrix();
        self.set_matrix(current * matrix);
    }

    /// Draws a run of glyphs of one font with one paint.
    ///
    /// `glyph_ids` and `positions` have the same length.
    fn draw_glyphs(
        &mut self,
        glyph_ids: &[GlyphId],
        positions: &[Point],
        font: &Font,
        paint: &Paint,
    );

    /// Draws a batch of quads sampled from an atlas texture.
    fn draw_atlas(&mut self, batch: &AtlasDraw<'_>);
}

/// A canvas that can allocate offscreen surfaces on the same device.
pub trait RenderTarget: Canvas {
    /// The offscreen surface type.
    type Surface: Surface;

    /// Allocates a `width` x `height` surface, single-channel when `alpha_only` is set.
    ///
    /// Returns `None` if the device refuses the allocation.
    fn make_surface(&mut self, width: u32, height: u32, alpha_only: bool)
        -> Option<Self::Surface>;
}

/// An offscreen surface whose contents can be read back as a texture.
pub trait Surface {
    /// The canvas drawing into this surface.
    type Canvas: Canvas;

    /// The canvas drawing into this surface.
    fn canvas(&mut self) -> &mut Self::Canvas;

    /// Finishes drawing and returns the texture holding the surface contents.
    fn into_texture(self) -> Option<Arc<Texture>>;
}

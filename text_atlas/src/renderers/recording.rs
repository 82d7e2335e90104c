// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A drawing backend that records commands instead of executing them.
//!
//! [`RecordingCanvas`] implements [`RenderTarget`], so atlases can be "rasterized" into it.
//! Draw calls are stored as [`DrawCommand`]s together with the transform that was current at
//! the time. Offscreen surfaces hand their recordings back to the canvas they were allocated
//! from when they are turned into textures; drain them with
//! [`RecordingCanvas::take_surface_recordings`]. Recorded commands can be replayed into any
//! other [`Canvas`] with [`replay`].
//!
//! This is useful for inspecting what a frame draws and for deferring the actual rendering to
//! a thread that owns the GPU context.

use core::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use crate::kurbo::{Affine, Point, Rect};
use crate::{
    AtlasDraw, Canvas, Color, Font, GlyphId, Paint, RenderTarget, Surface, Texture, TextureFormat,
    TextureId,
};

/// A single recorded draw call.
///
/// The variants correspond 1:1 to the drawing methods of [`Canvas`].
#[derive(Clone, Debug)]
pub enum DrawCommand {
    /// A run of glyphs drawn with [`Canvas::draw_glyphs`].
    DrawGlyphs {
        /// The canvas transform at the time of the call.
        matrix: Affine,
        /// Glyph ids.
        glyph_ids: Vec<GlyphId>,
        /// One position per glyph.
        positions: Vec<Point>,
        /// The font of the run.
        font: Font,
        /// The paint of the run.
        paint: Paint,
    },
    /// A textured batch drawn with [`Canvas::draw_atlas`].
    DrawAtlas {
        /// The canvas transform at the time of the call.
        matrix: Affine,
        /// The sampled texture.
        texture: Texture,
        /// Per-instance transforms.
        transforms: Vec<Affine>,
        /// Per-instance source rectangles.
        rects: Vec<Rect>,
        /// Per-instance colors.
        colors: Option<Vec<Color>>,
        /// Per-instance opacities.
        alphas: Vec<f32>,
    },
}

/// The commands recorded into an offscreen surface, and the texture it produced.
#[derive(Clone, Debug)]
pub struct SurfaceRecording {
    /// The texture handed out for the surface.
    pub texture: Arc<Texture>,
    /// Commands drawn into the surface.
    pub commands: Vec<DrawCommand>,
}

#[derive(Debug, Default)]
struct Device {
    next_texture_id: u64,
    surfaces_allocated: usize,
    surface_budget: Option<usize>,
    finished: Vec<SurfaceRecording>,
}

/// A canvas that records draw calls.
#[derive(Debug)]
pub struct RecordingCanvas {
    matrix: Affine,
    commands: Vec<DrawCommand>,
    device: Rc<RefCell<Device>>,
}

impl RecordingCanvas {
    /// Creates an empty canvas with an identity transform.
    pub fn new() -> Self {
        Self {
            matrix: Affine::IDENTITY,
            commands: Vec::new(),
            device: Rc::default(),
        }
    }

    /// Limits how many offscreen surfaces can be allocated; further allocations fail.
    pub fn with_surface_budget(self, budget: usize) -> Self {
        self.device.borrow_mut().surface_budget = Some(budget);
        self
    }

    /// Commands recorded so far.
    #[inline]
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Takes all recorded commands, leaving the canvas empty.
    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        core::mem::take(&mut self.commands)
    }

    /// Number of offscreen surfaces allocated from this canvas or any of its surfaces.
    pub fn surfaces_allocated(&self) -> usize {
        self.device.borrow().surfaces_allocated
    }

    /// Takes the recordings of all surfaces finished so far.
    pub fn take_surface_recordings(&mut self) -> Vec<SurfaceRecording> {
        core::mem::take(&mut self.device.borrow_mut().finished)
    }
}

impl Default for RecordingCanvas {
    fn default() -> Self {
        Self::new()
    }
}

impl Canvas for RecordingCanvas {
    fn matrix(&self) -> Affine {
        self.matrix
    }

    fn set_matrix(&mut self, matrix: Affine) {
        self.matrix = matrix;
    }

    fn draw_glyphs(
        &mut self,
        glyph_ids: &[GlyphId],
        positions: &[Point],
        font: &Font,
        paint: &Paint,
    ) {
        self.commands.push(DrawCommand::DrawGlyphs {
            matrix: self.matrix,
            glyph_ids: glyph_ids.to_vec(),
            positions: positions.to_vec(),
            font: font.clone(),
            paint: *paint,
        });
    }

    fn draw_atlas(&mut self, batch: &AtlasDraw<'_>) {
        self.commands.push(DrawCommand::DrawAtlas {
            matrix: self.matrix,
            texture: batch.texture.clone(),
            transforms: batch.transforms.to_vec(),
            rects: batch.rects.to_vec(),
            colors: batch.colors.map(<[Color]>::to_vec),
            alphas: batch.alphas.to_vec(),
        });
    }
}

impl RenderTarget for RecordingCanvas {
    type Surface = RecordingSurface;

    fn make_surface(
        &mut self,
        width: u32,
        height: u32,
        alpha_only: bool,
    ) -> Option<RecordingSurface> {
        let mut device = self.device.borrow_mut();
        if device
            .surface_budget
            .is_some_and(|budget| device.surfaces_allocated >= budget)
        {
            return None;
        }
        device.surfaces_allocated += 1;
        let id = TextureId(device.next_texture_id);
        device.next_texture_id += 1;
        let format = if alpha_only {
            TextureFormat::Alpha8
        } else {
            TextureFormat::Rgba8
        };
        Some(RecordingSurface {
            canvas: Self {
                matrix: Affine::IDENTITY,
                commands: Vec::new(),
                device: self.device.clone(),
            },
            texture: Texture::new(id, width, height, format),
        })
    }
}

/// An offscreen surface of a [`RecordingCanvas`].
#[derive(Debug)]
pub struct RecordingSurface {
    canvas: RecordingCanvas,
    texture: Texture,
}

impl Surface for RecordingSurface {
    type Canvas = RecordingCanvas;

    fn canvas(&mut self) -> &mut RecordingCanvas {
        &mut self.canvas
    }

    fn into_texture(mut self) -> Option<Arc<Texture>> {
        let texture = Arc::new(self.texture);
        let commands = self.canvas.take_commands();
        self.canvas
            .device
            .borrow_mut()
            .finished
            .push(SurfaceRecording {
                texture: texture.clone(),
                commands,
            });
        Some(texture)
    }
}

/// Replays recorded commands into `canvas`, restoring its transform afterwards.
pub fn replay(commands: &[DrawCommand], canvas: &mut impl Canvas) {
    let base = canvas.matrix();
    for command in commands {
        match command {
            DrawCommand::DrawGlyphs {
                matrix,
                glyph_ids,
                positions,
                font,
                paint,
            } => {
                canvas.set_matrix(base * *matrix);
                canvas.draw_glyphs(glyph_ids, positions, font, paint);
            }
            DrawCommand::DrawAtlas {
                matrix,
                texture,
                transforms,
                rects,
                colors,
                alphas,
            } => {
                canvas.set_matrix(base * *matrix);
                canvas.draw_atlas(&AtlasDraw {
                    texture,
                    transforms,
                    rects,
                    colors: colors.as_deref(),
                    alphas,
                });
            }
        }
    }
    canvas.set_matrix(base);
}

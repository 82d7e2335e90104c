// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Online shelf packing of glyph rectangles.

/// Padding in pixels added after each packed rectangle to prevent texture bleeding.
pub const GLYPH_PADDING: u32 = 1;

/// Packs rectangles into a region that grows on demand.
///
/// Rectangles are placed in strips. Before each insertion the packer compares how much of the
/// free corner region would be wasted by extending the current strip, and opens a new strip to
/// the right of or below the packed region instead when that is cheaper. Placed rectangles never
/// move, so the layout depends on insertion order; insert larger rectangles first.
///
/// Every rectangle is padded by [`GLYPH_PADDING`] on its right and bottom edges, and the region
/// starts with one unit of padding on its top and left edges, so placed rectangles are separated
/// by at least one unit from each other and from the region border.
#[derive(Clone, Debug)]
pub struct RectanglePack {
    width: u32,
    height: u32,
    x: u32,
    y: u32,
}

impl RectanglePack {
    /// Creates an empty packer.
    pub fn new() -> Self {
        Self {
            width: GLYPH_PADDING,
            height: GLYPH_PADDING,
            x: GLYPH_PADDING,
            y: GLYPH_PADDING,
        }
    }

    /// Width of the packed region, including padding.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height of the packed region, including padding.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Places a `width` x `height` rectangle and returns its top-left corner.
    ///
    /// This never fails; the region grows as much as needed. Coordinates saturate at
    /// `u32::MAX`.
    pub fn add_rect(&mut self, width: u32, height: u32) -> (u32, u32) {
        let w = width.saturating_add(GLYPH_PADDING);
        let h = height.saturating_add(GLYPH_PADDING);
        let (x, y) = (i128::from(self.x), i128::from(self.y));
        let (region_w, region_h) = (i128::from(self.width), i128::from(self.height));
        let free_area = (region_w - x) * (region_h - y);
        let wasted_right = (x + i128::from(w) - region_w) * y;
        let wasted_down = (y + i128::from(h) - region_h) * x;
        if wasted_right > free_area || wasted_down > free_area {
            if self.width <= self.height {
                self.x = self.width;
                self.y = GLYPH_PADDING;
                self.width = self.width.saturating_add(w);
            } else {
                self.x = GLYPH_PADDING;
                self.y = self.height;
                self.height = self.height.saturating_add(h);
            }
        }

        let point = (self.x, self.y);
        let far_x = self.x.saturating_add(w);
        let far_y = self.y.saturating_add(h);
        let overflow_w = i64::from(far_x) - i64::from(self.width);
        let overflow_h = i64::from(far_y) - i64::from(self.height);
        if overflow_w < overflow_h {
            self.x = far_x;
        } else {
            self.y = far_y;
        }
        self.width = self.width.max(far_x);
        self.height = self.height.max(far_y);
        point
    }
}

impl Default for RectanglePack {
    fn default() -> Self {
        Self::new()
    }
}

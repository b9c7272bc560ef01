//! Overlap tests and edge handling shared by the simulations.

#[inline]
pub fn distance(ax: f32, ay: f32, bx: f32, by: f32) -> f32 {
    ((bx - ax).powi(2) + (by - ay).powi(2)).sqrt()
}

/// Strict circle overlap: touching circles do not collide.
#[inline]
pub fn circles_overlap(ax: f32, ay: f32, ar: f32, bx: f32, by: f32, br: f32) -> bool {
    distance(ax, ay, bx, by) < ar + br
}

/// Teleports a coordinate to the far edge once it has left `[0, extent]` by
/// more than `radius`.
#[inline]
pub fn wrap_coord(value: f32, radius: f32, extent: f32) -> f32 {
    if value < -radius {
        extent + radius
    } else if value > extent + radius {
        -radius
    } else {
        value
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Open-interval containment on both axes.
    #[inline]
    pub fn contains_point(&self, px: f32, py: f32) -> bool {
        px > self.x && px < self.x + self.w && py > self.y && py < self.y + self.h
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }
}

/// Inclusive tile-column range covered by a horizontal body.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColumnSpan {
    pub start: i32,
    pub end: i32,
}

impl ColumnSpan {
    /// Derives the span from the body's left edge in pixels. The last pixel of
    /// the body decides the end column.
    pub fn from_left_edge(x: f32, len_tiles: u32, tile_w: f32, offset_x: f32) -> Self {
        let start = ((x - offset_x) / tile_w).floor() as i32;
        let end = ((x + len_tiles as f32 * tile_w - 1.0 - offset_x) / tile_w).floor() as i32;
        Self { start, end }
    }

    #[inline]
    pub fn contains(&self, col: i32) -> bool {
        col >= self.start && col <= self.end
    }
}

/// Inclusive pixel intervals `[a0, a1]` and `[b0, b1]` share at least one point.
#[inline]
pub fn intervals_touch(a0: f32, a1: f32, b0: f32, b1: f32) -> bool {
    a1 >= b0.min(b1) && a0 <= b0.max(b1)
}

/// Empty space between two intervals, zero when they overlap.
#[inline]
pub fn interval_gap(a0: f32, a1: f32, b0: f32, b1: f32) -> f32 {
    (a0.max(b0) - a1.min(b1)).max(0.0)
}

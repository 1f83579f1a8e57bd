//! Axis-aligned rectangle geometry
//!
//! Everything in the course is a box; all collision work reduces to AABB
//! overlap tests plus swept top-edge crossings done in `collide`.

use glam::Vec2;

/// An axis-aligned rectangle, y-down screen convention
#[derive(Debug, Clone, Copy, PartialEq, Default)]
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

    /// Rect centered on `center` with the given half-extent (bounding square
    /// of a circular footprint)
    pub fn from_center(center: Vec2, half: f32) -> Self {
        Self {
            x: center.x - half,
            y: center.y - half,
            w: half * 2.0,
            h: half * 2.0,
        }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    #[inline]
    pub fn center_x(&self) -> f32 {
        self.x + self.w / 2.0
    }

    /// Strict AABB overlap (touching edges do not count)
    #[inline]
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    /// Horizontal-only overlap with an inset margin on `self`
    #[inline]
    pub fn overlaps_x(&self, other: &Rect, inset: f32) -> bool {
        self.x + inset < other.right() && self.right() - inset > other.x
    }

    /// Shrink on both axes (centered)
    pub fn inset(&self, dx: f32, dy: f32) -> Rect {
        Rect {
            x: self.x + dx,
            y: self.y + dy,
            w: (self.w - dx * 2.0).max(0.0),
            h: (self.h - dy * 2.0).max(0.0),
        }
    }
}

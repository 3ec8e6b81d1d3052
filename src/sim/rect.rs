//! Integer axis-aligned rectangles in screen space (y down)

use glam::IVec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle, origin at the top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Rectangle of size `w` x `h` whose center lands on (`cx`, `cy`)
    pub fn from_center(cx: i32, cy: i32, w: i32, h: i32) -> Self {
        Self::new(cx - w.div_euclid(2), cy - h.div_euclid(2), w, h)
    }

    #[inline]
    pub fn top(&self) -> i32 {
        self.y
    }

    #[inline]
    pub fn bottom(&self) -> i32 {
        self.y + self.h
    }

    #[inline]
    pub fn left(&self) -> i32 {
        self.x
    }

    #[inline]
    pub fn right(&self) -> i32 {
        self.x + self.w
    }

    #[inline]
    pub fn origin(&self) -> IVec2 {
        IVec2::new(self.x, self.y)
    }

    /// Integer center (floor of the half extents)
    #[inline]
    pub fn center(&self) -> IVec2 {
        IVec2::new(self.x + self.w.div_euclid(2), self.y + self.h.div_euclid(2))
    }

    /// Zero or negative width/height; never handed to mask routines
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.w <= 0 || self.h <= 0
    }

    /// Strict overlap test; touching edges and empty rectangles never intersect
    pub fn intersects(&self, other: &Rect) -> bool {
        !self.is_degenerate()
            && !other.is_degenerate()
            && self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Same rectangle shifted by `offset`
    pub fn translated(&self, offset: IVec2) -> Self {
        Self::new(self.x + offset.x, self.y + offset.y, self.w, self.h)
    }
}

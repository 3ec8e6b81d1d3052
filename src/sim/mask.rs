//! Per-pixel collision masks
//!
//! A mask is a boolean grid derived from a sprite's alpha channel. The
//! narrow-phase test is a windowed AND over the region where two masks
//! overlap at a given offset.

use glam::IVec2;

use super::rect::Rect;
use super::sprite::Sprite;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollisionMask {
    width: u32,
    height: u32,
    bits: Vec<bool>,
}

impl CollisionMask {
    /// Solid wherever alpha is strictly above `threshold`
    pub fn from_sprite(sprite: &Sprite, threshold: u8) -> Self {
        Self {
            width: sprite.width,
            height: sprite.height,
            bits: sprite.pixels.iter().map(|p| p[3] > threshold).collect(),
        }
    }

    /// Fully solid mask, the stand-in for a gate rectangle
    pub fn solid(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            bits: vec![true; (width * height) as usize],
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn get(&self, x: u32, y: u32) -> bool {
        self.bits[(y * self.width + x) as usize]
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Number of solid pixels
    pub fn count(&self) -> usize {
        self.bits.iter().filter(|&&b| b).count()
    }

    /// Tight bounds of the solid pixels, in mask coordinates
    pub fn bounding_rect(&self) -> Option<Rect> {
        let mut min = IVec2::new(i32::MAX, i32::MAX);
        let mut max = IVec2::new(i32::MIN, i32::MIN);
        for y in 0..self.height {
            for x in 0..self.width {
                if self.get(x, y) {
                    let p = IVec2::new(x as i32, y as i32);
                    min = min.min(p);
                    max = max.max(p);
                }
            }
        }
        if min.x > max.x {
            return None;
        }
        Some(Rect::new(min.x, min.y, max.x - min.x + 1, max.y - min.y + 1))
    }

    /// True if any solid pixel of `other`, placed at `offset` relative to
    /// this mask's origin, lands on a solid pixel of this mask.
    pub fn overlap(&self, other: &CollisionMask, offset: IVec2) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        let x0 = offset.x.max(0);
        let y0 = offset.y.max(0);
        let x1 = (offset.x + other.width as i32).min(self.width as i32);
        let y1 = (offset.y + other.height as i32).min(self.height as i32);
        if x0 >= x1 || y0 >= y1 {
            return false;
        }

        for y in y0..y1 {
            let oy = (y - offset.y) as u32;
            for x in x0..x1 {
                let ox = (x - offset.x) as u32;
                if self.get(x as u32, y as u32) && other.get(ox, oy) {
                    return true;
                }
            }
        }
        false
    }
}

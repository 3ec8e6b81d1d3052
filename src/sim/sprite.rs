//! RGBA sprite rasters
//!
//! Only what the simulation needs: nearest-neighbour scale and rotation
//! (so the collision mask matches what gets drawn), plus a built-in
//! placeholder ship for when no sprite asset is available.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::{rotate_screen, rotated_extent};

pub type Rgba = [u8; 4];

pub const TRANSPARENT: Rgba = [0, 0, 0, 0];

/// Row-major RGBA raster
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sprite {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Rgba>,
}

impl Sprite {
    /// Fully transparent sprite
    pub fn blank(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![TRANSPARENT; (width * height) as usize],
        }
    }

    /// Check dimensions against the pixel buffer
    pub fn check(&self) -> Result<(), String> {
        if self.width == 0 || self.height == 0 {
            return Err(format!("empty size {}x{}", self.width, self.height));
        }
        let expected = self.width as usize * self.height as usize;
        if self.pixels.len() != expected {
            return Err(format!(
                "{} pixels for {}x{} (expected {})",
                self.pixels.len(),
                self.width,
                self.height,
                expected
            ));
        }
        Ok(())
    }

    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> Rgba {
        self.pixels[(y * self.width + x) as usize]
    }

    #[inline]
    pub fn alpha(&self, x: u32, y: u32) -> u8 {
        self.pixel(x, y)[3]
    }

    #[inline]
    pub fn set(&mut self, x: u32, y: u32, px: Rgba) {
        let idx = (y * self.width + x) as usize;
        self.pixels[idx] = px;
    }

    /// Nearest-neighbour resize
    pub fn scaled(&self, width: u32, height: u32) -> Self {
        if width == self.width && height == self.height {
            return self.clone();
        }
        let mut out = Self::blank(width, height);
        for y in 0..height {
            let sy = (y as u64 * self.height as u64 / height as u64) as u32;
            for x in 0..width {
                let sx = (x as u64 * self.width as u64 / width as u64) as u32;
                out.set(x, y, self.pixel(sx, sy));
            }
        }
        out
    }

    /// Rotate about the center, counter-clockwise on screen for positive degrees.
    ///
    /// The output grows to the axis-aligned extent of the rotated box; pixels
    /// that map outside the source stay transparent.
    pub fn rotated(&self, degrees: f32) -> Self {
        let (rw, rh) = rotated_extent(self.width, self.height, degrees);
        let mut out = Self::blank(rw, rh);
        let src_center = Vec2::new(self.width as f32, self.height as f32) * 0.5;
        let dst_center = Vec2::new(rw as f32, rh as f32) * 0.5;

        for oy in 0..rh {
            for ox in 0..rw {
                let p = Vec2::new(ox as f32 + 0.5, oy as f32 + 0.5) - dst_center;
                // Inverse mapping: undo the rotation to find the source sample
                let src = rotate_screen(p, -degrees) + src_center;
                if src.x < 0.0 || src.y < 0.0 {
                    continue;
                }
                let (sx, sy) = (src.x as u32, src.y as u32);
                if sx < self.width && sy < self.height {
                    out.set(ox, oy, self.pixel(sx, sy));
                }
            }
        }
        out
    }

    /// Built-in ship silhouette facing right: fuselage, nose and two swept fins.
    ///
    /// Non-convex on purpose so narrow-phase collision has something to do.
    pub fn placeholder_ship(width: u32, height: u32) -> Self {
        const HULL: Rgba = [200, 220, 240, 255];
        const COCKPIT: Rgba = [120, 205, 255, 255];
        const FIN: Rgba = [80, 170, 255, 255];

        let mut out = Self::blank(width, height);
        for y in 0..height {
            let v = (y as f32 + 0.5) / height as f32;
            for x in 0..width {
                let u = (x as f32 + 0.5) / width as f32;

                let du = (u - 0.5) / 0.38;
                let dv = (v - 0.5) / 0.14;
                let hull = du * du + dv * dv <= 1.0;

                let nose = (0.8..=0.95).contains(&u) && (v - 0.5).abs() <= 0.14 * (0.95 - u) / 0.15;

                let cu = (u - 0.62) / 0.1;
                let cv = (v - 0.47) / 0.06;
                let cockpit = cu * cu + cv * cv <= 1.0;

                // Fins hang off the rear half, mirrored about the center line
                let fv = if v < 0.5 { v } else { 1.0 - v };
                let fin = (0.12..=0.4).contains(&u) && fv <= 0.4 && fv >= 0.18 + (u - 0.12) * (0.22 / 0.28);

                let px = if cockpit {
                    COCKPIT
                } else if hull || nose {
                    HULL
                } else if fin {
                    FIN
                } else {
                    continue;
                };
                out.set(x, y, px);
            }
        }
        out
    }
}

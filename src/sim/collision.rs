//! Ship-vs-gate collision detection
//!
//! Broad phase is a strict rectangle overlap. Only when that passes do we
//! build a solid mask the size of the gate rectangle and AND it against the
//! ship's rotated-sprite mask at the rectangles' relative offset.

use super::gate::Gate;
use super::mask::CollisionMask;
use super::rect::Rect;
use super::ship::Ship;
use crate::config::GameConfig;

/// Which side of a gate was hit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateSide {
    Top,
    Bottom,
}

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrashCause {
    /// Ship rect left the playfield through the top edge
    Ceiling,
    /// Ship rect left the playfield through the bottom edge
    Floor,
    /// Pixel overlap with a gate (index into the gate queue at the time)
    Gate { index: usize, side: GateSide },
}

/// Pixel-accurate test of a mask placed at `mask_rect` against a solid `rect`
pub fn mask_rect_collision(mask: &CollisionMask, mask_rect: Rect, rect: Rect) -> bool {
    if !mask_rect.intersects(&rect) {
        return false;
    }
    let solid = CollisionMask::solid(rect.w as u32, rect.h as u32);
    mask.overlap(&solid, rect.origin() - mask_rect.origin())
}

/// Which side of `gate` the ship overlaps, if any (top is tested first)
pub fn gate_hit(ship: &Ship, gate: &Gate, config: &GameConfig) -> Option<GateSide> {
    let [top, bottom] = gate.rects(config);
    [(GateSide::Top, top), (GateSide::Bottom, bottom)]
        .into_iter()
        .filter(|(_, rect)| !rect.is_degenerate())
        .find(|(_, rect)| mask_rect_collision(ship.mask(), ship.rect(), *rect))
        .map(|(side, _)| side)
}

/// True if the ship's current mask overlaps either obstacle of `gate`
pub fn check_collision(ship: &Ship, gate: &Gate, config: &GameConfig) -> bool {
    gate_hit(ship, gate, config).is_some()
}

/// First gate (in queue order) the ship overlaps
pub fn first_collision<'a, I>(ship: &Ship, gates: I, config: &GameConfig) -> Option<CrashCause>
where
    I: IntoIterator<Item = &'a Gate>,
{
    gates.into_iter().enumerate().find_map(|(index, gate)| {
        gate_hit(ship, gate, config).map(|side| CrashCause::Gate { index, side })
    })
}

/// Playfield boundary check; touching an edge is still inside
pub fn boundary_violation(rect: Rect, config: &GameConfig) -> Option<CrashCause> {
    if rect.top() < 0 {
        Some(CrashCause::Ceiling)
    } else if rect.bottom() > config.height {
        Some(CrashCause::Floor)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::sprite::Sprite;
    use glam::{IVec2, Vec2};
    use proptest::prelude::*;

    fn ship_at(config: &GameConfig, x: f32, y: f32) -> Ship {
        let mut ship = Ship::new(config, &Sprite::placeholder_ship(72, 72));
        ship.pos = Vec2::new(x, y);
        ship.update(0.0, config);
        ship
    }

    fn diamond_mask(size: u32) -> CollisionMask {
        let mut sprite = Sprite::blank(size, size);
        let half = size as i32 / 2;
        for y in 0..size as i32 {
            for x in 0..size as i32 {
                if (x - half).abs() + (y - half).abs() <= half {
                    sprite.set(x as u32, y as u32, [255; 4]);
                }
            }
        }
        CollisionMask::from_sprite(&sprite, 10)
    }

    #[test]
    fn test_broad_phase_miss() {
        let mask = CollisionMask::solid(10, 10);
        assert!(!mask_rect_collision(
            &mask,
            Rect::new(0, 0, 10, 10),
            Rect::new(10, 0, 5, 5)
        ));
    }

    #[test]
    fn test_narrow_phase_rejects_transparent_corner() {
        // Rect clips the diamond's empty corner: boxes overlap, pixels do not
        let mask = diamond_mask(21);
        let mask_rect = Rect::new(0, 0, 21, 21);
        let corner = Rect::new(0, 0, 4, 4);
        assert!(mask_rect.intersects(&corner));
        assert!(!mask_rect_collision(&mask, mask_rect, corner));
        // Reaching the tip of the diamond does collide
        assert!(mask_rect_collision(&mask, mask_rect, Rect::new(0, 8, 2, 4)));
    }

    #[test]
    fn test_degenerate_rect_skipped() {
        let config = GameConfig {
            gate_min: 0,
            ..Default::default()
        };
        // Ship pressed against the very top where the zero-height rect lives
        let ship = ship_at(&config, 246.0, 36.0);
        let gate = Gate::new(200.0, 100);
        assert_eq!(gate.top_rect(&config).h, 0);
        assert_eq!(gate_hit(&ship, &gate, &config), None);
    }

    #[test]
    fn test_gate_hit_sides() {
        let config = GameConfig::default();
        let gate = Gate::new(100.0, 360);
        // Opening spans y 260..460
        let ship = ship_at(&config, 146.0, 360.0);
        assert_eq!(gate_hit(&ship, &gate, &config), None);

        let ship = ship_at(&config, 146.0, 250.0);
        assert_eq!(gate_hit(&ship, &gate, &config), Some(GateSide::Top));

        let ship = ship_at(&config, 146.0, 470.0);
        assert_eq!(gate_hit(&ship, &gate, &config), Some(GateSide::Bottom));
        assert!(check_collision(&ship, &gate, &config));
    }

    #[test]
    fn test_first_collision_short_circuits_in_order() {
        let config = GameConfig::default();
        let ship = ship_at(&config, 146.0, 250.0);
        let gates = [
            Gate::new(600.0, 360),
            Gate::new(100.0, 360),
            Gate::new(110.0, 360),
        ];
        assert_eq!(
            first_collision(&ship, &gates, &config),
            Some(CrashCause::Gate {
                index: 1,
                side: GateSide::Top
            })
        );
    }

    #[test]
    fn test_boundary_is_exclusive() {
        let config = GameConfig::default();
        assert_eq!(boundary_violation(Rect::new(0, 0, 72, 72), &config), None);
        assert_eq!(boundary_violation(Rect::new(0, 648, 72, 72), &config), None);
        assert_eq!(
            boundary_violation(Rect::new(0, -1, 72, 72), &config),
            Some(CrashCause::Ceiling)
        );
        assert_eq!(
            boundary_violation(Rect::new(0, 649, 72, 72), &config),
            Some(CrashCause::Floor)
        );
    }

    proptest! {
        #[test]
        fn prop_translation_invariant(
            gx in -200i32..200, gy in -200i32..200,
            gw in 1i32..120, gh in 1i32..120,
            dx in -1000i32..1000, dy in -1000i32..1000,
        ) {
            let mask = diamond_mask(41);
            let mask_rect = Rect::new(0, 0, 41, 41);
            let rect = Rect::new(gx, gy, gw, gh);
            let offset = IVec2::new(dx, dy);
            prop_assert_eq!(
                mask_rect_collision(&mask, mask_rect, rect),
                mask_rect_collision(&mask, mask_rect.translated(offset), rect.translated(offset))
            );
        }

        #[test]
        fn prop_ship_gate_translation_invariant(
            gap in 170i32..=390, gate_x in 0i32..300, ship_y in 100i32..620, dx in -400i32..400
        ) {
            let config = GameConfig::default();
            let ship = ship_at(&config, 200.0, ship_y as f32);
            let gate = Gate::new(gate_x as f32, gap);
            let shifted_ship = ship_at(&config, (200 + dx) as f32, ship_y as f32);
            let shifted_gate = Gate::new((gate_x + dx) as f32, gap);
            prop_assert_eq!(
                check_collision(&ship, &gate, &config),
                check_collision(&shifted_ship, &shifted_gate, &config)
            );
        }
    }
}

//! The player's ship
//!
//! Vertical-only physics: gravity pulls, a flap overwrites velocity with an
//! upward impulse. Rotation follows velocity, and the rotated sprite, its
//! bounding rect and its collision mask are always rebuilt together.

use glam::Vec2;

use super::mask::CollisionMask;
use super::rect::Rect;
use super::sprite::Sprite;
use crate::config::GameConfig;
use crate::consts::*;
use crate::{clamp, rotate_screen};

/// Rotated pose derived from the base sprite; only ever replaced as a unit
#[derive(Debug, Clone)]
struct Pose {
    sprite: Sprite,
    rect: Rect,
    mask: CollisionMask,
}

#[derive(Debug, Clone)]
pub struct Ship {
    /// Center position (x never changes during a run)
    pub pos: Vec2,
    /// Vertical velocity, positive is down
    pub vy: f32,
    angle_deg: f32,
    thrust_timer: f32,
    mask_threshold: u8,
    base: Sprite,
    /// Nozzle anchor relative to the base sprite center
    anchor: Vec2,
    pose: Pose,
}

impl Ship {
    /// Build a ship at the configured start point from the (unscaled) sprite
    pub fn new(config: &GameConfig, sprite: &Sprite) -> Self {
        let base = sprite.scaled(config.ship_w, config.ship_h);
        let base_mask = CollisionMask::from_sprite(&base, config.mask_threshold);
        let bbox = base_mask
            .bounding_rect()
            .unwrap_or(Rect::new(0, 0, base.width as i32, base.height as i32));

        let anchor_px = Vec2::new(
            (bbox.left() + config.nozzle_inset) as f32,
            (bbox.top() + bbox.h.div_euclid(2)) as f32,
        );
        let base_center = Vec2::new(base.width as f32, base.height as f32) * 0.5;

        let pos = config.ship_start();
        let pose = Pose {
            rect: Rect::from_center(
                pos.x as i32,
                pos.y as i32,
                base.width as i32,
                base.height as i32,
            ),
            mask: base_mask,
            sprite: base.clone(),
        };

        Self {
            pos,
            vy: 0.0,
            angle_deg: 0.0,
            thrust_timer: 0.0,
            mask_threshold: config.mask_threshold,
            base,
            anchor: anchor_px - base_center,
            pose,
        }
    }

    /// Overwrite velocity with the upward impulse and relight the thrust flame
    pub fn flap(&mut self, config: &GameConfig) {
        self.vy = config.flap_vy;
        self.thrust_timer = config.thrust_time;
    }

    /// Advance one simulation tick of `dt` seconds
    pub fn update(&mut self, dt: f32, config: &GameConfig) {
        self.vy = (self.vy + config.gravity * dt).min(config.max_vy);
        self.pos.y += self.vy * dt;
        self.thrust_timer = (self.thrust_timer - dt).max(0.0);
        self.angle_deg = tilt_for_velocity(self.vy);
        self.rebuild_pose();
    }

    fn rebuild_pose(&mut self) {
        let sprite = self.base.rotated(self.angle_deg);
        let rect = Rect::from_center(
            self.pos.x as i32,
            self.pos.y as i32,
            sprite.width as i32,
            sprite.height as i32,
        );
        let mask = CollisionMask::from_sprite(&sprite, self.mask_threshold);
        self.pose = Pose { sprite, rect, mask };
    }

    /// Rotation in degrees, positive is nose-up
    #[inline]
    pub fn angle_deg(&self) -> f32 {
        self.angle_deg
    }

    #[inline]
    pub fn thrust_timer(&self) -> f32 {
        self.thrust_timer
    }

    /// Bounding rect of the current rotated sprite
    #[inline]
    pub fn rect(&self) -> Rect {
        self.pose.rect
    }

    /// Collision mask of the current rotated sprite
    #[inline]
    pub fn mask(&self) -> &CollisionMask {
        &self.pose.mask
    }

    #[inline]
    pub fn sprite(&self) -> &Sprite {
        &self.pose.sprite
    }

    /// Unrotated sprite the pose is built from
    #[inline]
    pub fn base_sprite(&self) -> &Sprite {
        &self.base
    }

    /// Screen position of the thrust nozzle
    pub fn nozzle_pos(&self) -> Vec2 {
        let center = self.pose.rect.center().as_vec2();
        center + rotate_screen(self.anchor, self.angle_deg)
    }

    #[inline]
    pub fn thrust_active(&self) -> bool {
        self.thrust_timer > 0.0
    }

    /// Remaining thrust as a fraction of the full flap duration
    pub fn thrust_fraction(&self, config: &GameConfig) -> f32 {
        if config.thrust_time <= 0.0 {
            return 0.0;
        }
        clamp(self.thrust_timer / config.thrust_time, 0.0, 1.0)
    }

    /// Flame length in pixels; grows while climbing fast
    pub fn flame_length(&self) -> f32 {
        let boost = clamp(-self.vy * FLAME_VEL_GAIN, 0.0, FLAME_VEL_MAX);
        clamp(FLAME_BASE_LEN + boost, FLAME_MIN_LEN, FLAME_MAX_LEN)
    }
}

/// Nose-up while climbing, nose-down while falling, capped at the tilt limit
pub fn tilt_for_velocity(vy: f32) -> f32 {
    -clamp(vy, -ROTATION_VY_WINDOW, ROTATION_VY_WINDOW) / ROTATION_VY_WINDOW * MAX_TILT_DEG
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ship() -> (GameConfig, Ship) {
        let config = GameConfig::default();
        let ship = Ship::new(&config, &Sprite::placeholder_ship(72, 72));
        (config, ship)
    }

    #[test]
    fn test_spawn_pose() {
        let (_, ship) = ship();
        assert_eq!(ship.pos, Vec2::new(120.0, 360.0));
        assert_eq!(ship.vy, 0.0);
        assert_eq!(ship.rect(), Rect::new(84, 324, 72, 72));
        assert_eq!(ship.mask().width(), 72);
        assert!(!ship.thrust_active());
    }

    #[test]
    fn test_flap_from_rest() {
        let (config, mut ship) = ship();
        ship.flap(&config);
        assert_eq!(ship.vy, -460.0);
        assert_eq!(ship.thrust_timer(), 0.18);
        assert!(ship.thrust_active());
    }

    #[test]
    fn test_flap_overwrites_velocity() {
        let (config, mut ship) = ship();
        ship.vy = 800.0;
        ship.flap(&config);
        assert_eq!(ship.vy, -460.0);
    }

    #[test]
    fn test_gravity_integration() {
        let (config, mut ship) = ship();
        let dt = 1.0 / 64.0;
        ship.update(dt, &config);
        assert_eq!(ship.vy, 1400.0 * dt);
        assert_eq!(ship.pos.y, 360.0 + 1400.0 * dt * dt);
    }

    #[test]
    fn test_fall_speed_capped() {
        let (config, mut ship) = ship();
        ship.vy = 890.0;
        ship.update(0.1, &config);
        assert_eq!(ship.vy, 900.0);
        // Upward speed is not clamped by the rotation window
        ship.vy = -2000.0;
        ship.update(0.0, &config);
        assert_eq!(ship.vy, -2000.0);
        assert_eq!(ship.angle_deg(), 12.0);
    }

    #[test]
    fn test_thrust_timer_floors_at_zero() {
        let (config, mut ship) = ship();
        ship.flap(&config);
        ship.update(0.1, &config);
        assert!((ship.thrust_timer() - 0.08).abs() < 1e-6);
        ship.update(0.1, &config);
        assert_eq!(ship.thrust_timer(), 0.0);
        assert!(!ship.thrust_active());
    }

    #[test]
    fn test_tilt_mapping() {
        assert_eq!(tilt_for_velocity(0.0), 0.0);
        assert_eq!(tilt_for_velocity(-420.0), 12.0);
        assert_eq!(tilt_for_velocity(420.0), -12.0);
        assert_eq!(tilt_for_velocity(210.0), -6.0);
        assert_eq!(tilt_for_velocity(-460.0), 12.0);
    }

    #[test]
    fn test_pose_rebuilt_together() {
        let (config, mut ship) = ship();
        ship.vy = 600.0;
        ship.update(1.0 / 60.0, &config);
        let rect = ship.rect();
        assert_eq!(rect.w as u32, ship.sprite().width);
        assert_eq!(rect.h as u32, ship.sprite().height);
        assert_eq!(rect.w as u32, ship.mask().width());
        assert_eq!(rect.h as u32, ship.mask().height());
        assert!(rect.w > 72);
        assert_eq!(rect.center().x, 120);
        assert_eq!(rect.center().y, ship.pos.y as i32);
    }

    #[test]
    fn test_nozzle_unrotated() {
        let (_, ship) = ship();
        let nozzle = ship.nozzle_pos();
        // Behind the center on the horizontal midline
        assert!(nozzle.x < 120.0 - 20.0);
        assert_eq!(nozzle.y, 360.0);
    }

    #[test]
    fn test_nozzle_follows_sprite_rotation() {
        let (config, mut ship) = ship();
        ship.flap(&config);
        ship.update(1.0 / 60.0, &config);
        assert!(ship.angle_deg() > 0.0);

        // Nose up means the tail nozzle drops below the midline
        let nozzle = ship.nozzle_pos();
        assert!(nozzle.y > ship.rect().center().y as f32);

        // And it still sits on the drawn hull
        let local = nozzle - ship.rect().origin().as_vec2();
        let (lx, ly) = (local.x as i32, local.y as i32);
        let on_hull = (-1..=1).any(|dy| {
            (-1..=1).any(|dx| {
                let (x, y) = ((lx + dx) as u32, (ly + dy) as u32);
                ship.sprite().alpha(x, y) > 10
            })
        });
        assert!(on_hull);
    }

    #[test]
    fn test_flame_length() {
        let (config, mut ship) = ship();
        assert_eq!(ship.flame_length(), 26.0);
        ship.flap(&config);
        // 460 * 0.04 = 18.4, capped at 14
        assert_eq!(ship.flame_length(), 40.0);
        assert_eq!(ship.thrust_fraction(&config), 1.0);
    }

    proptest! {
        #[test]
        fn prop_velocity_and_tilt_bounded(
            steps in prop::collection::vec((any::<bool>(), 0.0f32..0.05), 1..120)
        ) {
            let (config, mut ship) = ship();
            for (flap, dt) in steps {
                if flap {
                    ship.flap(&config);
                }
                ship.update(dt, &config);
                prop_assert!(ship.vy <= config.max_vy);
                prop_assert!(ship.angle_deg().abs() <= 12.0);
                prop_assert_eq!(ship.rect().w as u32, ship.mask().width());
            }
        }
    }
}

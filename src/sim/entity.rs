//! Playfield entities: Spark, number orbs, cosmetic particles

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// The player character (Spark)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            pos: Vec2::new(FIELD_WIDTH / 2.0, FIELD_HEIGHT - 70.0),
            vel: Vec2::ZERO,
            radius: PLAYER_RADIUS,
        }
    }
}

impl Player {
    /// Drive toward an absolute target point (mouse/touch), capped at max speed
    pub fn move_toward(&mut self, target: Vec2, dt: f32, max_speed: f32) {
        let delta = target - self.pos;
        let dist = delta.length();
        if dist < 1.0 {
            self.vel = Vec2::ZERO;
            return;
        }
        let step = (max_speed * dt).min(dist);
        let dir = delta / dist;
        self.vel = dir * max_speed;
        self.pos += dir * step;
    }

    /// Drive with held movement axes (keyboard), values in [-1, 1]
    pub fn move_axes(&mut self, axes: Vec2, dt: f32, max_speed: f32) {
        let dir = axes.normalize_or_zero();
        self.vel = dir * max_speed;
        self.pos += self.vel * dt;
    }

    /// Keep Spark inside the playfield, below the HUD strip
    pub fn clamp_to_field(&mut self) {
        self.pos.x = self.pos.x.clamp(self.radius, FIELD_WIDTH - self.radius);
        self.pos.y = self
            .pos
            .y
            .clamp(HUD_HEIGHT + self.radius, FIELD_HEIGHT - self.radius);
    }
}

/// A floating number orb carrying one candidate value
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Orb {
    pub id: u32,
    /// Index into `round.values`
    pub value_index: usize,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Collected this attempt (respawns if the bulb overloads)
    pub consumed: bool,
    /// Bobbing offset for rendering only
    pub bob_phase: f32,
}

impl Orb {
    /// Drift and bounce off the playfield edges
    pub fn drift(&mut self, dt: f32) {
        self.pos += self.vel * dt;
        self.bob_phase += dt * 2.0;

        if self.pos.x < self.radius || self.pos.x > FIELD_WIDTH - self.radius {
            self.vel.x = -self.vel.x;
            self.pos.x = self.pos.x.clamp(self.radius, FIELD_WIDTH - self.radius);
        }
        let top = HUD_HEIGHT + self.radius;
        let bottom = FIELD_HEIGHT - self.radius;
        if self.pos.y < top || self.pos.y > bottom {
            self.vel.y = -self.vel.y;
            self.pos.y = self.pos.y.clamp(top, bottom);
        }
    }
}

/// A particle for visual effects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// 0-1, decreases over time
    pub life: f32,
    pub size: f32,
    /// Hue in degrees for the renderer
    pub hue: f32,
}

/// Maximum particles kept alive at once
pub const MAX_PARTICLES: usize = 256;

/// Circle overlap test used for orb pickup
#[inline]
pub fn circles_overlap(a_pos: Vec2, a_radius: f32, b_pos: Vec2, b_radius: f32) -> bool {
    let r = a_radius + b_radius;
    a_pos.distance_squared(b_pos) <= r * r
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circles_overlap() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(30.0, 0.0);
        assert!(circles_overlap(a, 20.0, b, 20.0));
        assert!(!circles_overlap(a, 10.0, b, 10.0));
        // Touching counts as overlap
        assert!(circles_overlap(a, 15.0, b, 15.0));
    }

    #[test]
    fn test_player_clamped_below_hud() {
        let mut player = Player::default();
        player.pos = Vec2::new(-50.0, 0.0);
        player.clamp_to_field();
        assert!(player.pos.x >= player.radius);
        assert!(player.pos.y >= HUD_HEIGHT + player.radius);
    }

    #[test]
    fn test_orb_bounces_off_walls() {
        let mut orb = Orb {
            id: 1,
            value_index: 0,
            pos: Vec2::new(FIELD_WIDTH - ORB_RADIUS - 1.0, 200.0),
            vel: Vec2::new(ORB_DRIFT_SPEED, 0.0),
            radius: ORB_RADIUS,
            consumed: false,
            bob_phase: 0.0,
        };
        for _ in 0..600 {
            orb.drift(SIM_DT);
            assert!(orb.pos.x <= FIELD_WIDTH - orb.radius + 0.001);
        }
        assert!(orb.vel.x < 0.0);
    }
}

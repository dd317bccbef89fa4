//! The player-controlled spider

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::{ease_angle, map_center, normalize_angle};

/// Radioactive red body
pub const SPIDER_BODY_COLOR: u32 = 0xff0033;
/// Electric blue legs and accents
pub const SPIDER_ACCENT_COLOR: u32 = 0x0066ff;

/// Result of a rock hitting the avatar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitOutcome {
    /// Already dead or still invulnerable
    Ignored,
    /// Took damage and survived
    Damaged { health: u32 },
    /// This hit was fatal
    Killed,
}

/// The single avatar instance. Never removed; death is a terminal state
/// that keeps the object around for its death animation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Avatar {
    pub pos: Vec2,
    /// Where the avatar is crawling to
    pub target: Vec2,
    /// Facing (radians, 0 = +x)
    pub angle: f32,
    pub body_color: u32,
    pub accent_color: u32,
    /// Area-effect shots and movement are available
    pub area_unlocked: bool,
    pub ammo: u32,
    /// Ammo bar scale; ammo may exceed it
    pub max_ammo: u32,
    pub health: u32,
    pub max_health: u32,
    pub dead: bool,
    /// Frames since death
    pub death_ticks: u32,
    /// Remaining frames of post-hit protection
    pub invulnerable: u32,
}

impl Default for Avatar {
    fn default() -> Self {
        let center = map_center();
        Self {
            pos: center,
            target: center,
            angle: 0.0,
            body_color: SPIDER_BODY_COLOR,
            accent_color: SPIDER_ACCENT_COLOR,
            area_unlocked: false,
            ammo: AVATAR_START_AMMO,
            max_ammo: AVATAR_MAX_AMMO,
            health: AVATAR_MAX_HEALTH,
            max_health: AVATAR_MAX_HEALTH,
            dead: false,
            death_ticks: 0,
            invulnerable: 0,
        }
    }
}

impl Avatar {
    /// Advance one frame: ease toward the target and turn toward the
    /// direction of travel.
    pub fn update(&mut self) {
        if self.dead {
            self.death_ticks += 1;
            return;
        }

        self.invulnerable = self.invulnerable.saturating_sub(1);

        let delta = self.target - self.pos;
        self.pos += delta * AVATAR_MOVE_EASING;

        // Skip turning when (nearly) arrived to avoid jitter
        if delta.length() > AVATAR_TURN_MIN_DISTANCE {
            let heading = delta.y.atan2(delta.x);
            self.angle = normalize_angle(ease_angle(self.angle, heading, AVATAR_TURN_EASING));
        }
    }

    /// Snap the facing toward a point (used when shooting)
    pub fn face_toward(&mut self, point: Vec2) {
        let dir = point - self.pos;
        if dir != Vec2::ZERO {
            self.angle = dir.y.atan2(dir.x);
        }
    }

    /// Apply rock damage
    pub fn take_hit(&mut self, damage: u32) -> HitOutcome {
        if self.dead || self.is_invulnerable() {
            return HitOutcome::Ignored;
        }

        self.health = self.health.saturating_sub(damage);
        self.invulnerable = INVULNERABILITY_FRAMES;

        if self.health == 0 {
            self.dead = true;
            self.death_ticks = 0;
            HitOutcome::Killed
        } else {
            HitOutcome::Damaged {
                health: self.health,
            }
        }
    }

    pub fn heal(&mut self, amount: u32) {
        self.health = self.health.saturating_add(amount).min(self.max_health);
    }

    pub fn add_ammo(&mut self, amount: u32) {
        self.ammo = self.ammo.saturating_add(amount);
    }

    /// Spend ammo if enough is available
    pub fn try_spend_ammo(&mut self, cost: u32) -> bool {
        if self.ammo < cost {
            return false;
        }
        self.ammo -= cost;
        true
    }

    /// Flip the area-effect latch. Returns true only on the first call.
    pub fn unlock_area_effect(&mut self) -> bool {
        if self.area_unlocked {
            return false;
        }
        self.area_unlocked = true;
        true
    }

    pub fn is_invulnerable(&self) -> bool {
        self.invulnerable > 0
    }

    /// Health bar fill in [0, 1]
    pub fn health_fraction(&self) -> f32 {
        self.health as f32 / self.max_health.max(1) as f32
    }

    /// Ammo bar fill in [0, 1]
    pub fn ammo_fraction(&self) -> f32 {
        (self.ammo as f32 / self.max_ammo.max(1) as f32).min(1.0)
    }
}

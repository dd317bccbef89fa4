//! Spyder - A grid arcade game about a radioactive spider
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, avatar, dimensions, game loop)
//! - `renderer`: WebGPU rendering pipeline
//! - `platform`: Real-time helpers for the browser/native shells
//! - `settings`: Presentation preferences

pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use settings::{QualityPreset, Settings};

use glam::{IVec2, Vec2};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (one frame at 60 Hz, all timers count frames)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// The map is a square grid of `GRID_SIZE` x `GRID_SIZE` cells
    pub const GRID_SIZE: i32 = 100;
    /// Pixels per grid cell at 1x zoom
    pub const CELL_PX: f32 = 8.0;

    /// Avatar defaults
    pub const AVATAR_MAX_HEALTH: u32 = 100;
    pub const AVATAR_START_AMMO: u32 = 10;
    /// Ammo bar scale (ammo itself is uncapped)
    pub const AVATAR_MAX_AMMO: u32 = 10;
    /// Fraction of the remaining distance covered per frame
    pub const AVATAR_MOVE_EASING: f32 = 0.15;
    /// Fraction of the remaining turn covered per frame
    pub const AVATAR_TURN_EASING: f32 = 0.25;
    /// Below this remaining distance the facing angle is left alone
    pub const AVATAR_TURN_MIN_DISTANCE: f32 = 0.1;
    pub const INVULNERABILITY_FRAMES: u32 = 60;
    pub const RARE_KILL_HEAL: u32 = 10;

    /// Ammo costs (only charged in the Hunting dimension)
    pub const SHOT_COST: u32 = 1;
    pub const MOVE_COST: u32 = 2;

    /// Web line progress per frame while advancing
    pub const WEB_SPEED: f32 = 0.1;
    /// Web line opacity loss per frame while fading
    pub const WEB_FADE: f32 = 0.05;
    /// Splat opacity loss per frame
    pub const SPLAT_FADE: f32 = 0.01;

    /// Prey population
    pub const INITIAL_PREY_COUNT: usize = 8;
    pub const MAX_PREY_COUNT: usize = 20;
    pub const RARE_SPAWN_CHANCE: f64 = 0.02;

    /// Area-effect mode
    pub const AREA_EFFECT_UNLOCK_SCORE: u64 = 5;
    /// Chebyshev reach (in cells) of an area-effect shot
    pub const AREA_EFFECT_REACH: i32 = 2;
    /// Euclidean reach of a single-target shot
    pub const SINGLE_TARGET_RADIUS: f32 = 3.0;

    /// Rock attacks
    pub const ATTACK_WARNING_FRAMES: u32 = 30;
    pub const ATTACK_GROUNDED_FRAMES: u32 = 60;
    /// Rocks drop from this altitude (grid units above the ground)
    pub const ROCK_START_ALTITUDE: f32 = 50.0;
    pub const ROCK_FALL_STEP: f32 = 4.375;
    pub const ROCK_HIT_RADIUS: f32 = 6.0;
    pub const ROCK_DAMAGE: u32 = 25;

    /// Attack scheduling
    pub const ATTACK_BASE_DELAY: u32 = 60;
    pub const ATTACK_MIN_DELAY: u32 = 15;
    pub const HUNTING_SCORE_STEP: u64 = 10;
    pub const HUNTING_DELAY_STEP: u32 = 6;
    pub const SURVIVAL_DODGE_STEP: u32 = 4;
    pub const SURVIVAL_DELAY_STEP: u32 = 10;

    /// Dimension progression
    pub const SURVIVAL_PORTAL_SCORE: u64 = 75;
    pub const FINALE_PORTAL_DODGES: u32 = 30;
    pub const PORTAL_RADIUS: f32 = 5.0;

    /// Real-time delay between death and the end screen
    pub const DEATH_SCREEN_DELAY_MS: f64 = 1200.0;
}

/// Normalize an angle to (-π, π]
#[inline]
pub fn normalize_angle(angle: f32) -> f32 {
    use std::f32::consts::{PI, TAU};
    let wrapped = angle.rem_euclid(TAU);
    if wrapped > PI { wrapped - TAU } else { wrapped }
}

/// Signed shortest rotation from `from` to `to`, in (-π, π]
#[inline]
pub fn shortest_angle_delta(from: f32, to: f32) -> f32 {
    normalize_angle(to - from)
}

/// Move `current` toward `target` by `fraction` of the shortest rotation
#[inline]
pub fn ease_angle(current: f32, target: f32, fraction: f32) -> f32 {
    current + shortest_angle_delta(current, target) * fraction
}

/// Map center, where the avatar starts and portals open
#[inline]
pub fn map_center() -> Vec2 {
    Vec2::splat(consts::GRID_SIZE as f32 / 2.0)
}

/// Convert grid coordinates to pixel coordinates (cell centers)
#[inline]
pub fn grid_to_pixels(pos: Vec2) -> Vec2 {
    pos * consts::CELL_PX + Vec2::splat(consts::CELL_PX / 2.0)
}

/// Convert a pixel position to the grid cell under it
#[inline]
pub fn pixels_to_cell(px: Vec2) -> IVec2 {
    (px / consts::CELL_PX).floor().as_ivec2()
}

/// Clamp a cell onto the map
#[inline]
pub fn clamp_to_grid(cell: IVec2) -> IVec2 {
    cell.clamp(IVec2::ZERO, IVec2::splat(consts::GRID_SIZE - 1))
}

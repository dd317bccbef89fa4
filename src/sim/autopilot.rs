//! Idle/demo mode - a simple AI that plays the game
//!
//! Produces the same `TickInput` a player would: shoots the nearest prey
//! that isn't already webbed, walks out from under incoming rocks, and steps
//! through any portal that opens.

use glam::IVec2;

use super::dimension;
use super::entities::AttackPhase;
use super::state::{Dimension, GameState};
use super::tick::TickInput;
use crate::consts::*;

/// Frames between shots
const SHOT_INTERVAL: u64 = 8;
/// How far (in cells) to sidestep a rock
const DODGE_DISTANCE: f32 = 12.0;

/// Decide this frame's input
pub fn autopilot(state: &GameState) -> TickInput {
    let mut input = TickInput::default();
    if state.is_finished() {
        return input;
    }

    let avatar = &state.avatar;
    let can_move = avatar.area_unlocked
        && (!state.dimension.charges_ammo() || avatar.ammo >= MOVE_COST + SHOT_COST);

    if can_move {
        if let Some(cell) = dimension::portal_cell(state) {
            input.secondary = Some(cell);
            return input;
        }

        // React to rocks the moment their warning appears
        let threatened = state.attacks.iter().any(|a| {
            matches!(a.phase, AttackPhase::Warning { elapsed } if elapsed <= 1)
                && a.target.distance(avatar.target) < ROCK_HIT_RADIUS + 1.0
        });
        if threatened {
            input.secondary = Some(dodge_cell(state));
            return input;
        }
    }

    if state.dimension == Dimension::Hunting && state.time_ticks % SHOT_INTERVAL == 0 {
        let nearest = state
            .prey
            .iter()
            .filter(|p| p.alive && !state.webs.iter().any(|w| w.is_pending_for(p.id)))
            .min_by(|a, b| {
                let da = a.cell.as_vec2().distance(avatar.pos);
                let db = b.cell.as_vec2().distance(avatar.pos);
                da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
            });
        input.primary = nearest.map(|p| p.cell);
    }

    input
}

/// A cell off to the side of the avatar, kept on the map and away from the edges
fn dodge_cell(state: &GameState) -> IVec2 {
    let avatar = &state.avatar;
    let sideways = glam::Vec2::from_angle(avatar.angle).perp();
    let toward_center = crate::map_center() - avatar.pos;
    let dir = if sideways.dot(toward_center) >= 0.0 {
        sideways
    } else {
        -sideways
    };
    let cell = (avatar.pos + dir * DODGE_DISTANCE).round().as_ivec2();
    cell.clamp(IVec2::splat(5), IVec2::splat(GRID_SIZE - 6))
}

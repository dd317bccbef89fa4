//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically, plus the two
//! player actions it feeds in at the start of each frame.

use glam::{IVec2, Vec2};

use super::attack;
use super::avatar::HitOutcome;
use super::dimension;
use super::entities::{PreyKind, WebLine, WebSplat};
use super::spawn;
use super::state::{ActionOutcome, Dimension, GameEvent, GameState, RejectReason};
use crate::consts::*;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Shoot a web at this cell (left click)
    pub primary: Option<IVec2>,
    /// Move to this cell or step through a portal there (right click)
    pub secondary: Option<IVec2>,
}

/// Advance the game state by one frame
pub fn tick(state: &mut GameState, input: &TickInput) {
    state.time_ticks += 1;

    if let Some(cell) = input.primary {
        let outcome = primary_action(state, cell);
        log::trace!("Primary action at {cell}: {outcome:?}");
    }
    if let Some(cell) = input.secondary {
        let outcome = secondary_action(state, cell);
        log::trace!("Secondary action at {cell}: {outcome:?}");
    }

    update_webs(state);

    for splat in &mut state.splats {
        splat.update();
    }
    state.splats.retain(|s| !s.is_done());

    update_attacks(state);
    attack::run_scheduler(state);

    if state.dimension == Dimension::Finale {
        state.finale_ticks += 1;
    } else {
        if state.dimension == Dimension::Hunting {
            for prey in &mut state.prey {
                prey.update();
            }
        }
        if let Some(portal) = &mut state.portal {
            portal.update();
        }
        state.avatar.update();
    }

    dimension::check_survival_portal(state);

    // Ensure deterministic ordering
    state.normalize_order();
}

/// Shoot a web at `cell`, plus targeted webs at any prey in reach
pub fn primary_action(state: &mut GameState, cell: IVec2) -> ActionOutcome {
    if let Some(reason) = action_blocker(state) {
        return ActionOutcome::Rejected(reason);
    }
    if state.dimension.charges_ammo() && !state.avatar.try_spend_ammo(SHOT_COST) {
        log::debug!("Shot rejected: out of web ammo");
        return ActionOutcome::Rejected(RejectReason::OutOfAmmo);
    }

    let destination = cell.as_vec2();
    state.avatar.face_toward(destination);
    state
        .webs
        .push(WebLine::new(state.avatar.pos, destination, None));
    let splat = WebSplat::new(destination, &mut state.rng);
    state.splats.push(splat);

    let targets: Vec<u32> = if state.avatar.area_unlocked {
        state
            .prey
            .iter()
            .filter(|p| p.alive && p.within_square(cell, AREA_EFFECT_REACH))
            .map(|p| p.id)
            .collect()
    } else {
        state
            .prey
            .iter()
            .filter(|p| p.alive && p.distance_to(cell) < SINGLE_TARGET_RADIUS)
            .min_by(|a, b| {
                a.distance_to(cell)
                    .partial_cmp(&b.distance_to(cell))
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|p| p.id)
            .into_iter()
            .collect()
    };

    let targeted = targets
        .into_iter()
        .filter(|&id| shoot_at_prey(state, id))
        .count();

    ActionOutcome::Fired { targeted }
}

/// Move the avatar to `cell`, or step through a portal there
pub fn secondary_action(state: &mut GameState, cell: IVec2) -> ActionOutcome {
    if let Some(reason) = action_blocker(state) {
        return ActionOutcome::Rejected(reason);
    }
    if !state.avatar.area_unlocked {
        return ActionOutcome::Rejected(RejectReason::Locked);
    }

    if dimension::try_traverse(state, cell) {
        return ActionOutcome::Traversed(state.dimension);
    }

    if state.dimension.charges_ammo() && !state.avatar.try_spend_ammo(MOVE_COST) {
        log::debug!("Move rejected: out of web ammo");
        return ActionOutcome::Rejected(RejectReason::OutOfAmmo);
    }

    state.avatar.target = cell.as_vec2();
    ActionOutcome::Moved
}

fn action_blocker(state: &GameState) -> Option<RejectReason> {
    if state.avatar.dead {
        Some(RejectReason::AvatarDead)
    } else if state.dimension == Dimension::Finale {
        Some(RejectReason::Finale)
    } else {
        None
    }
}

/// Launch a targeted web at a prey, unless one is already on its way
fn shoot_at_prey(state: &mut GameState, prey_id: u32) -> bool {
    if state.webs.iter().any(|w| w.is_pending_for(prey_id)) {
        return false;
    }
    let Some(prey_pos) = state.find_prey(prey_id).map(|p| p.cell.as_vec2()) else {
        return false;
    };

    state.avatar.face_toward(prey_pos);
    state
        .webs
        .push(WebLine::new(state.avatar.pos, prey_pos, Some(prey_id)));
    true
}

fn update_webs(state: &mut GameState) {
    let arrivals: Vec<u32> = state.webs.iter_mut().filter_map(|w| w.update()).collect();

    // Earlier arrivals may already have removed the prey a later one targets
    for prey_id in arrivals {
        resolve_web_hit(state, prey_id);
    }

    state.webs.retain(|w| !w.is_done());
}

/// Damage the prey a web arrived at, if it still exists
fn resolve_web_hit(state: &mut GameState, prey_id: u32) {
    let Some(index) = state.prey.iter().position(|p| p.id == prey_id && p.alive) else {
        log::trace!("Web reached prey {prey_id}, already gone");
        return;
    };

    if !state.prey[index].apply_hit() {
        return;
    }
    let prey = state.prey.remove(index);
    award_catch(state, prey.kind);
}

fn award_catch(state: &mut GameState, kind: PreyKind) {
    state.score += kind.score_reward();
    state.avatar.add_ammo(kind.ammo_reward());
    state.avatar.heal(kind.heal_reward());
    state.emit(GameEvent::PreyCaught { kind });
    log::debug!("Caught {:?} prey, score {}", kind, state.score);

    if state.score >= AREA_EFFECT_UNLOCK_SCORE && state.avatar.unlock_area_effect() {
        log::info!("Area-effect mode unlocked at score {}", state.score);
        state.emit(GameEvent::AreaEffectUnlocked);
    }

    spawn::restock(state);
}

fn update_attacks(state: &mut GameState) {
    let avatar_pos = state.avatar.pos;
    let impacts: Vec<(Vec2, bool)> = state
        .attacks
        .iter_mut()
        .filter_map(|a| a.update().map(|point| (point, a.strikes(avatar_pos))))
        .collect();

    for (point, struck) in impacts {
        resolve_impact(state, point, struck);
    }

    state.attacks.retain(|a| !a.is_done());
}

/// A rock landed at `point`; `struck` if the avatar was inside the blast
fn resolve_impact(state: &mut GameState, point: Vec2, struck: bool) {
    if struck {
        match state.avatar.take_hit(ROCK_DAMAGE) {
            HitOutcome::Ignored => {}
            HitOutcome::Damaged { health } => {
                log::debug!("Avatar hit, health {health}");
                state.emit(GameEvent::AvatarHit { health });
            }
            HitOutcome::Killed => {
                log::info!("Avatar died with score {}", state.score);
                state.emit(GameEvent::AvatarHit { health: 0 });
                state.emit(GameEvent::AvatarDied);
            }
        }
    }

    let splat = WebSplat::new(point, &mut state.rng);
    state.splats.push(splat);
}

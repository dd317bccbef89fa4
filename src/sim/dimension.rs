//! Dimension progression
//!
//! Hunting -> Survival -> Finale, each step through a portal that opens at
//! the map center once the current dimension's goal is met.

use glam::{IVec2, Vec2};

use super::entities::Portal;
use super::state::{Dimension, GameEvent, GameState};
use crate::consts::*;
use crate::map_center;

/// Open a portal to `destination` unless one already exists
pub fn open_portal(state: &mut GameState, destination: Dimension) -> bool {
    if state.portal.is_some() {
        return false;
    }
    log::info!(
        "Portal to dimension {} opened (score {})",
        destination.number(),
        state.score
    );
    state.portal = Some(Portal::new(map_center(), destination));
    state.emit(GameEvent::PortalOpened { destination });
    true
}

/// Open the Survival portal once enough prey has been caught
pub fn check_survival_portal(state: &mut GameState) {
    if state.dimension == Dimension::Hunting && state.score >= SURVIVAL_PORTAL_SCORE {
        open_portal(state, Dimension::Survival);
    }
}

/// Count one more rock survived; open the Finale portal at the goal
pub fn record_dodge(state: &mut GameState) {
    state.dodged += 1;
    if state.dodged >= FINALE_PORTAL_DODGES {
        open_portal(state, Dimension::Finale);
    }
}

/// Step through the portal if one covers `cell`. Consumes the portal.
pub fn try_traverse(state: &mut GameState, cell: IVec2) -> bool {
    let Some(portal) = &state.portal else {
        return false;
    };
    if !portal.contains_point(cell.as_vec2()) {
        return false;
    }

    let destination = portal.destination;
    state.portal = None;
    enter(state, destination);
    true
}

/// Switch dimensions and apply the entry effects of the new one
pub fn enter(state: &mut GameState, destination: Dimension) {
    if !state.dimension.leads_to(destination) {
        log::warn!(
            "Ignoring transition from dimension {} to {}",
            state.dimension.number(),
            destination.number()
        );
        return;
    }

    state.dimension = destination;
    match destination {
        Dimension::Hunting => {}
        Dimension::Survival => {
            state.prey.clear();
            state.dodged = 0;
            state.attack_timer = 0;
        }
        Dimension::Finale => {
            state.finale_ticks = 0;
        }
    }

    log::info!("Entered dimension {}", destination.number());
    state.emit(GameEvent::DimensionEntered(destination));
}

/// Portal position as a grid cell (for input targeting)
pub fn portal_cell(state: &GameState) -> Option<IVec2> {
    state
        .portal
        .as_ref()
        .map(|p| p.pos.round().as_ivec2())
}

/// Distance from a point to the open portal, if any
pub fn distance_to_portal(state: &GameState, point: Vec2) -> Option<f32> {
    state.portal.as_ref().map(|p| p.pos.distance(point))
}

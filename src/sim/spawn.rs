//! Prey population manager
//!
//! Keeps the Hunting dimension stocked: a small population until area-effect
//! mode unlocks, a large one afterwards. Other dimensions have no prey.

use rand::Rng;

use super::entities::{Prey, PreyKind};
use super::state::{Dimension, GameState};
use crate::consts::*;

/// Population the manager restocks to
pub fn target_population(area_unlocked: bool) -> usize {
    if area_unlocked {
        MAX_PREY_COUNT
    } else {
        INITIAL_PREY_COUNT
    }
}

/// Roll the variant of a freshly spawned prey
pub fn roll_kind(rng: &mut impl Rng) -> PreyKind {
    if rng.random_bool(RARE_SPAWN_CHANCE) {
        PreyKind::Rare
    } else {
        PreyKind::Common
    }
}

/// Spawn one prey on a random cell
pub fn spawn_prey(state: &mut GameState) -> u32 {
    let id = state.next_entity_id();
    let kind = roll_kind(&mut state.rng);
    let prey = Prey::spawn(id, kind, &mut state.rng);
    if kind == PreyKind::Rare {
        log::debug!("Rare prey {} spawned at {}", id, prey.cell);
    }
    state.prey.push(prey);
    id
}

/// Spawn prey until the population reaches its target.
///
/// Returns the number spawned. Does nothing outside the Hunting dimension.
pub fn restock(state: &mut GameState) -> usize {
    if state.dimension != Dimension::Hunting {
        return 0;
    }

    let target = target_population(state.avatar.area_unlocked);
    let mut spawned = 0;
    while state.prey.len() < target {
        spawn_prey(state);
        spawned += 1;
    }
    spawned
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_restock_fills_to_target() {
        let mut state = GameState::new(5);
        state.prey.truncate(3);
        assert_eq!(restock(&mut state), INITIAL_PREY_COUNT - 3);
        assert_eq!(state.prey.len(), INITIAL_PREY_COUNT);

        state.avatar.area_unlocked = true;
        assert_eq!(restock(&mut state), MAX_PREY_COUNT - INITIAL_PREY_COUNT);
        assert_eq!(state.prey.len(), MAX_PREY_COUNT);
    }

    #[test]
    fn test_restock_idle_outside_hunting() {
        let mut state = GameState::new(5);
        state.dimension = Dimension::Survival;
        state.prey.clear();
        assert_eq!(restock(&mut state), 0);
        assert!(state.prey.is_empty());
    }

    #[test]
    fn test_spawned_prey_inside_grid_with_unique_ids() {
        let mut state = GameState::new(11);
        state.avatar.area_unlocked = true;
        for _ in 0..10 {
            state.prey.clear();
            restock(&mut state);
        }
        for prey in &state.prey {
            assert!((0..GRID_SIZE).contains(&prey.cell.x));
            assert!((0..GRID_SIZE).contains(&prey.cell.y));
            assert!(prey.alive);
            assert_eq!(prey.hp, 1);
        }
        let mut ids: Vec<u32> = state.prey.iter().map(|p| p.id).collect();
        ids.dedup();
        assert_eq!(ids.len(), MAX_PREY_COUNT);
    }

    #[test]
    fn test_rare_spawns_are_rare() {
        let mut rng = Pcg32::seed_from_u64(99);
        let rare = (0..10_000)
            .filter(|_| roll_kind(&mut rng) == PreyKind::Rare)
            .count();
        assert!((100..350).contains(&rare), "rare count {rare}");
    }
}

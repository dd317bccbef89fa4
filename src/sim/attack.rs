//! Rock attack scheduler
//!
//! Once area-effect mode is unlocked, rocks fall on the avatar's position at
//! a pace that tightens with progress in the current dimension.

use super::dimension;
use super::entities::RockAttack;
use super::state::{Dimension, GameEvent, GameState};
use crate::consts::*;

/// Frames between rocks, or `None` where no rocks fall
pub fn attack_delay(dimension: Dimension, score: u64, dodged: u32) -> Option<u32> {
    let speedup = match dimension {
        Dimension::Hunting => {
            let steps = u32::try_from(score / HUNTING_SCORE_STEP).unwrap_or(u32::MAX);
            steps.saturating_mul(HUNTING_DELAY_STEP)
        }
        Dimension::Survival => (dodged / SURVIVAL_DODGE_STEP).saturating_mul(SURVIVAL_DELAY_STEP),
        Dimension::Finale => return None,
    };
    Some(ATTACK_BASE_DELAY.saturating_sub(speedup).max(ATTACK_MIN_DELAY))
}

/// Advance the attack countdown and launch a rock when it runs out
pub fn run_scheduler(state: &mut GameState) {
    if !state.avatar.area_unlocked || state.avatar.dead {
        return;
    }
    let Some(delay) = attack_delay(state.dimension, state.score, state.dodged) else {
        return;
    };

    state.attack_timer += 1;
    if state.attack_timer <= delay {
        return;
    }

    launch_attack(state);
    state.attack_timer = 0;

    if state.dimension == Dimension::Survival {
        dimension::record_dodge(state);
    }
}

/// Drop a rock on the avatar's current position
pub fn launch_attack(state: &mut GameState) -> u32 {
    let id = state.next_entity_id();
    let attack = RockAttack::new(id, state.avatar.pos, &mut state.rng);
    state.attacks.push(attack);
    state.emit(GameEvent::AttackLaunched);
    id
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_hunting_delay_formula() {
        assert_eq!(attack_delay(Dimension::Hunting, 0, 0), Some(60));
        assert_eq!(attack_delay(Dimension::Hunting, 9, 0), Some(60));
        assert_eq!(attack_delay(Dimension::Hunting, 10, 0), Some(54));
        assert_eq!(attack_delay(Dimension::Hunting, 70, 0), Some(18));
        assert_eq!(attack_delay(Dimension::Hunting, 100, 0), Some(15));
        assert_eq!(attack_delay(Dimension::Hunting, u64::MAX, 0), Some(15));
    }

    #[test]
    fn test_survival_delay_formula() {
        assert_eq!(attack_delay(Dimension::Survival, 500, 0), Some(60));
        assert_eq!(attack_delay(Dimension::Survival, 500, 4), Some(50));
        assert_eq!(attack_delay(Dimension::Survival, 500, 16), Some(20));
        assert_eq!(attack_delay(Dimension::Survival, 500, 20), Some(15));
    }

    #[test]
    fn test_finale_has_no_attacks() {
        assert_eq!(attack_delay(Dimension::Finale, 0, 0), None);
    }

    #[test]
    fn test_scheduler_waits_for_unlock() {
        let mut state = GameState::new(3);
        for _ in 0..200 {
            run_scheduler(&mut state);
        }
        assert!(state.attacks.is_empty());
        assert_eq!(state.attack_timer, 0);
    }

    #[test]
    fn test_scheduler_launches_after_delay() {
        let mut state = GameState::new(3);
        state.avatar.area_unlocked = true;

        for _ in 0..60 {
            run_scheduler(&mut state);
        }
        assert!(state.attacks.is_empty());

        run_scheduler(&mut state);
        assert_eq!(state.attacks.len(), 1);
        assert_eq!(state.attacks[0].target, state.avatar.pos);
        assert_eq!(state.attack_timer, 0);
        assert!(state.events.contains(&GameEvent::AttackLaunched));
    }

    #[test]
    fn test_scheduler_stops_when_dead() {
        let mut state = GameState::new(3);
        state.avatar.area_unlocked = true;
        state.avatar.dead = true;
        for _ in 0..200 {
            run_scheduler(&mut state);
        }
        assert!(state.attacks.is_empty());
    }

    #[test]
    fn test_survival_rocks_count_as_dodges() {
        let mut state = GameState::new(3);
        state.avatar.area_unlocked = true;
        state.dimension = Dimension::Survival;
        state.prey.clear();

        for _ in 0..61 {
            run_scheduler(&mut state);
        }
        assert_eq!(state.dodged, 1);
    }

    proptest! {
        #[test]
        fn delay_is_bounded(score in 0u64..10_000, dodged in 0u32..1_000) {
            for dim in [Dimension::Hunting, Dimension::Survival] {
                let delay = attack_delay(dim, score, dodged).unwrap_or(0);
                prop_assert!((ATTACK_MIN_DELAY..=ATTACK_BASE_DELAY).contains(&delay));
            }
        }
    }
}

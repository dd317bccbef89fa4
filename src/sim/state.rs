//! Game state and core simulation types
//!
//! The whole world lives in one `GameState`: construct it from a seed, feed
//! it inputs through `tick`, read it back for rendering.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::avatar::Avatar;
use super::entities::{Portal, Prey, PreyKind, RockAttack, WebLine, WebSplat};
use super::spawn;

/// Top-level game phase. Only ever moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum Dimension {
    /// Catch prey, unlock area-effect mode, open the first portal
    #[default]
    Hunting = 1,
    /// No prey, free ammo, survive the rock storm
    Survival = 2,
    /// Victory sequence
    Finale = 3,
}

impl Dimension {
    pub fn number(self) -> u8 {
        self as u8
    }

    /// Whether a transition from `self` to `to` is allowed
    pub fn leads_to(self, to: Dimension) -> bool {
        to > self
    }

    /// Whether actions cost ammo here
    pub fn charges_ammo(self) -> bool {
        self == Dimension::Hunting
    }
}

/// Milestones for the UI layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    PreyCaught { kind: PreyKind },
    AreaEffectUnlocked,
    PortalOpened { destination: Dimension },
    DimensionEntered(Dimension),
    AttackLaunched,
    AvatarHit { health: u32 },
    AvatarDied,
}

/// Why a player action did nothing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    AvatarDead,
    /// No actions in the finale
    Finale,
    /// Area-effect mode not unlocked yet
    Locked,
    OutOfAmmo,
}

/// What a player action did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    /// A web was shot; `targeted` counts the prey it was aimed at
    Fired { targeted: usize },
    /// The avatar has a new movement target
    Moved,
    /// A portal was used
    Traversed(Dimension),
    Rejected(RejectReason),
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Every random draw in the run comes from here
    pub rng: Pcg32,
    pub dimension: Dimension,
    /// Score (never decreases)
    pub score: u64,
    /// Rocks launched since entering the Survival dimension
    pub dodged: u32,
    /// Frames since the last rock was launched
    pub attack_timer: u32,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Frames spent in the Finale (drives the victory sequence)
    pub finale_ticks: u32,
    pub avatar: Avatar,
    /// Live prey (sorted by id)
    pub prey: Vec<Prey>,
    pub webs: Vec<WebLine>,
    pub splats: Vec<WebSplat>,
    /// Active rock attacks (sorted by id)
    pub attacks: Vec<RockAttack>,
    /// At most one portal exists at a time
    pub portal: Option<Portal>,
    /// Milestones raised since the shell last drained them
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create a new game with the given seed and its opening prey population
    pub fn new(seed: u64) -> Self {
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            dimension: Dimension::Hunting,
            score: 0,
            dodged: 0,
            attack_timer: 0,
            time_ticks: 0,
            finale_ticks: 0,
            avatar: Avatar::default(),
            prey: Vec::new(),
            webs: Vec::new(),
            splats: Vec::new(),
            attacks: Vec::new(),
            portal: None,
            events: Vec::new(),
            next_id: 1,
        };

        spawn::restock(&mut state);

        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all events raised so far
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Look up a live prey by id
    pub fn find_prey(&self, id: u32) -> Option<&Prey> {
        self.prey.iter().find(|p| p.id == id && p.alive)
    }

    /// True if the run is over, either way
    pub fn is_finished(&self) -> bool {
        self.avatar.dead || self.dimension == Dimension::Finale
    }

    /// Ensure collections are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.prey.sort_by_key(|p| p.id);
        self.attacks.sort_by_key(|a| a.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;

    #[test]
    fn test_new_game_defaults() {
        let state = GameState::new(42);
        assert_eq!(state.dimension, Dimension::Hunting);
        assert_eq!(state.score, 0);
        assert_eq!(state.prey.len(), INITIAL_PREY_COUNT);
        assert_eq!(state.avatar.ammo, 10);
        assert_eq!(state.avatar.health, 100);
        assert!(state.portal.is_none());
        assert!(state.prey.windows(2).all(|w| w[0].id < w[1].id));
    }

    #[test]
    fn test_dimension_order_is_one_way() {
        assert!(Dimension::Hunting.leads_to(Dimension::Survival));
        assert!(Dimension::Survival.leads_to(Dimension::Finale));
        assert!(!Dimension::Finale.leads_to(Dimension::Hunting));
        assert!(!Dimension::Finale.leads_to(Dimension::Survival));
        assert!(!Dimension::Survival.leads_to(Dimension::Survival));
        assert_eq!(Dimension::Survival.number(), 2);
    }

    #[test]
    fn test_snapshot_roundtrip_keeps_rng_stream() {
        use rand::Rng;

        let mut state = GameState::new(7);
        let json = serde_json::to_string(&state).expect("serialize");
        let mut restored: GameState = serde_json::from_str(&json).expect("deserialize");

        assert_eq!(restored.prey.len(), state.prey.len());
        let a: u32 = state.rng.random();
        let b: u32 = restored.rng.random();
        assert_eq!(a, b);
    }

    #[test]
    fn test_drain_events_empties_queue() {
        let mut state = GameState::new(1);
        state.emit(GameEvent::AvatarDied);
        assert_eq!(state.drain_events(), vec![GameEvent::AvatarDied]);
        assert!(state.events.is_empty());
    }
}

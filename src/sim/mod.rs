//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Frame-counted timers only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod attack;
pub mod autopilot;
pub mod avatar;
pub mod dimension;
pub mod entities;
pub mod spawn;
pub mod state;
pub mod tick;

pub use attack::attack_delay;
pub use autopilot::autopilot;
pub use avatar::{Avatar, HitOutcome};
pub use entities::{AttackPhase, Portal, Prey, PreyKind, RockAttack, WebLine, WebPhase, WebSplat};
pub use state::{ActionOutcome, Dimension, GameEvent, GameState, RejectReason};
pub use tick::{TickInput, primary_action, secondary_action, tick};

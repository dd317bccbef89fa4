//! Transient world entities
//!
//! Every entity advances by exactly one frame per `update()` and reports
//! `is_done()` once it should be pruned. Entities never reach into the rest
//! of the world: anything that affects another entity (a web reaching its
//! prey, a rock hitting the ground) is handed back to the caller, which
//! resolves it against whatever still exists at that point.

use glam::{IVec2, Vec2};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::Dimension;
use crate::consts::*;

/// Prey variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PreyKind {
    /// Ordinary fly
    #[default]
    Common,
    /// Golden bug, rare and much more rewarding
    Rare,
}

impl PreyKind {
    /// Score awarded for catching this prey
    pub fn score_reward(self) -> u64 {
        match self {
            PreyKind::Common => 1,
            PreyKind::Rare => 10,
        }
    }

    /// Web ammo awarded for catching this prey
    pub fn ammo_reward(self) -> u32 {
        match self {
            PreyKind::Common => 2,
            PreyKind::Rare => 10,
        }
    }

    /// Health restored for catching this prey
    pub fn heal_reward(self) -> u32 {
        match self {
            PreyKind::Common => 0,
            PreyKind::Rare => RARE_KILL_HEAL,
        }
    }

    fn pulse_rate(self) -> f32 {
        match self {
            PreyKind::Common => 0.1,
            PreyKind::Rare => 0.15,
        }
    }
}

/// A prey entity sitting on a grid cell
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prey {
    pub id: u32,
    pub kind: PreyKind,
    pub cell: IVec2,
    pub hp: u8,
    pub alive: bool,
    /// Wing/glow animation phase (cosmetic)
    pub pulse: f32,
}

impl Prey {
    pub fn new(id: u32, kind: PreyKind, cell: IVec2) -> Self {
        Self {
            id,
            kind,
            cell,
            hp: 1,
            alive: true,
            pulse: 0.0,
        }
    }

    /// Spawn prey of the given kind on a random cell
    pub fn spawn(id: u32, kind: PreyKind, rng: &mut impl Rng) -> Self {
        let cell = IVec2::new(rng.random_range(0..GRID_SIZE), rng.random_range(0..GRID_SIZE));
        let mut prey = Self::new(id, kind, cell);
        prey.pulse = rng.random_range(0.0..std::f32::consts::TAU);
        prey
    }

    pub fn update(&mut self) {
        self.pulse += self.kind.pulse_rate();
    }

    /// Apply one point of damage. Returns true if this hit killed it.
    pub fn apply_hit(&mut self) -> bool {
        if !self.alive {
            return false;
        }
        self.hp = self.hp.saturating_sub(1);
        if self.hp == 0 {
            self.alive = false;
            return true;
        }
        false
    }

    /// Euclidean distance (in cells) to a grid cell
    pub fn distance_to(&self, cell: IVec2) -> f32 {
        self.cell.as_vec2().distance(cell.as_vec2())
    }

    /// True if `cell` is within `reach` cells on both axes
    pub fn within_square(&self, cell: IVec2, reach: i32) -> bool {
        let d = (self.cell - cell).abs();
        d.x <= reach && d.y <= reach
    }
}

/// Web line phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WebPhase {
    /// Still travelling toward the destination
    Advancing,
    /// Arrived; only the opacity is changing now
    Fading,
}

/// A web shot in flight
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebLine {
    pub origin: Vec2,
    pub destination: Vec2,
    /// Prey this shot will damage on arrival (None for a plain shot)
    pub target: Option<u32>,
    /// Travel fraction in [0, 1]
    pub progress: f32,
    pub phase: WebPhase,
    pub opacity: f32,
}

impl WebLine {
    pub fn new(origin: Vec2, destination: Vec2, target: Option<u32>) -> Self {
        Self {
            origin,
            destination,
            target,
            progress: 0.0,
            phase: WebPhase::Advancing,
            opacity: 1.0,
        }
    }

    /// Advance one frame.
    ///
    /// Returns the target prey id on the single frame the line arrives.
    pub fn update(&mut self) -> Option<u32> {
        match self.phase {
            WebPhase::Advancing => {
                self.progress += WEB_SPEED;
                if self.progress >= 1.0 {
                    self.progress = 1.0;
                    self.phase = WebPhase::Fading;
                    return self.target;
                }
                None
            }
            WebPhase::Fading => {
                self.opacity -= WEB_FADE;
                None
            }
        }
    }

    pub fn is_done(&self) -> bool {
        self.phase == WebPhase::Fading && self.opacity <= 0.0
    }

    /// True while this line is still on its way to `prey_id`
    pub fn is_pending_for(&self, prey_id: u32) -> bool {
        self.phase == WebPhase::Advancing && self.target == Some(prey_id)
    }

    /// Current leading point of the line
    pub fn tip(&self) -> Vec2 {
        self.origin.lerp(self.destination, self.progress)
    }
}

/// A decorative web mark left on the ground
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebSplat {
    pub pos: Vec2,
    pub opacity: f32,
    /// Radius in grid units
    pub size: f32,
    pub rays: u8,
}

impl WebSplat {
    pub fn new(pos: Vec2, rng: &mut impl Rng) -> Self {
        Self {
            pos,
            opacity: 1.0,
            size: rng.random_range(3.75..6.25),
            rays: rng.random_range(8..14),
        }
    }

    pub fn update(&mut self) {
        self.opacity -= SPLAT_FADE;
    }

    pub fn is_done(&self) -> bool {
        self.opacity <= 0.0
    }
}

/// Number of outline points on a rock
pub const ROCK_OUTLINE_POINTS: usize = 8;

/// Rock attack lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum AttackPhase {
    /// Warning marker on the ground, rock not yet visible
    Warning { elapsed: u32 },
    /// Rock dropping; altitude counts down to 0
    Falling { altitude: f32 },
    /// Rock stuck in the ground
    Grounded { elapsed: u32 },
}

/// A rock dropped from the sky onto a target position
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RockAttack {
    pub id: u32,
    pub target: Vec2,
    pub phase: AttackPhase,
    /// Outline radii in grid units (cosmetic)
    pub shape: [f32; ROCK_OUTLINE_POINTS],
    resolved: bool,
    done: bool,
}

impl RockAttack {
    pub fn new(id: u32, target: Vec2, rng: &mut impl Rng) -> Self {
        let mut shape = [0.0; ROCK_OUTLINE_POINTS];
        for radius in &mut shape {
            *radius = rng.random_range(2.5..4.375);
        }
        Self {
            id,
            target,
            phase: AttackPhase::Warning { elapsed: 0 },
            shape,
            resolved: false,
            done: false,
        }
    }

    /// Advance one frame.
    ///
    /// Returns the impact point on the single frame the rock lands.
    pub fn update(&mut self) -> Option<Vec2> {
        match self.phase {
            AttackPhase::Warning { elapsed } if elapsed < ATTACK_WARNING_FRAMES => {
                self.phase = AttackPhase::Warning {
                    elapsed: elapsed + 1,
                };
                None
            }
            AttackPhase::Warning { .. } => self.fall(ROCK_START_ALTITUDE),
            AttackPhase::Falling { altitude } => self.fall(altitude),
            AttackPhase::Grounded { elapsed } => {
                let elapsed = elapsed + 1;
                self.phase = AttackPhase::Grounded { elapsed };
                if elapsed >= ATTACK_GROUNDED_FRAMES {
                    self.done = true;
                }
                None
            }
        }
    }

    fn fall(&mut self, altitude: f32) -> Option<Vec2> {
        let altitude = altitude - ROCK_FALL_STEP;
        if altitude > 0.0 {
            self.phase = AttackPhase::Falling { altitude };
            return None;
        }

        self.phase = AttackPhase::Grounded { elapsed: 0 };
        if self.resolved {
            return None;
        }
        self.resolved = true;
        Some(self.target)
    }

    /// Whether a body at `pos` is inside the impact radius
    pub fn strikes(&self, pos: Vec2) -> bool {
        self.target.distance(pos) < ROCK_HIT_RADIUS
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved
    }

    pub fn is_done(&self) -> bool {
        self.done
    }
}

/// A gateway to the next dimension
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Portal {
    pub pos: Vec2,
    pub destination: Dimension,
    /// Swirl animation phase (cosmetic)
    pub pulse: f32,
}

impl Portal {
    pub fn new(pos: Vec2, destination: Dimension) -> Self {
        Self {
            pos,
            destination,
            pulse: 0.0,
        }
    }

    pub fn update(&mut self) {
        self.pulse += 0.05;
    }

    /// Whether `point` is close enough to the portal to step through it
    pub fn contains_point(&self, point: Vec2) -> bool {
        self.pos.distance(point) < PORTAL_RADIUS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_web_line_reports_target_exactly_once() {
        let mut web = WebLine::new(Vec2::ZERO, Vec2::new(10.0, 0.0), Some(7));
        let mut reports = Vec::new();
        for _ in 0..200 {
            if let Some(id) = web.update() {
                reports.push(id);
            }
        }
        assert_eq!(reports, vec![7]);
        assert_eq!(web.progress, 1.0);
        assert!(web.is_done());
    }

    #[test]
    fn test_untargeted_web_never_reports() {
        let mut web = WebLine::new(Vec2::ZERO, Vec2::ONE, None);
        for _ in 0..40 {
            assert_eq!(web.update(), None);
        }
        assert!(web.is_done());
    }

    #[test]
    fn test_web_pending_only_while_advancing() {
        let mut web = WebLine::new(Vec2::ZERO, Vec2::ONE, Some(3));
        assert!(web.is_pending_for(3));
        assert!(!web.is_pending_for(4));
        while web.phase == WebPhase::Advancing {
            web.update();
        }
        assert!(!web.is_pending_for(3));
    }

    #[test]
    fn test_splat_fades_out() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut splat = WebSplat::new(Vec2::new(4.0, 4.0), &mut rng);
        assert!((8..14).contains(&splat.rays));
        let mut frames = 0;
        while !splat.is_done() {
            splat.update();
            frames += 1;
            assert!(frames <= 101, "splat never faded");
        }
        assert!(frames >= 99);
    }

    #[test]
    fn test_rock_attack_lifecycle() {
        let mut rng = Pcg32::seed_from_u64(2);
        let mut rock = RockAttack::new(1, Vec2::new(20.0, 20.0), &mut rng);

        for _ in 0..ATTACK_WARNING_FRAMES {
            assert_eq!(rock.update(), None);
            assert!(matches!(rock.phase, AttackPhase::Warning { .. }));
        }

        // 50 units at 4.375 per frame: lands on the 12th falling frame
        for _ in 0..11 {
            assert_eq!(rock.update(), None);
            assert!(matches!(rock.phase, AttackPhase::Falling { .. }));
        }
        assert_eq!(rock.update(), Some(Vec2::new(20.0, 20.0)));
        assert!(rock.is_resolved());
        assert_eq!(rock.phase, AttackPhase::Grounded { elapsed: 0 });

        for _ in 0..ATTACK_GROUNDED_FRAMES - 1 {
            assert_eq!(rock.update(), None);
            assert!(!rock.is_done());
        }
        assert_eq!(rock.update(), None);
        assert!(rock.is_done());
    }

    #[test]
    fn test_rock_strike_radius() {
        let mut rng = Pcg32::seed_from_u64(3);
        let rock = RockAttack::new(1, Vec2::new(50.0, 50.0), &mut rng);
        assert!(rock.strikes(Vec2::new(55.9, 50.0)));
        assert!(!rock.strikes(Vec2::new(56.0, 50.0)));
        assert!(rock.shape.iter().all(|r| (2.5..4.375).contains(r)));
    }

    #[test]
    fn test_prey_hit_kills_once() {
        let mut prey = Prey::new(1, PreyKind::Rare, IVec2::new(3, 3));
        assert!(prey.apply_hit());
        assert!(!prey.alive);
        assert!(!prey.apply_hit());
        assert_eq!(prey.kind.score_reward(), 10);
        assert_eq!(prey.kind.ammo_reward(), 10);
    }

    #[test]
    fn test_prey_square_reach() {
        let prey = Prey::new(1, PreyKind::Common, IVec2::new(10, 10));
        assert!(prey.within_square(IVec2::new(12, 8), 2));
        assert!(!prey.within_square(IVec2::new(13, 10), 2));
    }

    #[test]
    fn test_portal_containment() {
        let portal = Portal::new(Vec2::new(50.0, 50.0), Dimension::Survival);
        assert!(portal.contains_point(Vec2::new(53.0, 53.0)));
        assert!(!portal.contains_point(Vec2::new(54.0, 54.0)));
    }
}

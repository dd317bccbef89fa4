//! Platform abstraction layer
//!
//! Real-time helpers shared by the browser and native shells. The simulation
//! counts frames; anything measured in wall-clock milliseconds lives here,
//! along with the player-facing wording for simulation events.

use crate::sim::{Dimension, GameEvent};

/// A delay that can be armed once and fires once.
///
/// Timestamps are plain milliseconds from whatever clock the shell uses
/// (`performance.now()` in the browser, an `Instant` natively).
#[derive(Debug, Clone)]
pub struct OneShotTimer {
    delay_ms: f64,
    armed_at: Option<f64>,
    fired: bool,
}

impl OneShotTimer {
    pub fn new(delay_ms: f64) -> Self {
        Self {
            delay_ms,
            armed_at: None,
            fired: false,
        }
    }

    /// Start the countdown. Returns false if it was already armed.
    pub fn arm(&mut self, now_ms: f64) -> bool {
        if self.armed_at.is_some() {
            return false;
        }
        self.armed_at = Some(now_ms);
        true
    }

    /// Returns true exactly once, on the first poll after the delay elapses
    pub fn poll(&mut self, now_ms: f64) -> bool {
        match self.armed_at {
            Some(start) if !self.fired && now_ms - start >= self.delay_ms => {
                self.fired = true;
                true
            }
            _ => false,
        }
    }

    pub fn delay_ms(&self) -> f64 {
        self.delay_ms
    }

    pub fn is_armed(&self) -> bool {
        self.armed_at.is_some()
    }

    pub fn has_fired(&self) -> bool {
        self.fired
    }
}

/// A line of overlay text announcing a milestone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Notice {
    pub text: &'static str,
    /// Shown large instead of as a status line
    pub headline: bool,
    /// CSS color, if the line is tinted
    pub color: Option<&'static str>,
}

const PORTAL_TINT: Option<&str> = Some("#ff00ff");

/// Overlay wording for an event, if it deserves one
pub fn notice_for(event: &GameEvent) -> Option<Notice> {
    let notice = match event {
        GameEvent::AreaEffectUnlocked => Notice {
            text: "AOE Unlocked! Right-click to move & BEWARE OF ROCKS!",
            headline: false,
            color: None,
        },
        GameEvent::PortalOpened {
            destination: Dimension::Survival,
        } => Notice {
            text: "DIMENSIONAL PORTAL OPENED! Enter to escape the rocks!",
            headline: false,
            color: PORTAL_TINT,
        },
        GameEvent::PortalOpened { .. } => Notice {
            text: "30 ROCKS SURVIVED! A PORTAL TO REAL LIFE HAS OPENED!",
            headline: false,
            color: Some("#00ffff"),
        },
        GameEvent::DimensionEntered(Dimension::Survival) => Notice {
            text: "WELCOME TO THE SECOND DIMENSION. SURVIVE 30 ROCKS! INFINITE WEB ENABLED.",
            headline: false,
            color: PORTAL_TINT,
        },
        GameEvent::DimensionEntered(Dimension::Finale) => Notice {
            text: "YOU ARE NOW A REALLIFE 5PYIDER",
            headline: true,
            color: None,
        },
        GameEvent::AvatarDied => Notice {
            text: "THE END OF 5PYIDER",
            headline: true,
            color: None,
        },
        _ => return None,
    };
    Some(notice)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::PreyKind;

    #[test]
    fn test_fires_once_after_delay() {
        let mut timer = OneShotTimer::new(1200.0);
        assert!(!timer.poll(5000.0), "unarmed timer must not fire");

        assert!(timer.arm(1000.0));
        assert!(!timer.poll(2199.0));
        assert!(timer.poll(2200.0));
        assert!(!timer.poll(9000.0));
        assert!(timer.has_fired());
    }

    #[test]
    fn test_rearming_is_ignored() {
        let mut timer = OneShotTimer::new(1200.0);
        assert!(timer.arm(0.0));
        assert!(!timer.arm(1000.0));
        assert!(timer.poll(1200.0));
        assert!(timer.is_armed());
    }

    #[test]
    fn test_notices_follow_progression() {
        let unlock = notice_for(&GameEvent::AreaEffectUnlocked).expect("unlock notice");
        assert!(unlock.text.contains("AOE"));

        let finale = notice_for(&GameEvent::DimensionEntered(Dimension::Finale))
            .expect("finale notice");
        assert!(finale.headline);

        let survival_portal = notice_for(&GameEvent::PortalOpened {
            destination: Dimension::Survival,
        });
        assert_eq!(survival_portal.and_then(|n| n.color), Some("#ff00ff"));
    }

    #[test]
    fn test_routine_events_are_silent() {
        assert_eq!(notice_for(&GameEvent::AttackLaunched), None);
        assert_eq!(
            notice_for(&GameEvent::PreyCaught {
                kind: PreyKind::Rare
            }),
            None
        );
        assert_eq!(notice_for(&GameEvent::AvatarHit { health: 50 }), None);
    }
}

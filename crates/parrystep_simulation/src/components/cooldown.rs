//! Cooldown stamp
//!
//! "Earliest next allowed time" по `CombatClock::elapsed` (unscaled simulation time),
//! поэтому hitstop не растягивает кулдауны.

use bevy::prelude::*;

#[derive(Debug, Clone, Copy, Default, PartialEq, Reflect)]
pub struct CooldownTimer {
    pub ready_at: f64,
}

impl CooldownTimer {
    pub fn is_ready(&self, now: f64) -> bool {
        now >= self.ready_at
    }

    pub fn start(&mut self, now: f64, cooldown: f32) {
        self.ready_at = now + cooldown as f64;
    }

    pub fn remaining(&self, now: f64) -> f32 {
        (self.ready_at - now).max(0.0) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cooldown_lifecycle() {
        let mut timer = CooldownTimer::default();
        assert!(timer.is_ready(0.0));

        timer.start(1.0, 3.0);
        assert!(!timer.is_ready(3.5));
        assert!((timer.remaining(3.5) - 0.5).abs() < 1e-6);

        assert!(timer.is_ready(4.0)); // граница включительно
        assert_eq!(timer.remaining(10.0), 0.0);
    }
}

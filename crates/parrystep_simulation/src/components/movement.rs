//! Locomotion/pathfinding collaborator components
//!
//! Ядро пишет `LocomotionIntent` (move / set_destination / set_stopped),
//! адаптер (headless или rapier) применяет его и отдаёт обратно `LocomotionState`.

use bevy::prelude::*;

/// Что state machine хочет от локомоции на этот тик.
///
/// `move_delta` накапливается за тик и сбрасывается в Clock set.
/// `destination` живёт между тиками, пока его не заменят или не остановят агент.
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
pub struct LocomotionIntent {
    pub move_delta: Vec3,
    pub destination: Option<Vec3>,
    pub stopped: bool,
}

impl LocomotionIntent {
    /// `move(deltaVector)`
    pub fn move_by(&mut self, delta: Vec3) {
        self.move_delta += delta;
    }

    /// `setDestination(point)`; снимает stop.
    pub fn set_destination(&mut self, point: Vec3) {
        self.destination = Some(point);
        self.stopped = false;
    }

    /// `setStopped(bool)`
    pub fn set_stopped(&mut self, stopped: bool) {
        self.stopped = stopped;
    }

    pub fn clear_destination(&mut self) {
        self.destination = None;
    }
}

/// Что локомоция сообщила после применения intent'а (`velocity()`, `isGrounded()`).
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct LocomotionState {
    pub velocity: Vec3,
    pub grounded: bool,
}

impl Default for LocomotionState {
    fn default() -> Self {
        Self {
            velocity: Vec3::ZERO,
            grounded: true,
        }
    }
}

/// Pathfinding agent tuning (скорость погони, дистанция остановки).
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct NavAgent {
    pub speed: f32,
    pub stopping_distance: f32,
}

impl Default for NavAgent {
    fn default() -> Self {
        Self {
            speed: 3.5,
            stopping_distance: 2.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_by_accumulates() {
        let mut intent = LocomotionIntent::default();
        intent.move_by(Vec3::X);
        intent.move_by(Vec3::Z * 2.0);
        assert_eq!(intent.move_delta, Vec3::new(1.0, 0.0, 2.0));
    }

    #[test]
    fn test_set_destination_resumes_agent() {
        let mut intent = LocomotionIntent::default();
        intent.set_stopped(true);
        intent.set_destination(Vec3::new(3.0, 0.0, 4.0));
        assert!(!intent.stopped);
        assert_eq!(intent.destination, Some(Vec3::new(3.0, 0.0, 4.0)));
    }
}

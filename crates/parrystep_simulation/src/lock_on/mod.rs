//! Lock-on module
//!
//! Ближайшая враждебная цель в радиусе, переключение стиком с hysteresis,
//! auto-release при исчезновении цели. Игрок и камера читают `LockOnSelector`.

use bevy::prelude::*;

pub mod selector;
pub mod systems;

// Tests (separate files with _tests suffix)
#[cfg(test)]
mod selector_tests;

pub use selector::{
    nearest_candidate, AimMarker, AimPointRef, LockOnCandidate, LockOnConfig, LockOnSelector,
    LockOnSession, LockOnUpdate,
};
pub use systems::{update_lock_on, LockOnChanged};

use crate::schedules::{CombatEventAppExt, CombatSet, CombatTick};

/// Lock-on Plugin (Input set: до state machines, чтобы они видели актуальную цель)
pub struct LockOnPlugin;

impl Plugin for LockOnPlugin {
    fn build(&self, app: &mut App) {
        app.add_combat_event::<LockOnChanged>()
            .add_systems(CombatTick, update_lock_on.in_set(CombatSet::Input));
    }
}

//! Player action module
//!
//! State machine игрока (locomotion / dodge / attack / guard / parry / skill)
//! и её ECS обвязка.

use bevy::prelude::*;

pub mod config;
pub mod controller;
pub mod systems;


pub use config::PlayerConfig;
pub use controller::{
    AttackPhase, LockOnView, PlayerActionState, PlayerController, PlayerMotion, PlayerTickContext,
};
pub use systems::{clear_input_edges, tick_players};

use crate::combat::{Hurtbox, WeaponHitbox};
use crate::components::{Actor, Health};
use crate::error::Result;
use crate::lock_on::{LockOnConfig, LockOnSelector};
use crate::schedules::{CombatSet, CombatTick};

/// Player Plugin
///
/// - tick_players: Actions set (после lock-on в Input set)
/// - clear_input_edges: Cleanup set (edges живут ровно один тик)
pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(CombatTick, tick_players.in_set(CombatSet::Actions))
            .add_systems(CombatTick, clear_input_edges.in_set(CombatSet::Cleanup));
    }
}

/// Полный набор компонентов игрока. Невалидные тайминги отвергаются здесь.
pub fn player_bundle(
    config: PlayerConfig,
    lock_on: LockOnConfig,
    position: Vec3,
) -> Result<impl Bundle> {
    lock_on.validate()?;
    let controller = PlayerController::try_new(config)?;
    let health = Health::new(controller.config.max_health);
    let hitbox = WeaponHitbox::new(controller.config.weapon_damage);

    Ok((
        Name::new("Player"),
        Actor::player(),
        health,
        controller,
        LockOnSelector::new(lock_on),
        hitbox,
        Hurtbox::default(),
        Transform::from_translation(position),
    ))
}

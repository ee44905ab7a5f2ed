//! Enemy AI module
//!
//! Один реактивный FSM: Idle / Chasing / Attacking / Hitstunned / Staggered / Dead.
//! Никакого behaviour tree: враг видит только дистанцию до игрока и события урона.

use bevy::prelude::*;

pub mod components;
pub mod systems;

// Re-export основных типов
pub use components::{EnemyBrain, EnemyConfig, EnemyMotion, EnemyState, EnemyTickContext};
pub use systems::tick_enemy_brains;

use crate::combat::{Hurtbox, WeaponHitbox};
use crate::components::{Actor, Health, NavAgent};
use crate::error::Result;
use crate::player::tick_players;
use crate::schedules::{CombatSet, CombatTick};

/// AI Plugin
///
/// tick_enemy_brains: Actions set, после tick_players. Позиции обоих сторон
/// меняются только в Movement set, поэтому враг видит игрока на начало тика.
pub struct AIPlugin;

impl Plugin for AIPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            CombatTick,
            tick_enemy_brains
                .after(tick_players)
                .in_set(CombatSet::Actions),
        );
    }
}

/// Полный набор компонентов врага. `player`: relation, если уже известен.
pub fn enemy_bundle(
    config: EnemyConfig,
    position: Vec3,
    player: Option<Entity>,
) -> Result<impl Bundle> {
    let mut brain = EnemyBrain::try_new(config)?;
    brain.player = player;
    // Остановка чуть внутри attack range: на самой границе сравнение дистанций не сработает
    let nav = NavAgent {
        speed: brain.config.move_speed,
        stopping_distance: brain.config.attack_trigger_range * 0.9,
    };
    let health = Health::new(brain.config.max_health);
    let hitbox = WeaponHitbox::new(brain.config.weapon_damage);

    Ok((
        Name::new("Enemy"),
        Actor::enemy(),
        health,
        brain,
        nav,
        hitbox,
        Hurtbox::default(),
        Transform::from_translation(position),
    ))
}

//! Enemy FSM systems (Actions set).

use bevy::prelude::*;

use crate::ai::{EnemyBrain, EnemyTickContext};
use crate::combat::WeaponHitbox;
use crate::components::{AnimationRequests, LocomotionIntent, LocomotionState};
use crate::player::PlayerController;
use crate::time::CombatClock;

/// Система: продвинуть enemy FSM на один тик.
///
/// Relation к игроку резолвится лениво: если `brain.player` не задан или entity
/// исчез: берём первого живого игрока. Мёртвый игрок = игрока нет (враг встаёт).
/// Трупы с истёкшим `despawn_delay` удаляются через Commands.
pub fn tick_enemy_brains(
    mut commands: Commands,
    clock: Res<CombatClock>,
    mut enemies: Query<
        (
            Entity,
            &mut EnemyBrain,
            &mut Transform,
            &mut AnimationRequests,
            &mut LocomotionIntent,
            &LocomotionState,
            Option<&mut WeaponHitbox>,
        ),
        Without<PlayerController>,
    >,
    players: Query<(Entity, &Transform, &PlayerController), Without<EnemyBrain>>,
) {
    for (entity, mut brain, mut transform, mut anim, mut intent, locomotion, hitbox) in
        enemies.iter_mut()
    {
        if brain.player.map_or(true, |player| !players.contains(player)) {
            brain.player = players.iter().next().map(|(player, _, _)| player);
        }

        let player = brain
            .player
            .and_then(|player| players.get(player).ok())
            .filter(|(_, _, controller)| !controller.is_dead())
            .map(|(_, player_transform, _)| player_transform.translation);

        let ctx = EnemyTickContext {
            dt: clock.dt,
            now: clock.elapsed,
            position: transform.translation,
            rotation: transform.rotation,
            player,
            velocity: locomotion.velocity,
        };

        let motion = brain.tick(&ctx, &mut anim, &mut intent);
        transform.rotation = motion.rotation;

        if let Some(mut hitbox) = hitbox {
            hitbox.set_active(brain.strike_active());
        }

        if motion.despawn {
            crate::log(&format!("🗑️ Enemy {:?}: corpse removed", entity));
            commands.entity(entity).despawn();
        }
    }
}

//! Player systems (Actions set)

use bevy::prelude::*;

use super::controller::{LockOnView, PlayerController, PlayerTickContext};
use crate::combat::WeaponHitbox;
use crate::components::{AnimationRequests, LocomotionIntent, LocomotionState, PlayerInput};
use crate::lock_on::LockOnSelector;
use crate::time::CombatClock;

/// System: продвинуть player state machine на один тик.
///
/// Lock-on сессия уже обновлена в Input set этого тика. Результат:
/// - `LocomotionIntent::move_by` (применит locomotion adapter в Movement set)
/// - ориентация пишется прямо в `Transform`
/// - `WeaponHitbox` включён только в strike window
pub fn tick_players(
    clock: Res<CombatClock>,
    mut players: Query<(
        &mut PlayerController,
        &PlayerInput,
        &mut Transform,
        &mut AnimationRequests,
        &mut LocomotionIntent,
        &LocomotionState,
        Option<&LockOnSelector>,
        Option<&mut WeaponHitbox>,
    )>,
    targets: Query<&Transform, Without<PlayerController>>,
) {
    for (mut controller, input, mut transform, mut anim, mut intent, locomotion, selector, hitbox) in
        players.iter_mut()
    {
        let lock_on = selector.and_then(|selector| selector.session()).map(|session| LockOnView {
            target: session.target,
            position: session.root,
        });
        let action_target = controller
            .action_target()
            .and_then(|target| targets.get(target).ok())
            .map(|target| target.translation);

        let ctx = PlayerTickContext {
            dt: clock.dt,
            now: clock.elapsed,
            position: transform.translation,
            rotation: transform.rotation,
            grounded: locomotion.grounded,
            lock_on,
            action_target,
        };

        let motion = controller.tick(&ctx, input, &mut anim);
        intent.move_by(motion.translation);
        transform.rotation = motion.rotation;

        if let Some(mut hitbox) = hitbox {
            hitbox.set_active(controller.strike_active());
        }
    }
}

/// System: сброс one-tick input edges (Cleanup set).
pub fn clear_input_edges(mut inputs: Query<&mut PlayerInput>) {
    for mut input in inputs.iter_mut() {
        input.clear_edges();
    }
}

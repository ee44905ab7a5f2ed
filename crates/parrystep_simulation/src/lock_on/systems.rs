//! Lock-on systems (Input set)

use bevy::prelude::*;

use super::selector::{AimMarker, AimPointRef, LockOnCandidate, LockOnSelector, LockOnUpdate};
use crate::components::{Actor, Health, PlayerInput};

/// Событие: цель lock-on сменилась (acquire / switch / release).
///
/// Для camera collaborator (LookAt + priority) и cursor UI.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockOnChanged {
    pub player: Entity,
    pub target: Option<Entity>,
}

/// Система: auto-release → switch (look axis) → toggle (edge).
///
/// Кандидаты: живые акторы враждебной команды, отсортированные по Entity
/// (детерминированный порядок для tie-break).
pub fn update_lock_on(
    mut selectors: Query<(Entity, &mut LockOnSelector, &PlayerInput, &Transform, &Actor)>,
    targets: Query<(Entity, &Actor, &Transform, &Health, Option<&AimMarker>), Without<LockOnSelector>>,
    markers: Query<&Transform, Without<LockOnSelector>>,
    mut changed: EventWriter<LockOnChanged>,
) {
    for (player, mut selector, input, transform, actor) in selectors.iter_mut() {
        let origin = transform.translation;

        // 1. Stale reference: цель или её aim point исчезли
        if let Some(session) = selector.session().copied() {
            let root = targets
                .get(session.target)
                .ok()
                .map(|(_, _, target_transform, _, _)| target_transform.translation);
            let marker = match session.aim {
                AimPointRef::Marker(marker) => markers.get(marker).ok().map(|m| m.translation),
                AimPointRef::RootOffset(_) => None,
            };
            if let LockOnUpdate::Released(target) = selector.refresh(root, marker) {
                crate::log(&format!("🎯 LockOn: target {:?} gone → released", target));
                changed.write(LockOnChanged { player, target: None });
            }
        }

        let wants_switch = selector.session().is_some()
            && input.look_axis.x.abs() > selector.config.switch_threshold;
        if !input.lock_on && !wants_switch {
            // Re-arm hysteresis без сбора кандидатов
            selector.update_switch(origin, input.look_axis, &[]);
            continue;
        }

        let mut candidates: Vec<LockOnCandidate> = targets
            .iter()
            .filter(|(_, target_actor, _, health, _)| actor.is_hostile_to(target_actor) && health.is_alive())
            .map(|(entity, _, target_transform, _, aim_marker)| LockOnCandidate {
                entity,
                position: target_transform.translation,
                marker: aim_marker.and_then(|aim_marker| {
                    markers
                        .get(aim_marker.marker)
                        .ok()
                        .map(|m| (aim_marker.marker, m.translation))
                }),
            })
            .collect();
        candidates.sort_by_key(|candidate| candidate.entity);

        // 2. Switch
        if let LockOnUpdate::Switched { from, to } =
            selector.update_switch(origin, input.look_axis, &candidates)
        {
            crate::log(&format!("🎯 LockOn: switched {:?} → {:?}", from, to));
            changed.write(LockOnChanged { player, target: Some(to) });
        }

        // 3. Toggle
        if input.lock_on {
            match selector.toggle(origin, &candidates) {
                LockOnUpdate::Acquired(target) => {
                    crate::log(&format!("🎯 LockOn: acquired {:?}", target));
                    changed.write(LockOnChanged { player, target: Some(target) });
                }
                LockOnUpdate::Released(target) => {
                    crate::log(&format!("🎯 LockOn: released {:?}", target));
                    changed.write(LockOnChanged { player, target: None });
                }
                _ => {
                    crate::log("🎯 LockOn: no target in range");
                }
            }
        }
    }
}

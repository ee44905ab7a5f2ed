//! Locomotion adapters
//!
//! Архитектура:
//! - Ядро пишет `LocomotionIntent` (move_delta за тик + destination для погони)
//! - Адаптер превращает intent в смещение и отдаёт `LocomotionState` (velocity, grounded)
//! - Headless: прямая интеграция в Transform + плоский пол на y = 0
//! - Rapier: смещение уходит в `KinematicCharacterController`, grounded/velocity читаются
//!   из `KinematicCharacterControllerOutput`
//!
//! Детерминизм: headless путь зависит только от `CombatClock::dt`.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use crate::components::{LocomotionIntent, LocomotionState, NavAgent};
use crate::schedules::{CombatSet, CombatTick};
use crate::time::CombatClock;

/// Смещение за тик: явный `move_delta` + шаг погони к `destination`.
///
/// Погоня идёт по прямой в горизонтальной плоскости со скоростью агента и
/// останавливается на `stopping_distance`. `stopped` и отсутствие `NavAgent`
/// отключают погоню, но не `move_delta`.
pub fn locomotion_delta(
    position: Vec3,
    intent: &LocomotionIntent,
    agent: Option<&NavAgent>,
    dt: f32,
) -> Vec3 {
    let mut delta = intent.move_delta;

    if let (Some(destination), Some(agent), false) = (intent.destination, agent, intent.stopped) {
        let to_destination = Vec3::new(destination.x - position.x, 0.0, destination.z - position.z);
        let distance = to_destination.length();
        let remaining = distance - agent.stopping_distance;
        if remaining > 0.0 {
            let step = (agent.speed * dt).min(remaining);
            delta += to_destination / distance * step;
        }
    }

    delta
}

/// Система: headless интеграция (Movement set)
///
/// Пол на y = 0: всё, что ниже, прижимается к полу и считается grounded.
pub fn integrate_locomotion(
    clock: Res<CombatClock>,
    mut query: Query<
        (
            &mut Transform,
            &LocomotionIntent,
            &mut LocomotionState,
            Option<&NavAgent>,
        ),
        Without<KinematicCharacterController>,
    >,
) {
    for (mut transform, intent, mut state, agent) in query.iter_mut() {
        let before = transform.translation;
        let mut after = before + locomotion_delta(before, intent, agent, clock.dt);

        state.grounded = after.y <= 0.0;
        if state.grounded {
            after.y = 0.0;
        }

        transform.translation = after;
        state.velocity = if clock.dt > 0.0 {
            (after - before) / clock.dt
        } else {
            Vec3::ZERO
        };
    }
}

/// Scaled dt, с которым смещение ушло в контроллер.
///
/// Output rapier'а отстаёт на тик, поэтому velocity делится на dt того тика,
/// а не текущего (между ними мог включиться или закончиться hitstop).
#[derive(Component, Debug, Clone, Copy, Default, PartialEq)]
pub struct SubmittedStep {
    pub dt: f32,
}

/// Система: intent → `KinematicCharacterController::translation` (Movement set)
pub fn drive_character_controllers(
    clock: Res<CombatClock>,
    mut query: Query<(
        &Transform,
        &LocomotionIntent,
        Option<&NavAgent>,
        &mut KinematicCharacterController,
        &mut SubmittedStep,
    )>,
) {
    for (transform, intent, agent, mut controller, mut step) in query.iter_mut() {
        let delta = locomotion_delta(transform.translation, intent, agent, clock.dt);
        controller.translation = (delta != Vec3::ZERO).then_some(delta);
        step.dt = clock.dt;
    }
}

/// Система: `KinematicCharacterControllerOutput` → `LocomotionState`
///
/// Output приходит от rapier step'а предыдущего тика (отставание на один тик).
pub fn read_character_controller_output(
    mut query: Query<(&KinematicCharacterControllerOutput, &SubmittedStep, &mut LocomotionState)>,
) {
    for (output, step, mut state) in query.iter_mut() {
        state.grounded = output.grounded;
        state.velocity = if step.dt > 0.0 {
            output.effective_translation / step.dt
        } else {
            Vec3::ZERO
        };
    }
}

/// Headless locomotion (тесты, сервер, demo)
pub struct HeadlessLocomotionPlugin;

impl Plugin for HeadlessLocomotionPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(CombatTick, integrate_locomotion.in_set(CombatSet::Movement));
    }
}

/// Rapier locomotion
///
/// Сам `RapierPhysicsPlugin` добавляет host app (обычно `.in_fixed_schedule()`).
pub struct RapierLocomotionPlugin;

impl Plugin for RapierLocomotionPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            CombatTick,
            (read_character_controller_output, drive_character_controllers)
                .chain()
                .in_set(CombatSet::Movement),
        );
    }
}

/// Rapier компоненты персонажа: kinematic capsule + character controller.
///
/// Высота 1.8 м (0.5 + 0.5 + 2 × 0.4), root у ног.
pub fn kinematic_character_bundle() -> impl Bundle {
    (
        RigidBody::KinematicPositionBased,
        Collider::capsule(Vec3::new(0.0, 0.4, 0.0), Vec3::new(0.0, 1.4, 0.0), 0.4),
        KinematicCharacterController::default(),
        SubmittedStep::default(),
    )
}

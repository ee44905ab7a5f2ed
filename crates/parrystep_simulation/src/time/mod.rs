//! Simulation clock + time dilation (hitstop)
//!
//! `CombatClock`: единственный источник времени для боевой логики.
//! `TimeDilation`: единственный writer глобального time scale.
//!
//! Порядок внутри Clock set:
//! 1. advance_clock: scale семплируется ДО того, как dilation съест real_dt этого тика
//! 2. clear_tick_requests: сброс animation triggers и move_delta прошлого тика

use bevy::prelude::*;

use crate::components::{AnimationRequests, LocomotionIntent};
use crate::logger;
use crate::schedules::{CombatSet, CombatTick};


/// Время симуляции.
///
/// - `real_dt`: unscaled delta текущего тика
/// - `dt`: scaled delta (0 во время hitstop): им двигаются все таймеры состояний
/// - `elapsed`: unscaled время с начала симуляции: база для `CooldownTimer`
#[derive(Resource, Debug, Clone, Default)]
pub struct CombatClock {
    pub real_dt: f32,
    pub dt: f32,
    pub elapsed: f64,
    pub scaled_elapsed: f64,
    pub tick: u64,
    pending_real_dt: f32,
}

impl CombatClock {
    /// Ставит real delta в очередь следующего прогона `CombatTick`.
    pub fn queue(&mut self, real_dt: f32) {
        self.pending_real_dt = real_dt.max(0.0);
    }

    /// Продвигает часы на поставленный в очередь real delta с заданным scale.
    pub fn advance(&mut self, time_scale: f32) {
        self.real_dt = self.pending_real_dt;
        self.dt = self.real_dt * time_scale;
        self.elapsed += self.real_dt as f64;
        self.scaled_elapsed += self.dt as f64;
        self.tick = self.tick.wrapping_add(1);
        self.pending_real_dt = 0.0;
    }
}

const UNFREEZE_EPSILON: f32 = 1e-6;

/// Hitstop controller: `Running` → `Frozen(remaining)` → `Running`
///
/// Один экземпляр на мир (Resource), передаётся системам явно.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Default, Reflect)]
pub enum TimeDilation {
    #[default]
    Running,
    Frozen { remaining: f32 },
}

impl TimeDilation {
    /// `requestFreeze(duration)`. No-op (false) если уже заморожено или duration ≤ 0.
    pub fn request_freeze(&mut self, duration: f32) -> bool {
        if self.is_frozen() || duration <= 0.0 {
            return false;
        }
        *self = TimeDilation::Frozen { remaining: duration };
        true
    }

    /// Продвигает unfreeze таймер на unscaled delta. true: на тике разморозки.
    pub fn tick(&mut self, real_dt: f32) -> bool {
        let TimeDilation::Frozen { remaining } = self else {
            return false;
        };
        *remaining -= real_dt;
        if *remaining > UNFREEZE_EPSILON {
            return false;
        }
        *self = TimeDilation::Running;
        true
    }

    pub fn time_scale(&self) -> f32 {
        match self {
            TimeDilation::Running => 1.0,
            TimeDilation::Frozen { .. } => 0.0,
        }
    }

    pub fn is_frozen(&self) -> bool {
        matches!(self, TimeDilation::Frozen { .. })
    }

    pub fn remaining(&self) -> Option<f32> {
        match self {
            TimeDilation::Running => None,
            TimeDilation::Frozen { remaining } => Some(*remaining),
        }
    }
}

/// System: продвинуть часы и hitstop таймер (Clock set, первым).
pub fn advance_clock(mut clock: ResMut<CombatClock>, mut dilation: ResMut<TimeDilation>) {
    clock.advance(dilation.time_scale());

    if dilation.tick(clock.real_dt) {
        logger::log(&format!("⏱️ Hitstop released at tick {}", clock.tick));
    }
}

/// System: сброс one-tick запросов к collaborators.
pub fn clear_tick_requests(
    mut animators: Query<&mut AnimationRequests>,
    mut intents: Query<&mut LocomotionIntent>,
) {
    for mut anim in animators.iter_mut() {
        anim.triggers.clear();
    }
    for mut intent in intents.iter_mut() {
        intent.move_delta = Vec3::ZERO;
    }
}

/// Clock plugin: ресурсы времени + системы Clock set.
pub struct CombatClockPlugin;

impl Plugin for CombatClockPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CombatClock>()
            .init_resource::<TimeDilation>()
            .add_systems(
                CombatTick,
                (advance_clock, clear_tick_requests)
                    .chain()
                    .in_set(CombatSet::Clock),
            );
    }
}

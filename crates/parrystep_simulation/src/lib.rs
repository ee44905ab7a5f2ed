//! Parrystep Simulation Core
//!
//! Детерминированное боевое ядро на Bevy 0.16:
//! player state machine, enemy FSM, hit resolution (parry > guard > hit),
//! lock-on и hitstop. Анимация, камера, VFX и навигация: внешние collaborators,
//! ядро общается с ними через компоненты-запросы и события.
//!
//! Один тик = один прогон schedule `CombatTick` (см. `schedules`).

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod ai;
pub mod combat;
pub mod components;
pub mod config;
pub mod error;
pub mod lock_on;
pub mod logger;
pub mod physics;
pub mod player;
pub mod schedules;
pub mod time;

// Re-export базовых типов для удобства
pub use ai::{enemy_bundle, AIPlugin, EnemyBrain, EnemyConfig, EnemyState};
pub use combat::{
    CameraImpulseRequested, CombatPlugin, DefenseStance, EffectSpawnRequested, EntityDied, HitEvent,
    HitFeedbackConfig, HitOutcome, HitResolved, Hurtbox, WeaponHitbox,
};
pub use components::*;
pub use config::CombatTuning;
pub use error::ConfigError;
pub use lock_on::{AimMarker, LockOnChanged, LockOnConfig, LockOnPlugin, LockOnSelector};
pub use logger::{
    init_logger, log, log_error, log_info, log_warning, set_log_level, set_logger, LogLevel,
    LogPrinter,
};
pub use physics::{kinematic_character_bundle, HeadlessLocomotionPlugin, RapierLocomotionPlugin};
pub use player::{player_bundle, PlayerActionState, PlayerConfig, PlayerController, PlayerPlugin};
pub use schedules::{
    drive_combat_tick, run_combat_tick, CombatEventAppExt, CombatSet, CombatTick,
};
pub use time::{CombatClock, CombatClockPlugin, TimeDilation};

/// Какой locomotion adapter обслуживает Movement set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LocomotionBackend {
    /// Прямая интеграция в Transform (тесты, сервер)
    #[default]
    Headless,
    /// `KinematicCharacterController` (host app добавляет RapierPhysicsPlugin)
    Rapier,
}

/// Главный plugin симуляции (объединяет все подсистемы)
#[derive(Default)]
pub struct SimulationPlugin {
    pub tuning: CombatTuning,
    pub locomotion: LocomotionBackend,
}

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        schedules::configure_combat_schedule(app);

        app
            // Fixed timestep 60Hz для simulation tick (легче считать интервалы)
            .insert_resource(Time::<Fixed>::from_hz(60.0))
            // Детерминистичный RNG (seed по умолчанию)
            .insert_resource(DeterministicRng::new(42))
            // Подсистемы
            .add_plugins((
                CombatClockPlugin,
                LockOnPlugin,
                PlayerPlugin,
                AIPlugin,
                CombatPlugin,
            ))
            // Feedback tuning перекрывает default CombatPlugin (если валиден)
            .insert_resource(self.validated_hits());

        match self.locomotion {
            LocomotionBackend::Headless => app.add_plugins(HeadlessLocomotionPlugin),
            LocomotionBackend::Rapier => app.add_plugins(RapierLocomotionPlugin),
        };

        // Один CombatTick на каждый FixedUpdate
        app.add_systems(FixedUpdate, drive_combat_tick);
    }
}

impl SimulationPlugin {
    /// Player/enemy/lock-on секции проверяются при сборке bundle'ов,
    /// hit feedback: здесь. Невалидный конфиг → defaults + ERROR в лог.
    fn validated_hits(&self) -> HitFeedbackConfig {
        match self.tuning.hits.validate() {
            Ok(()) => self.tuning.hits.clone(),
            Err(err) => {
                log_error(&format!("❌ Invalid hit feedback tuning ({}), using defaults", err));
                HitFeedbackConfig::default()
            }
        }
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless симуляции
pub fn create_headless_app(seed: u64) -> App {
    create_headless_app_with(seed, CombatTuning::default())
}

/// Как `create_headless_app`, но с явным tuning (например, из RON).
pub fn create_headless_app_with(seed: u64, tuning: CombatTuning) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .add_plugins(SimulationPlugin {
            tuning,
            locomotion: LocomotionBackend::Headless,
        })
        .insert_resource(DeterministicRng::new(seed));

    app
}

/// Snapshot мира для сравнения детерминизма
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    // Сериализуем в байты через Debug (простейший способ)
    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy_rapier3d::prelude::KinematicCharacterController;

    #[test]
    fn test_invalid_hit_tuning_falls_back_to_defaults() {
        let mut tuning = CombatTuning::default();
        tuning.hits.hitstop_duration = -1.0;
        let app = create_headless_app_with(1, tuning);

        assert_eq!(
            app.world().resource::<HitFeedbackConfig>().hitstop_duration,
            HitFeedbackConfig::default().hitstop_duration
        );
    }

    #[test]
    fn test_valid_hit_tuning_is_applied() {
        let mut tuning = CombatTuning::default();
        tuning.hits.hitstop_duration = 0.25;
        let app = create_headless_app_with(1, tuning);

        assert_eq!(app.world().resource::<HitFeedbackConfig>().hitstop_duration, 0.25);
    }

    #[test]
    fn test_rapier_backend_routes_player_motion_to_controller() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins).add_plugins(SimulationPlugin {
            tuning: CombatTuning::default(),
            locomotion: LocomotionBackend::Rapier,
        });

        let world = app.world_mut();
        let player = world
            .spawn((
                player_bundle(PlayerConfig::default(), LockOnConfig::default(), Vec3::ZERO).unwrap(),
                kinematic_character_bundle(),
            ))
            .id();
        world.get_mut::<PlayerInput>(player).unwrap().move_axis = Vec2::new(0.0, 1.0);

        run_combat_tick(world, 1.0 / 60.0);

        // Смещение ушло в контроллер, Transform двигает только rapier
        let translation = world
            .get::<KinematicCharacterController>(player)
            .unwrap()
            .translation
            .unwrap();
        assert!(translation.z < 0.0, "translation = {:?}", translation);
        assert_eq!(world.get::<Transform>(player).unwrap().translation, Vec3::ZERO);
        assert_eq!(world.get::<physics::SubmittedStep>(player).unwrap().dt, 1.0 / 60.0);
    }
}

//! Combat integration test
//!
//! Игрок против врагов в headless App, тик за тиком через `run_combat_tick`.
//!
//! Проверяем:
//! - parry / guard / hit end-to-end (contacts → resolution → state machines)
//! - hitstop замораживает scaled время
//! - смерть, единственный EntityDied, удаление трупа
//! - lock-on acquire / switch / auto-release
//!
//! События собирает `record_events` в Cleanup set: буферы живут два тика.

use bevy::prelude::*;
use parrystep_simulation::*;

const DT: f32 = 1.0 / 60.0;

/// Журнал событий за весь прогон
#[derive(Resource, Default)]
struct Recorded {
    resolved: Vec<HitResolved>,
    died: Vec<EntityDied>,
    lock_on: Vec<LockOnChanged>,
}

fn record_events(
    mut recorded: ResMut<Recorded>,
    mut resolved: EventReader<HitResolved>,
    mut died: EventReader<EntityDied>,
    mut lock_on: EventReader<LockOnChanged>,
) {
    recorded.resolved.extend(resolved.read().copied());
    recorded.died.extend(died.read().copied());
    recorded.lock_on.extend(lock_on.read().copied());
}

/// Helper: headless App + журнал событий + игрок в начале координат
fn create_combat_app(tuning: CombatTuning) -> (App, Entity) {
    let mut app = create_headless_app_with(42, tuning.clone());
    app.init_resource::<Recorded>()
        .add_systems(CombatTick, record_events.in_set(CombatSet::Cleanup));
    let player = app
        .world_mut()
        .spawn(player_bundle(tuning.player, tuning.lock_on, Vec3::ZERO).unwrap())
        .id();
    (app, player)
}

fn spawn_enemy(app: &mut App, config: EnemyConfig, position: Vec3, player: Entity) -> Entity {
    app.world_mut()
        .spawn(enemy_bundle(config, position, Some(player)).unwrap())
        .id()
}

fn tick(app: &mut App) {
    run_combat_tick(app.world_mut(), DT);
}

fn input(app: &mut App, player: Entity) -> Mut<'_, PlayerInput> {
    app.world_mut().get_mut::<PlayerInput>(player).unwrap()
}

fn recorded(app: &App) -> &Recorded {
    app.world().resource::<Recorded>()
}

fn enemy_state(app: &App, enemy: Entity) -> EnemyState {
    app.world().get::<EnemyBrain>(enemy).unwrap().state
}

/// Враг, который никого не видит: стоит манекеном
fn dummy_config() -> EnemyConfig {
    EnemyConfig {
        detection_range: 1.0,
        attack_trigger_range: 0.5,
        knockback_per_damage: 0.0,
        ..default()
    }
}

#[test]
fn test_parry_staggers_attacking_enemy() {
    let (mut app, player) = create_combat_app(CombatTuning::default());
    let enemy = spawn_enemy(&mut app, EnemyConfig::default(), Vec3::new(0.0, 0.0, -1.5), player);

    input(&mut app, player).guard = true;

    let mut parry_pressed = false;
    let mut saw_stagger = false;
    for _ in 0..120 {
        if let EnemyState::Attacking { elapsed } = enemy_state(&app, enemy) {
            if !parry_pressed && elapsed >= 0.15 {
                input(&mut app, player).attack = true;
                parry_pressed = true;
            }
        }
        tick(&mut app);
        saw_stagger |= matches!(enemy_state(&app, enemy), EnemyState::Staggered { .. });
    }

    assert!(parry_pressed, "enemy never attacked");
    let resolved = &recorded(&app).resolved;
    assert!(resolved
        .iter()
        .any(|hit| hit.outcome == HitOutcome::Parried && hit.defender == player));
    assert!(resolved.iter().all(|hit| hit.outcome != HitOutcome::Hit));
    assert!(saw_stagger);
    assert_eq!(app.world().get::<Health>(player).unwrap().current, 100);
}

#[test]
fn test_guard_blocks_chasing_enemy() {
    let (mut app, player) = create_combat_app(CombatTuning::default());
    let enemy = spawn_enemy(&mut app, EnemyConfig::default(), Vec3::new(0.0, 0.0, -5.0), player);

    input(&mut app, player).guard = true;
    for _ in 0..180 {
        tick(&mut app);
    }

    // Враг догнал и остановился внутри attack range
    let distance = app.world().get::<Transform>(enemy).unwrap().translation.length();
    assert!(distance < 2.0, "distance = {}", distance);

    let resolved = &recorded(&app).resolved;
    assert!(resolved.iter().any(|hit| hit.outcome == HitOutcome::Guarded));
    assert!(resolved.iter().all(|hit| hit.damage_applied == 0));
    assert_eq!(app.world().get::<Health>(player).unwrap().current, 100);
    assert_eq!(
        app.world().get::<PlayerController>(player).unwrap().state,
        PlayerActionState::Guarding
    );
}

#[test]
fn test_hitstop_freezes_scaled_time() {
    let (mut app, player) = create_combat_app(CombatTuning::default());
    spawn_enemy(&mut app, dummy_config(), Vec3::new(0.0, 0.0, -1.5), player);

    input(&mut app, player).attack = true;
    let mut frozen_ticks = None;
    for _ in 0..60 {
        tick(&mut app);
        let dt = app.world().resource::<CombatClock>().dt;
        match frozen_ticks {
            None if !recorded(&app).resolved.is_empty() => frozen_ticks = Some(0),
            Some(count) if dt == 0.0 => frozen_ticks = Some(count + 1),
            Some(_) => break,
            None => {}
        }
    }

    // 0.1 s при 60 Hz
    assert_eq!(frozen_ticks, Some(6));
}

#[test]
fn test_player_kills_enemy_and_corpse_is_removed() {
    let (mut app, player) = create_combat_app(CombatTuning::default());
    let enemy = spawn_enemy(&mut app, dummy_config(), Vec3::new(0.0, 0.0, -1.5), player);

    for tick_index in 0..500 {
        input(&mut app, player).attack = tick_index % 60 == 0;
        tick(&mut app);
    }

    // 30 HP / 10 dmg: ровно три удара, дальше труп не задевается
    let resolved = &recorded(&app).resolved;
    assert_eq!(resolved.len(), 3);
    assert!(resolved.iter().all(|hit| hit.outcome == HitOutcome::Hit));

    assert_eq!(
        recorded(&app).died,
        vec![EntityDied {
            entity: enemy,
            killer: Some(player)
        }]
    );
    assert!(app.world().get_entity(enemy).is_err());
}

#[test]
fn test_enemy_kills_player_and_stands_down() {
    let mut tuning = CombatTuning::default();
    tuning.player.max_health = 10;
    let (mut app, player) = create_combat_app(tuning);
    let enemy = spawn_enemy(&mut app, EnemyConfig::default(), Vec3::new(0.0, 0.0, -1.5), player);

    for _ in 0..420 {
        tick(&mut app);
    }

    assert!(app.world().get::<PlayerController>(player).unwrap().is_dead());
    assert_eq!(
        recorded(&app).died,
        vec![EntityDied {
            entity: player,
            killer: Some(enemy)
        }]
    );
    // Мёртвый игрок = игрока нет
    assert_eq!(enemy_state(&app, enemy), EnemyState::Idle);
}

#[test]
fn test_lock_on_acquires_nearest_and_releases_on_despawn() {
    let (mut app, player) = create_combat_app(CombatTuning::default());
    spawn_enemy(&mut app, dummy_config(), Vec3::new(0.0, 0.0, -5.0), player);
    let nearest = spawn_enemy(&mut app, dummy_config(), Vec3::new(3.0, 0.0, 0.0), player);
    spawn_enemy(&mut app, dummy_config(), Vec3::new(0.0, 0.0, 8.0), player);

    input(&mut app, player).lock_on = true;
    tick(&mut app);

    let selector = app.world().get::<LockOnSelector>(player).unwrap();
    assert_eq!(selector.target(), Some(nearest));

    app.world_mut().despawn(nearest);
    tick(&mut app);

    assert_eq!(app.world().get::<LockOnSelector>(player).unwrap().target(), None);
    assert_eq!(
        recorded(&app).lock_on,
        vec![
            LockOnChanged {
                player,
                target: Some(nearest)
            },
            LockOnChanged {
                player,
                target: None
            },
        ]
    );
}

#[test]
fn test_stick_switches_once_per_deflection() {
    let (mut app, player) = create_combat_app(CombatTuning::default());
    let right = spawn_enemy(&mut app, dummy_config(), Vec3::new(3.0, 0.0, 0.0), player);
    let left = spawn_enemy(&mut app, dummy_config(), Vec3::new(-4.0, 0.0, 0.0), player);

    input(&mut app, player).lock_on = true;
    tick(&mut app);

    // Стик держится отклонённым: ровно одно переключение
    input(&mut app, player).look_axis = Vec2::new(1.0, 0.0);
    for _ in 0..3 {
        tick(&mut app);
    }
    assert_eq!(app.world().get::<LockOnSelector>(player).unwrap().target(), Some(left));

    // Возврат в центр взводит hysteresis, следующее отклонение переключает обратно
    input(&mut app, player).look_axis = Vec2::ZERO;
    tick(&mut app);
    input(&mut app, player).look_axis = Vec2::new(-1.0, 0.0);
    tick(&mut app);

    assert_eq!(app.world().get::<LockOnSelector>(player).unwrap().target(), Some(right));
    let targets: Vec<Option<Entity>> = recorded(&app).lock_on.iter().map(|change| change.target).collect();
    assert_eq!(targets, vec![Some(right), Some(left), Some(right)]);
    assert!(recorded(&app).lock_on.iter().all(|change| change.player == player));
}

#[test]
fn test_enemy_without_player_idles() {
    let mut app = create_headless_app(7);
    let enemy = app
        .world_mut()
        .spawn(enemy_bundle(EnemyConfig::default(), Vec3::ZERO, None).unwrap())
        .id();

    for _ in 0..30 {
        tick(&mut app);
    }

    assert_eq!(enemy_state(&app, enemy), EnemyState::Idle);
    assert!(app.world().get::<LocomotionIntent>(enemy).unwrap().stopped);
    assert_eq!(app.world().get::<Transform>(enemy).unwrap().translation, Vec3::ZERO);
}

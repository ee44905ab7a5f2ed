//! Headless симуляция Parrystep
//!
//! Запускает Bevy App без рендера: игрок со скриптованным input против
//! нескольких врагов, раскиданных детерминированным RNG.
//!
//! Usage: parrystep_simulation [tuning.ron]

use bevy::ecs::event::EventCursor;
use bevy::prelude::*;
use rand::Rng;

use parrystep_simulation::{
    create_headless_app_with, enemy_bundle, log_info, player_bundle, run_combat_tick, CombatTuning,
    DeterministicRng, EntityDied, Health, HitOutcome, HitResolved, PlayerController, PlayerInput,
};

const TICKS: u32 = 1200;
const DT: f32 = 1.0 / 60.0;
const ENEMIES: usize = 3;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let tuning = match std::env::args().nth(1) {
        Some(path) => CombatTuning::from_ron_str(&std::fs::read_to_string(path)?)?,
        None => CombatTuning::default(),
    };

    let seed = 42;
    println!("Starting Parrystep headless simulation (seed: {})", seed);

    let mut app = create_headless_app_with(seed, tuning.clone());
    let world = app.world_mut();

    let player = world
        .spawn(player_bundle(tuning.player.clone(), tuning.lock_on.clone(), Vec3::ZERO)?)
        .id();

    for _ in 0..ENEMIES {
        let (angle, distance) = {
            let mut rng = world.resource_mut::<DeterministicRng>();
            (
                rng.rng.gen_range(0.0..std::f32::consts::TAU),
                rng.rng.gen_range(6.0..12.0),
            )
        };
        let position = Vec3::new(angle.cos() * distance, 0.0, angle.sin() * distance);
        world.spawn(enemy_bundle(tuning.enemy.clone(), position, Some(player))?);
    }

    let mut resolved_cursor = EventCursor::<HitResolved>::default();
    let mut died_cursor = EventCursor::<EntityDied>::default();
    let (mut parries, mut guards, mut hits, mut deaths) = (0, 0, 0, 0);

    for tick in 0..TICKS {
        script_input(world, player, tick);
        run_combat_tick(world, DT);

        for resolved in resolved_cursor.read(world.resource::<Events<HitResolved>>()) {
            match resolved.outcome {
                HitOutcome::Parried => parries += 1,
                HitOutcome::Guarded => guards += 1,
                HitOutcome::Hit => hits += 1,
            }
        }
        deaths += died_cursor.read(world.resource::<Events<EntityDied>>()).count();

        if tick % 120 == 0 {
            let health = world.get::<Health>(player).map_or(0, |health| health.current);
            let state = world
                .get::<PlayerController>(player)
                .map_or("gone", |controller| controller.state.name());
            println!(
                "Tick {}: {} entities, player HP {} ({})",
                tick,
                world.entities().len(),
                health,
                state
            );
        }
    }

    log_info(&format!(
        "📊 Summary: {} parried, {} guarded, {} hits, {} deaths",
        parries, guards, hits, deaths
    ));
    println!("Simulation complete!");
    Ok(())
}

/// Скриптованный игрок: lock-on, подход, серия атак, guard + parry, рывок.
fn script_input(world: &mut World, player: Entity, tick: u32) {
    let Some(mut input) = world.get_mut::<PlayerInput>(player) else {
        return;
    };

    input.lock_on = tick == 1;
    input.move_axis = if (10..90).contains(&tick) {
        Vec2::new(0.0, 1.0)
    } else {
        Vec2::ZERO
    };
    input.run = tick < 60;
    input.guard = (300..420).contains(&tick) || (700..800).contains(&tick);
    input.attack = match tick {
        90..=299 => tick % 45 == 0,
        // Attack во время guard = parry
        310..=419 => tick % 30 == 0,
        _ => tick > 450 && tick % 60 == 0,
    };
    input.dodge = tick == 430 || tick == 850;
    input.skill = tick == 500 || tick == 900;
}

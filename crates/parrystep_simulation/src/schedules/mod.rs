//! Combat schedule
//!
//! Вся боевая логика живёт в отдельном schedule `CombatTick`, один прогон = один тик.
//!
//! # Архитектура
//!
//! **FixedUpdate (60 Hz)** → drive_combat_tick (exclusive) → CombatTick
//! **Тесты** → run_combat_tick(world, dt) → CombatTick
//!
//! Внутри CombatTick sets идут строго по цепочке:
//! Clock → Input → Actions → Movement → Contacts → Resolution → Feedback → Cleanup
//! (контакты текущего тика резолвятся в этом же тике, никогда не откладываются).
//!
//! # События
//!
//! Боевые события (`add_combat_event`) живут по тикам, а не по кадрам: буферы
//! `Events<E>` переключаются в начале каждого `CombatTick`. Событие тика k видно
//! читателям тиков k и k + 1, потом удаляется. Bevy `First` их не трогает, поэтому
//! `run_combat_tick` без `app.update()` не копит очередь.

use bevy::ecs::schedule::ScheduleLabel;
use bevy::prelude::*;

use crate::time::CombatClock;

/// Custom schedule: один боевой тик.
#[derive(ScheduleLabel, Debug, Clone, PartialEq, Eq, Hash)]
pub struct CombatTick;

#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CombatSet {
    /// Часы, hitstop, сброс one-tick запросов
    Clock,
    /// Lock-on toggle / switch / auto-release
    Input,
    /// Player + enemy state machines
    Actions,
    /// Locomotion collaborator adapter
    Movement,
    /// Weapon contacts → HitEvent
    Contacts,
    /// Hit resolution pipeline
    Resolution,
    /// Слот для внешних feedback collaborators
    Feedback,
    /// Сброс input edges
    Cleanup,
}

pub(crate) fn configure_combat_schedule(app: &mut App) {
    app.init_schedule(CombatTick);
    app.configure_sets(
        CombatTick,
        (
            CombatSet::Clock,
            CombatSet::Input,
            CombatSet::Actions,
            CombatSet::Movement,
            CombatSet::Contacts,
            CombatSet::Resolution,
            CombatSet::Feedback,
            CombatSet::Cleanup,
        )
            .chain(),
    );
}

/// System: double-buffer swap для событий одного типа (Clock set).
pub fn update_tick_events<E: Event>(mut events: ResMut<Events<E>>) {
    events.update();
}

/// Регистрация события, чей буфер обслуживает `CombatTick`.
pub trait CombatEventAppExt {
    fn add_combat_event<E: Event>(&mut self) -> &mut Self;
}

impl CombatEventAppExt for App {
    fn add_combat_event<E: Event>(&mut self) -> &mut Self {
        if self.world().contains_resource::<Events<E>>() {
            return self;
        }
        self.init_resource::<Events<E>>().add_systems(
            CombatTick,
            update_tick_events::<E>
                .in_set(CombatSet::Clock)
                .before(crate::time::advance_clock),
        )
    }
}

/// Один детерминированный тик с явным `dt` (`onTick(dt)`).
pub fn run_combat_tick(world: &mut World, real_dt: f32) {
    world.resource_mut::<CombatClock>().queue(real_dt);
    world.run_schedule(CombatTick);
}

/// System: FixedUpdate driver.
///
/// Exclusive system (требует &mut World для run_schedule).
pub fn drive_combat_tick(world: &mut World) {
    let dt = world.resource::<Time<Fixed>>().delta_secs();
    run_combat_tick(world, dt);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::CombatClockPlugin;

    #[derive(Event, Debug, Clone, Copy, PartialEq)]
    struct Ping(u32);

    fn ping_app() -> App {
        let mut app = App::new();
        configure_combat_schedule(&mut app);
        app.add_plugins(CombatClockPlugin).add_combat_event::<Ping>();
        app
    }

    #[test]
    fn test_event_buffer_bounded_over_many_ticks() {
        let mut app = ping_app();
        let world = app.world_mut();

        for index in 0..5000 {
            world.send_event(Ping(index));
            run_combat_tick(world, 1.0 / 60.0);
            assert!(world.resource::<Events<Ping>>().len() <= 2);
        }
    }

    #[test]
    fn test_event_readable_after_its_tick_then_dropped() {
        let mut app = ping_app();
        let world = app.world_mut();
        let mut cursor = bevy::ecs::event::EventCursor::<Ping>::default();

        world.send_event(Ping(1));
        run_combat_tick(world, 1.0 / 60.0);
        let read: Vec<Ping> = cursor.read(world.resource::<Events<Ping>>()).copied().collect();
        assert_eq!(read, vec![Ping(1)]);

        run_combat_tick(world, 1.0 / 60.0);
        assert!(world.resource::<Events<Ping>>().is_empty());
    }
}

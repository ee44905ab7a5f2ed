//! Базовые компоненты акторов: Actor, Team, Health

use bevy::prelude::*;

use crate::components::{AnimationRequests, LocomotionIntent, LocomotionState};

/// Сторона конфликта. Lock-on ищет только `Enemy`, hit pipeline игнорирует friendly contacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Reflect)]
pub enum Team {
    #[default]
    Player,
    Enemy,
}

/// Актор (игрок или враг): базовый компонент для живых участников боя
///
/// Автоматически добавляет Health и collaborator-компоненты (анимация, локомоция)
/// через Required Components.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
#[require(Health, AnimationRequests, LocomotionIntent, LocomotionState)]
pub struct Actor {
    pub team: Team,
}

impl Actor {
    pub fn player() -> Self {
        Self { team: Team::Player }
    }

    pub fn enemy() -> Self {
        Self { team: Team::Enemy }
    }

    pub fn is_hostile_to(&self, other: &Actor) -> bool {
        self.team != other.team
    }
}

/// Здоровье актора
///
/// Инвариант: 0 ≤ current ≤ max. Мутируется только hit pipeline.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Health {
    pub current: u32,
    pub max: u32,
}

/// Результат `Health::take_damage` (health/damage boundary).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DamageReport {
    pub current: u32,
    pub is_dead: bool,
}

impl Default for Health {
    fn default() -> Self {
        Self::new(100)
    }
}

impl Health {
    pub fn new(max: u32) -> Self {
        Self { current: max, max }
    }

    pub fn is_alive(&self) -> bool {
        self.current > 0
    }

    pub fn take_damage(&mut self, amount: u32) -> DamageReport {
        self.current = self.current.saturating_sub(amount);
        DamageReport {
            current: self.current,
            is_dead: self.current == 0,
        }
    }
}

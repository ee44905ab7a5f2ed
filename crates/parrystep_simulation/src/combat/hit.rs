//! Hit classification
//!
//! Строгий приоритет: parry window > guard > hit.

use bevy::prelude::*;

/// Контакт оружия с hurtbox, produced by collision detection.
///
/// Эфемерный: читается hit pipeline ровно один раз (EventReader).
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct HitEvent {
    pub attacker: Entity,
    pub defender: Entity,
    pub damage: u32,
    pub impact_point: Vec3,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum HitOutcome {
    Parried,
    Guarded,
    Hit,
}

/// Защитная стойка защищающегося на момент удара.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum DefenseStance {
    /// Активное окно parry
    ParryWindow,
    Guarding,
    Exposed,
}

pub fn classify_hit(stance: DefenseStance) -> HitOutcome {
    match stance {
        DefenseStance::ParryWindow => HitOutcome::Parried,
        DefenseStance::Guarding => HitOutcome::Guarded,
        DefenseStance::Exposed => HitOutcome::Hit,
    }
}

/// Урон, который реально дойдёт до Health.
///
/// Parried → 0; Guarded → damage × guard_ratio (округление к ближайшему); Hit → полный.
pub fn resolve_damage(outcome: HitOutcome, damage: u32, guard_ratio: f32) -> u32 {
    match outcome {
        HitOutcome::Parried => 0,
        HitOutcome::Guarded => (damage as f32 * guard_ratio.clamp(0.0, 1.0)).round() as u32,
        HitOutcome::Hit => damage,
    }
}

/// Событие: удар классифицирован и применён.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct HitResolved {
    pub attacker: Entity,
    pub defender: Entity,
    pub outcome: HitOutcome,
    pub damage_applied: u32,
    pub impact_point: Vec3,
}

/// Событие: entity умер (health <= 0)
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityDied {
    pub entity: Entity,
    pub killer: Option<Entity>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification_priority() {
        assert_eq!(classify_hit(DefenseStance::ParryWindow), HitOutcome::Parried);
        assert_eq!(classify_hit(DefenseStance::Guarding), HitOutcome::Guarded);
        assert_eq!(classify_hit(DefenseStance::Exposed), HitOutcome::Hit);
    }

    #[test]
    fn test_resolve_damage() {
        assert_eq!(resolve_damage(HitOutcome::Parried, 10, 1.0), 0);
        assert_eq!(resolve_damage(HitOutcome::Guarded, 10, 0.0), 0);
        assert_eq!(resolve_damage(HitOutcome::Guarded, 10, 0.3), 3);
        assert_eq!(resolve_damage(HitOutcome::Hit, 10, 0.3), 10);
    }
}

//! Combat module: hit resolution pipeline
//!
//! ECS ответственность:
//! - Weapon contacts: WeaponHitbox (strike window) vs Hurtbox → HitEvent
//! - Classification: parry window > guard > hit
//! - Health mutation + реакция state machine (stagger, hitstun, death)
//! - Feedback requests: hitstop (TimeDilation), camera impulse, VFX
//!
//! Внешняя collision система может писать HitEvent сама (Contacts set)
//! вместо detect_weapon_contacts.

use bevy::prelude::*;

pub mod feedback;
pub mod hit;
pub mod hitbox;
pub mod systems;

// Re-export основных типов
pub use feedback::{CameraImpulseRequested, EffectSpawnRequested, HitFeedbackConfig};
pub use hit::{
    classify_hit, resolve_damage, DefenseStance, EntityDied, HitEvent, HitOutcome, HitResolved,
};
pub use hitbox::{detect_weapon_contacts, Hurtbox, WeaponHitbox};
pub use systems::resolve_hits;

use crate::schedules::{CombatEventAppExt, CombatSet, CombatTick};

/// Combat Plugin
///
/// Порядок выполнения (внутри CombatTick):
/// 1. detect_weapon_contacts: Contacts set (после Movement: позиции этого тика)
/// 2. resolve_hits: Resolution set (контакты этого тика разрешаются в этом же тике)
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        // Регистрация событий
        app.add_combat_event::<HitEvent>()
            .add_combat_event::<HitResolved>()
            .add_combat_event::<EntityDied>()
            .add_combat_event::<CameraImpulseRequested>()
            .add_combat_event::<EffectSpawnRequested>()
            .init_resource::<HitFeedbackConfig>()
            .register_type::<WeaponHitbox>()
            .register_type::<Hurtbox>();

        app.add_systems(
            CombatTick,
            detect_weapon_contacts.in_set(CombatSet::Contacts),
        )
        .add_systems(CombatTick, resolve_hits.in_set(CombatSet::Resolution));
    }
}

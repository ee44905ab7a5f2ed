//! Weapon hitbox / hurtbox
//!
//! Архитектура:
//! - WeaponHitbox живёт на акторе постоянно, включается state machine только в strike window
//! - Sphere на кончике оружия (root + up × height + forward × reach)
//! - Hurtbox: AABB вокруг root актора
//! - Один HitEvent на swing на защищающегося (struck list сбрасывается на rising edge)

use bevy::prelude::*;

use super::hit::HitEvent;
use crate::components::{Actor, Health};

#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct WeaponHitbox {
    pub damage: u32,
    /// Дистанция кончика оружия вперёд от root (метры)
    pub reach: f32,
    pub radius: f32,
    pub height: f32,
    pub active: bool,
    /// Кого уже задели этим swing'ом
    pub struck: Vec<Entity>,
}

impl Default for WeaponHitbox {
    fn default() -> Self {
        Self::new(10)
    }
}

impl WeaponHitbox {
    pub fn new(damage: u32) -> Self {
        Self {
            damage,
            reach: 1.2,
            radius: 0.6,
            height: 1.0,
            active: false,
            struck: Vec::new(),
        }
    }

    /// Новый swing (rising edge) начинается с пустым struck list.
    pub fn set_active(&mut self, active: bool) {
        if active && !self.active {
            self.struck.clear();
        }
        self.active = active;
    }

    pub fn tip(&self, transform: &Transform) -> Vec3 {
        transform.translation + Vec3::Y * self.height + (transform.rotation * Vec3::NEG_Z) * self.reach
    }
}

#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Hurtbox {
    pub half_extents: Vec3,
    /// Центр AABB относительно root (root: у ног)
    pub center_offset: Vec3,
}

impl Default for Hurtbox {
    fn default() -> Self {
        Self {
            half_extents: Vec3::new(0.4, 0.9, 0.4),
            center_offset: Vec3::new(0.0, 0.9, 0.0),
        }
    }
}

impl Hurtbox {
    /// Ближайшая к `point` точка на AABB (`ClosestPointOnBounds`).
    pub fn closest_point(&self, root: Vec3, point: Vec3) -> Vec3 {
        let center = root + self.center_offset;
        point.clamp(center - self.half_extents, center + self.half_extents)
    }
}

/// Система: weapon contacts → HitEvent (Contacts set)
///
/// Пропускает: неактивные hitbox'ы, союзников, мёртвых, уже задетых этим swing'ом.
pub fn detect_weapon_contacts(
    mut attackers: Query<(Entity, &Actor, &Transform, &mut WeaponHitbox)>,
    defenders: Query<(Entity, &Actor, &Transform, &Hurtbox, &Health)>,
    mut hits: EventWriter<HitEvent>,
) {
    for (attacker, attacker_actor, attacker_transform, mut hitbox) in attackers.iter_mut() {
        if !hitbox.active {
            continue;
        }
        let tip = hitbox.tip(attacker_transform);

        for (defender, defender_actor, defender_transform, hurtbox, health) in defenders.iter() {
            if defender == attacker
                || !attacker_actor.is_hostile_to(defender_actor)
                || !health.is_alive()
                || hitbox.struck.contains(&defender)
            {
                continue;
            }

            let impact_point = hurtbox.closest_point(defender_transform.translation, tip);
            if impact_point.distance(tip) > hitbox.radius {
                continue;
            }

            hitbox.struck.push(defender);
            hits.write(HitEvent {
                attacker,
                defender,
                damage: hitbox.damage,
                impact_point,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closest_point_inside_and_outside() {
        let hurtbox = Hurtbox::default();
        let root = Vec3::new(0.0, 0.0, -1.5);

        let inside = Vec3::new(0.0, 1.0, -1.2);
        assert_eq!(hurtbox.closest_point(root, inside), inside);

        let outside = Vec3::new(0.0, 1.0, 0.0);
        assert_eq!(
            hurtbox.closest_point(root, outside),
            Vec3::new(0.0, 1.0, -1.1)
        );
    }

    #[test]
    fn test_rising_edge_clears_struck() {
        let mut hitbox = WeaponHitbox::new(10);
        hitbox.set_active(true);
        hitbox.struck.push(Entity::PLACEHOLDER);

        hitbox.set_active(true); // тот же swing
        assert_eq!(hitbox.struck.len(), 1);

        hitbox.set_active(false);
        hitbox.set_active(true); // новый swing
        assert!(hitbox.struck.is_empty());
    }

    #[test]
    fn test_tip_follows_facing() {
        let hitbox = WeaponHitbox::new(10);
        let transform = Transform::from_rotation(Quat::from_rotation_y(-std::f32::consts::FRAC_PI_2));
        let tip = hitbox.tip(&transform);
        assert!((tip - Vec3::new(1.2, 1.0, 0.0)).length() < 1e-5);
    }
}

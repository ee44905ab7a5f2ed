//! Player input contract
//!
//! Хост (device binding, сетевой клиент, тестовый скрипт) пишет сюда раз в тик.
//! Edge-поля живут ровно один тик: Cleanup set их сбрасывает.

use bevy::prelude::*;

#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct PlayerInput {
    /// x = strafe (right +), y = forward (+)
    pub move_axis: Vec2,
    pub look_axis: Vec2,
    pub run: bool,
    /// Level: держится, пока нажато
    pub guard: bool,
    pub attack: bool,
    pub dodge: bool,
    pub skill: bool,
    pub lock_on: bool,
    /// Forward камеры в мире; движение считается относительно него (y игнорируется).
    pub camera_forward: Vec3,
}

impl Default for PlayerInput {
    fn default() -> Self {
        Self {
            move_axis: Vec2::ZERO,
            look_axis: Vec2::ZERO,
            run: false,
            guard: false,
            attack: false,
            dodge: false,
            skill: false,
            lock_on: false,
            camera_forward: Vec3::NEG_Z,
        }
    }
}

impl PlayerInput {
    pub fn clear_edges(&mut self) {
        self.attack = false;
        self.dodge = false;
        self.skill = false;
        self.lock_on = false;
    }

    /// Camera-relative move vector на плоскости XZ (не нормализован, |v| ≤ |move_axis|).
    pub fn camera_relative_move(&self) -> Vec3 {
        let forward = flatten(self.camera_forward).unwrap_or(Vec3::NEG_Z);
        let right = forward.cross(Vec3::Y);
        forward * self.move_axis.y + right * self.move_axis.x
    }

    /// Горизонтальный forward камеры (strafe-ориентация без lock-on).
    pub fn camera_facing(&self) -> Vec3 {
        flatten(self.camera_forward).unwrap_or(Vec3::NEG_Z)
    }
}

/// Проекция на XZ + нормализация; None для (почти) вертикального вектора.
pub fn flatten(v: Vec3) -> Option<Vec3> {
    Vec3::new(v.x, 0.0, v.z).try_normalize()
}

/// Поворот вокруг Y, при котором `Transform::forward()` (−Z) смотрит вдоль `dir`.
pub fn yaw_towards(dir: Vec3) -> Option<Quat> {
    let flat = flatten(dir)?;
    Some(Quat::from_rotation_y(f32::atan2(-flat.x, -flat.z)))
}

//! Player tuning
//!
//! Значения по умолчанию откалиброваны под 60 Hz тик и character controller ~1.8 м.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{ensure_non_negative, ensure_ordered, ensure_positive, ensure_within, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Reflect)]
#[serde(default)]
pub struct PlayerConfig {
    // Locomotion
    pub walk_speed: f32,
    pub run_speed: f32,
    pub guard_speed: f32,
    /// Slerp rate ориентации (1/s)
    pub rotation_speed: f32,
    pub gravity: f32,
    /// Вертикальная скорость, к которой прижимается grounded актор
    pub grounded_vertical_velocity: f32,

    // Dodge
    pub dodge_speed: f32,
    pub dodge_duration: f32,
    /// Дополнительное прижатие к земле во время рывка (m/s)
    pub dodge_down_force: f32,

    // Guard / parry
    pub parry_window: f32,
    pub parry_cooldown: f32,
    /// Доля урона, проходящая через guard (0.0 = полностью блокирует)
    pub guard_damage_ratio: f32,

    // Attack + homing step
    pub attack_duration: f32,
    pub attack_step_duration: f32,
    pub attack_step_distance: f32,
    pub homing_range: f32,
    pub attack_rotation_speed: f32,
    pub min_contact_distance: f32,
    pub attack_strike_start: f32,
    pub attack_strike_end: f32,

    // Skill
    pub skill_cooldown: f32,
    pub skill_duration: f32,
    pub skill_step_time: f32,
    pub skill_rotation_multiplier: f32,
    pub skill_strike_start: f32,
    pub skill_strike_end: f32,

    // Damage
    pub weapon_damage: u32,
    pub hit_stagger_duration: f32,
    pub max_health: u32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            walk_speed: 5.0,
            run_speed: 8.0,
            guard_speed: 2.0,
            rotation_speed: 10.0,
            gravity: -9.81,
            grounded_vertical_velocity: -2.0,

            dodge_speed: 12.0,
            dodge_duration: 0.5,
            dodge_down_force: 9.81,

            parry_window: 0.2,
            parry_cooldown: 0.5,
            guard_damage_ratio: 0.0,

            attack_duration: 0.6,
            attack_step_duration: 0.2,
            attack_step_distance: 2.0,
            homing_range: 2.0,
            attack_rotation_speed: 20.0,
            min_contact_distance: 1.2,
            attack_strike_start: 0.15,
            attack_strike_end: 0.45,

            skill_cooldown: 3.0,
            skill_duration: 2.0,
            skill_step_time: 0.3,
            skill_rotation_multiplier: 1.5,
            skill_strike_start: 0.3,
            skill_strike_end: 1.0,

            weapon_damage: 10,
            hit_stagger_duration: 0.4,
            max_health: 100,
        }
    }
}

impl PlayerConfig {
    pub fn validate(&self) -> Result<()> {
        ensure_positive("walk_speed", self.walk_speed)?;
        ensure_positive("run_speed", self.run_speed)?;
        ensure_non_negative("guard_speed", self.guard_speed)?;
        ensure_positive("rotation_speed", self.rotation_speed)?;

        ensure_positive("dodge_speed", self.dodge_speed)?;
        ensure_positive("dodge_duration", self.dodge_duration)?;
        ensure_non_negative("dodge_down_force", self.dodge_down_force)?;

        ensure_positive("parry_window", self.parry_window)?;
        ensure_positive("parry_cooldown", self.parry_cooldown)?;
        ensure_within("parry_window", self.parry_window, "parry_cooldown", self.parry_cooldown)?;
        ensure_non_negative("guard_damage_ratio", self.guard_damage_ratio)?;
        ensure_ordered("guard_damage_ratio", self.guard_damage_ratio, "full damage ratio", 1.0)?;

        ensure_positive("attack_duration", self.attack_duration)?;
        ensure_positive("attack_step_duration", self.attack_step_duration)?;
        ensure_within(
            "attack_step_duration",
            self.attack_step_duration,
            "attack_duration",
            self.attack_duration,
        )?;
        ensure_non_negative("attack_step_distance", self.attack_step_distance)?;
        ensure_non_negative("homing_range", self.homing_range)?;
        ensure_positive("attack_rotation_speed", self.attack_rotation_speed)?;
        ensure_non_negative("min_contact_distance", self.min_contact_distance)?;
        ensure_non_negative("attack_strike_start", self.attack_strike_start)?;
        ensure_ordered(
            "attack_strike_start",
            self.attack_strike_start,
            "attack_strike_end",
            self.attack_strike_end,
        )?;
        ensure_within(
            "attack_strike_end",
            self.attack_strike_end,
            "attack_duration",
            self.attack_duration,
        )?;

        ensure_non_negative("skill_cooldown", self.skill_cooldown)?;
        ensure_positive("skill_duration", self.skill_duration)?;
        ensure_positive("skill_step_time", self.skill_step_time)?;
        ensure_within("skill_step_time", self.skill_step_time, "skill_duration", self.skill_duration)?;
        ensure_positive("skill_rotation_multiplier", self.skill_rotation_multiplier)?;
        ensure_non_negative("skill_strike_start", self.skill_strike_start)?;
        ensure_ordered(
            "skill_strike_start",
            self.skill_strike_start,
            "skill_strike_end",
            self.skill_strike_end,
        )?;
        ensure_within(
            "skill_strike_end",
            self.skill_strike_end,
            "skill_duration",
            self.skill_duration,
        )?;

        ensure_non_negative("hit_stagger_duration", self.hit_stagger_duration)?;
        ensure_positive("max_health", self.max_health as f32)?;
        Ok(())
    }

    /// Скорость шага во время homing фазы атаки (m/s).
    pub fn attack_step_speed(&self) -> f32 {
        self.attack_step_distance / self.attack_step_duration
    }

    pub fn skill_step_speed(&self) -> f32 {
        self.attack_step_distance / self.skill_step_time
    }

    pub fn skill_rotation_speed(&self) -> f32 {
        self.attack_rotation_speed * self.skill_rotation_multiplier
    }
}

//! Impact feedback (hitstop, camera shake, VFX)
//!
//! Fire-and-forget запросы к внешним collaborators. Core не ждёт их выполнения.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{ensure_non_negative, Result};

#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize, Reflect)]
#[reflect(Resource)]
#[serde(default)]
pub struct HitFeedbackConfig {
    /// Freeze после Hit/Guarded с уроном
    pub hitstop_duration: f32,
    /// Freeze после успешного parry
    pub parry_hitstop_duration: f32,
    pub camera_impulse: f32,
    /// Prefab reference для effect collaborator
    pub hit_effect: String,
    pub effect_ttl: f32,
}

impl Default for HitFeedbackConfig {
    fn default() -> Self {
        Self {
            hitstop_duration: 0.1,
            parry_hitstop_duration: 0.1,
            camera_impulse: 1.0,
            hit_effect: "hit_spark".to_string(),
            effect_ttl: 2.0,
        }
    }
}

impl HitFeedbackConfig {
    /// Нулевой hitstop допустим (feedback выключен), отрицательный: нет.
    pub fn validate(&self) -> Result<()> {
        ensure_non_negative("hitstop_duration", self.hitstop_duration)?;
        ensure_non_negative("parry_hitstop_duration", self.parry_hitstop_duration)?;
        ensure_non_negative("camera_impulse", self.camera_impulse)?;
        ensure_non_negative("effect_ttl", self.effect_ttl)?;
        Ok(())
    }
}

/// `requestImpulse(magnitude)` → camera collaborator
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct CameraImpulseRequested {
    pub magnitude: f32,
}

/// `spawnEffect(prefab, position, ttl)` → VFX collaborator
#[derive(Event, Debug, Clone, PartialEq)]
pub struct EffectSpawnRequested {
    pub effect: String,
    pub position: Vec3,
    pub ttl: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_feedback_is_valid() {
        assert!(HitFeedbackConfig::default().validate().is_ok());
    }

    #[test]
    fn test_negative_hitstop_rejected() {
        let config = HitFeedbackConfig {
            hitstop_duration: -0.1,
            ..default()
        };
        assert!(config.validate().is_err());
    }
}

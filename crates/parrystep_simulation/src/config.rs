//! Combat tuning (RON)
//!
//! Все секции опциональны: отсутствующие поля берутся из Default.
//!
//! ```ron
//! (
//!     player: (parry_window: 0.25, parry_cooldown: 0.6),
//!     enemy: (max_health: 40),
//!     hits: (hitstop_duration: 0.08),
//! )
//! ```

use serde::{Deserialize, Serialize};

use crate::ai::EnemyConfig;
use crate::combat::HitFeedbackConfig;
use crate::error::Result;
use crate::lock_on::LockOnConfig;
use crate::player::PlayerConfig;

/// Тюнинг всего боя одним документом.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatTuning {
    pub player: PlayerConfig,
    pub enemy: EnemyConfig,
    pub lock_on: LockOnConfig,
    pub hits: HitFeedbackConfig,
}

impl CombatTuning {
    /// Парсит RON и валидирует каждую секцию.
    pub fn from_ron_str(source: &str) -> Result<Self> {
        let tuning: CombatTuning = ron::from_str(source)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn validate(&self) -> Result<()> {
        self.player.validate()?;
        self.enemy.validate()?;
        self.lock_on.validate()?;
        self.hits.validate()?;
        Ok(())
    }

    pub fn to_ron_string(&self) -> std::result::Result<String, ron::Error> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
    }
}

//! Animation collaborator boundary
//!
//! Ядро не проигрывает анимации: оно пишет named triggers и float-параметры,
//! внешний animator читает их после тика. Обратно ничего не читается.

use bevy::prelude::*;

/// Named trigger для animator'а.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum AnimationTrigger {
    Attack,
    Dodge,
    Parry,
    Skill,
    GetHit,
    IsDead,
}

impl AnimationTrigger {
    pub fn name(&self) -> &'static str {
        match self {
            AnimationTrigger::Attack => "Attack",
            AnimationTrigger::Dodge => "Dodge",
            AnimationTrigger::Parry => "Parry",
            AnimationTrigger::Skill => "Skill",
            AnimationTrigger::GetHit => "GetHit",
            AnimationTrigger::IsDead => "IsDead",
        }
    }
}

/// Запросы к animator'у за текущий тик.
///
/// `triggers` очищаются в начале каждого тика (Clock set), параметры
/// перезаписываются state machine не чаще раза за тик.
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
pub struct AnimationRequests {
    pub triggers: Vec<AnimationTrigger>,
    /// `Speed`
    pub speed: f32,
    /// `InputX` (strafe mode)
    pub input_x: f32,
    /// `InputY` (strafe mode)
    pub input_y: f32,
    pub guard: bool,
}

impl AnimationRequests {
    pub fn trigger(&mut self, trigger: AnimationTrigger) {
        if !self.triggers.contains(&trigger) {
            self.triggers.push(trigger);
        }
    }

    pub fn has_trigger(&self, trigger: AnimationTrigger) -> bool {
        self.triggers.contains(&trigger)
    }

    /// Strafe mode: сырые оси + их длина в `Speed`.
    pub fn set_strafe_axes(&mut self, x: f32, y: f32) {
        self.input_x = x;
        self.input_y = y;
        self.speed = Vec2::new(x, y).length();
    }

    /// Free mode: только forward-amount (InputX = 0).
    pub fn set_forward_speed(&mut self, amount: f32) {
        self.input_x = 0.0;
        self.input_y = amount;
        self.speed = amount;
    }

    pub fn zero_locomotion(&mut self) {
        self.input_x = 0.0;
        self.input_y = 0.0;
        self.speed = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trigger_deduplicated_within_tick() {
        let mut anim = AnimationRequests::default();
        anim.trigger(AnimationTrigger::GetHit);
        anim.trigger(AnimationTrigger::GetHit);
        assert_eq!(anim.triggers.len(), 1);
        assert!(anim.has_trigger(AnimationTrigger::GetHit));
        assert_eq!(AnimationTrigger::IsDead.name(), "IsDead");
    }
}

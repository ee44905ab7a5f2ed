//! Enemy FSM components (state machine, brain, config).

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::components::{
    yaw_towards, AnimationRequests, AnimationTrigger, CooldownTimer, LocomotionIntent,
};
use crate::error::{ensure_non_negative, ensure_ordered, ensure_positive, ensure_within, Result};

/// Enemy FSM состояния
#[derive(Debug, Clone, Copy, PartialEq, Default, Reflect)]
pub enum EnemyState {
    /// Игрок вне detection range (или игрока нет)
    #[default]
    Idle,

    /// Погоня; внутри attack range на cooldown: стоит и смотрит на игрока
    Chasing,

    /// Атака: windup (доворот) → hold до `attack_recovery`
    Attacking { elapsed: f32 },

    /// Knockback (distance за knockback_duration) → hitstun_recovery
    Hitstunned {
        elapsed: f32,
        knockback_dir: Vec3,
        distance: f32,
    },

    /// Parry stagger: без knockback, только recovery lock
    Staggered { elapsed: f32 },

    /// Терминальное. Despawn запрашивается один раз после `despawn_delay`
    Dead { elapsed: f32, removal_requested: bool },
}

impl EnemyState {
    pub fn name(&self) -> &'static str {
        match self {
            EnemyState::Idle => "Idle",
            EnemyState::Chasing => "Chasing",
            EnemyState::Attacking { .. } => "Attacking",
            EnemyState::Hitstunned { .. } => "Hitstunned",
            EnemyState::Staggered { .. } => "Staggered",
            EnemyState::Dead { .. } => "Dead",
        }
    }
}

/// Параметры enemy AI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Reflect)]
#[serde(default)]
pub struct EnemyConfig {
    pub detection_range: f32,
    /// Дистанция атаки (= stopping distance nav agent'а)
    pub attack_trigger_range: f32,
    pub attack_cooldown: f32,
    /// Сколько враг стоит в атаке перед возвратом к погоне
    pub attack_recovery: f32,
    /// Окно плавного доворота к игроку в начале атаки
    pub windup: f32,
    /// Slerp rate доворота (1/s)
    pub turn_rate: f32,
    /// Враг смотрит на игрока в пределах attack_trigger_range + face_margin
    pub face_margin: f32,
    pub move_speed: f32,
    pub knockback_per_damage: f32,
    pub knockback_duration: f32,
    pub hitstun_recovery: f32,
    pub parry_stagger: f32,
    pub despawn_delay: f32,
    pub strike_start: f32,
    pub strike_end: f32,
    pub weapon_damage: u32,
    pub max_health: u32,
}

impl Default for EnemyConfig {
    fn default() -> Self {
        Self {
            detection_range: 20.0,
            attack_trigger_range: 2.0,
            attack_cooldown: 2.0,
            attack_recovery: 5.0,
            windup: 0.5,
            turn_rate: 5.0,
            face_margin: 1.0,
            move_speed: 3.5,
            knockback_per_damage: 0.1,
            knockback_duration: 0.2,
            hitstun_recovery: 0.3,
            parry_stagger: 1.5,
            despawn_delay: 3.0,
            strike_start: 0.3,
            strike_end: 0.6,
            weapon_damage: 10,
            max_health: 30,
        }
    }
}

impl EnemyConfig {
    pub fn validate(&self) -> Result<()> {
        ensure_positive("detection_range", self.detection_range)?;
        ensure_positive("attack_trigger_range", self.attack_trigger_range)?;
        ensure_ordered(
            "attack_trigger_range",
            self.attack_trigger_range,
            "detection_range",
            self.detection_range,
        )?;
        ensure_non_negative("attack_cooldown", self.attack_cooldown)?;
        ensure_positive("attack_recovery", self.attack_recovery)?;
        ensure_non_negative("windup", self.windup)?;
        ensure_within("windup", self.windup, "attack_recovery", self.attack_recovery)?;
        ensure_positive("turn_rate", self.turn_rate)?;
        ensure_non_negative("face_margin", self.face_margin)?;
        ensure_positive("move_speed", self.move_speed)?;
        ensure_non_negative("knockback_per_damage", self.knockback_per_damage)?;
        ensure_positive("knockback_duration", self.knockback_duration)?;
        ensure_non_negative("hitstun_recovery", self.hitstun_recovery)?;
        ensure_positive("parry_stagger", self.parry_stagger)?;
        ensure_non_negative("despawn_delay", self.despawn_delay)?;
        ensure_non_negative("strike_start", self.strike_start)?;
        ensure_ordered("strike_start", self.strike_start, "strike_end", self.strike_end)?;
        ensure_within("strike_end", self.strike_end, "attack_recovery", self.attack_recovery)?;
        ensure_positive("max_health", self.max_health as f32)?;
        Ok(())
    }
}

/// Что враг видит за тик.
#[derive(Debug, Clone, Copy)]
pub struct EnemyTickContext {
    /// Scaled dt
    pub dt: f32,
    /// Unscaled simulation time (attack cooldown)
    pub now: f64,
    pub position: Vec3,
    pub rotation: Quat,
    /// Позиция живого игрока (None: игрока нет или он мёртв)
    pub player: Option<Vec3>,
    /// `velocity()` locomotion collaborator'а
    pub velocity: Vec3,
}

/// Результат тика.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyMotion {
    pub rotation: Quat,
    /// true ровно один раз: пора удалить труп
    pub despawn: bool,
}

/// Enemy brain: FSM + cooldown + read-only relation к игроку.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct EnemyBrain {
    pub state: EnemyState,
    pub config: EnemyConfig,
    pub next_attack: CooldownTimer,
    /// Игрок; резолвится при wiring или лениво на первом тике
    pub player: Option<Entity>,
}

impl Default for EnemyBrain {
    fn default() -> Self {
        Self::new(EnemyConfig::default())
    }
}

impl EnemyBrain {
    pub fn new(config: EnemyConfig) -> Self {
        Self {
            state: EnemyState::Idle,
            config,
            next_attack: CooldownTimer::default(),
            player: None,
        }
    }

    pub fn try_new(config: EnemyConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(config))
    }

    pub fn with_player(mut self, player: Entity) -> Self {
        self.player = Some(player);
        self
    }

    pub fn is_dead(&self) -> bool {
        matches!(self.state, EnemyState::Dead { .. })
    }

    /// `onTick(dt)`
    pub fn tick(
        &mut self,
        ctx: &EnemyTickContext,
        anim: &mut AnimationRequests,
        intent: &mut LocomotionIntent,
    ) -> EnemyMotion {
        let mut motion = EnemyMotion {
            rotation: ctx.rotation,
            despawn: false,
        };

        match self.state {
            EnemyState::Dead {
                elapsed,
                removal_requested,
            } => {
                let elapsed = elapsed + ctx.dt;
                let due = !removal_requested && elapsed >= self.config.despawn_delay;
                self.state = EnemyState::Dead {
                    elapsed,
                    removal_requested: removal_requested || due,
                };
                motion.despawn = due;
                intent.set_stopped(true);
                anim.speed = 0.0;
                return motion;
            }
            EnemyState::Hitstunned {
                elapsed,
                knockback_dir,
                distance,
            } => {
                // Knockback равномерно по [0, knockback_duration)
                let duration = self.config.knockback_duration;
                let slice = ctx.dt.min((duration - elapsed).max(0.0));
                if slice > 0.0 {
                    intent.move_by(knockback_dir * (distance / duration) * slice);
                }
                intent.set_stopped(true);

                let elapsed = elapsed + ctx.dt;
                if elapsed < duration + self.config.hitstun_recovery {
                    self.state = EnemyState::Hitstunned {
                        elapsed,
                        knockback_dir,
                        distance,
                    };
                    anim.speed = ctx.velocity.length();
                    return motion;
                }
                crate::log("🤖 Enemy: hitstun over → Idle");
                self.state = EnemyState::Idle;
            }
            EnemyState::Staggered { elapsed } => {
                let elapsed = elapsed + ctx.dt;
                intent.set_stopped(true);
                if elapsed < self.config.parry_stagger {
                    self.state = EnemyState::Staggered { elapsed };
                    anim.speed = ctx.velocity.length();
                    return motion;
                }
                crate::log("🤖 Enemy: stagger over → Idle");
                self.state = EnemyState::Idle;
            }
            EnemyState::Attacking { elapsed } => {
                let elapsed = elapsed + ctx.dt;
                intent.set_stopped(true);
                if elapsed < self.config.attack_recovery {
                    self.state = EnemyState::Attacking { elapsed };
                    if elapsed < self.config.windup {
                        if let Some(player) = ctx.player {
                            motion.rotation = self.turn_towards(ctx, player);
                        }
                    }
                    anim.speed = ctx.velocity.length();
                    return motion;
                }
                crate::log("🤖 Enemy: attack recovery over");
                self.state = EnemyState::Idle;
            }
            EnemyState::Idle | EnemyState::Chasing => {}
        }

        self.perceive(ctx, anim, intent, &mut motion);
        anim.speed = ctx.velocity.length();
        motion
    }

    /// Idle/Chasing: погоня, остановка или старт атаки.
    fn perceive(
        &mut self,
        ctx: &EnemyTickContext,
        anim: &mut AnimationRequests,
        intent: &mut LocomotionIntent,
        motion: &mut EnemyMotion,
    ) {
        let Some(player) = ctx.player else {
            intent.set_stopped(true);
            self.state = EnemyState::Idle;
            return;
        };

        let distance = ctx.position.distance(player);
        let in_attack_range = distance <= self.config.attack_trigger_range;

        if in_attack_range && self.next_attack.is_ready(ctx.now) {
            intent.set_stopped(true);
            intent.clear_destination();
            if let Some(look) = yaw_towards(player - ctx.position) {
                motion.rotation = look;
            }
            anim.trigger(AnimationTrigger::Attack);
            self.next_attack.start(ctx.now, self.config.attack_cooldown);
            self.state = EnemyState::Attacking { elapsed: 0.0 };
            crate::log(&format!("⚔️ Enemy: attack at distance {:.2}", distance));
            return;
        }

        if distance <= self.config.detection_range {
            if self.state != EnemyState::Chasing {
                crate::log(&format!("🤖 Enemy: player detected at {:.2} → Chasing", distance));
            }
            self.state = EnemyState::Chasing;
            intent.set_destination(player);
            // На cooldown внутри attack range: держим позицию
            intent.set_stopped(in_attack_range);
        } else {
            if self.state == EnemyState::Chasing {
                crate::log("🤖 Enemy: player lost → Idle");
            }
            self.state = EnemyState::Idle;
            intent.set_stopped(true);
        }

        if distance <= self.config.attack_trigger_range + self.config.face_margin {
            motion.rotation = self.turn_towards(ctx, player);
        }
    }

    fn turn_towards(&self, ctx: &EnemyTickContext, player: Vec3) -> Quat {
        match yaw_towards(player - ctx.position) {
            Some(look) => ctx
                .rotation
                .slerp(look, (self.config.turn_rate * ctx.dt).min(1.0)),
            None => ctx.rotation,
        }
    }

    /// `onDamaged(amount)`: прерывает что угодно (включая текущий hitstun) новым knockback.
    pub fn on_damaged(&mut self, amount: u32, knockback_dir: Vec3, anim: &mut AnimationRequests) -> bool {
        if self.is_dead() {
            return false;
        }
        let knockback_dir = Vec3::new(knockback_dir.x, 0.0, knockback_dir.z).normalize_or_zero();
        let distance = amount as f32 * self.config.knockback_per_damage;
        crate::log(&format!(
            "💥 Enemy: damaged {} during {} → Hitstunned (knockback {:.2}m)",
            amount,
            self.state.name(),
            distance
        ));
        self.state = EnemyState::Hitstunned {
            elapsed: 0.0,
            knockback_dir,
            distance,
        };
        anim.trigger(AnimationTrigger::GetHit);
        true
    }

    /// Forced stagger после успешного parry игрока.
    pub fn on_parried(&mut self, anim: &mut AnimationRequests) -> bool {
        if self.is_dead() {
            return false;
        }
        crate::log(&format!("🛡️ Enemy: parried during {} → Staggered", self.state.name()));
        self.state = EnemyState::Staggered { elapsed: 0.0 };
        anim.trigger(AnimationTrigger::GetHit);
        true
    }

    /// `onKilled()`: терминально, повторный вызов: no-op.
    pub fn on_killed(&mut self, anim: &mut AnimationRequests) -> bool {
        if self.is_dead() {
            return false;
        }
        crate::log_info(&format!("☠️ Enemy: killed during {}", self.state.name()));
        self.state = EnemyState::Dead {
            elapsed: 0.0,
            removal_requested: false,
        };
        anim.trigger(AnimationTrigger::IsDead);
        true
    }

    pub fn strike_active(&self) -> bool {
        match self.state {
            EnemyState::Attacking { elapsed } => {
                elapsed >= self.config.strike_start && elapsed < self.config.strike_end
            }
            _ => false,
        }
    }
}

//! Player action state machine
//!
//! Один enum вместо набора флагов (attacking / dodging / guarding / parrying / skill):
//! невозможные комбинации не представимы. Каждая timed-последовательность:
//! состояние с `elapsed`, продвигаемое на scaled `dt` каждый тик.
//!
//! # Порядок внутри `tick`
//! 1. stagger countdown
//! 2. advance активного timed состояния (+dt → проверка конца фазы → motion)
//! 3. guard (level): вход/выход из Guarding
//! 4. edges: Dodge → Attack/Parry → Skill
//! 5. locomotion (Idle / Locomotion / Guarding)
//! 6. gravity
//!
//! Действие, начатое на тике k, имеет `elapsed = 0` на тике k и уже делает первый шаг.

use bevy::prelude::*;

use super::config::PlayerConfig;
use crate::combat::DefenseStance;
use crate::components::{yaw_towards, AnimationRequests, AnimationTrigger, CooldownTimer, PlayerInput};
use crate::error::Result;
use crate::logger;

/// Фаза атаки/скилла: короткий homing step → recovery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum AttackPhase {
    HomingStep,
    Recovery,
}

/// Активное действие игрока (ровно одно за тик).
#[derive(Debug, Clone, Copy, PartialEq, Default, Reflect)]
pub enum PlayerActionState {
    #[default]
    Idle,
    Locomotion,
    Dodging {
        dir: Vec3,
        elapsed: f32,
    },
    Attacking {
        phase: AttackPhase,
        elapsed: f32,
        /// Lock-on цель на момент старта (homing)
        target: Option<Entity>,
    },
    Guarding,
    Parrying {
        window_open: bool,
        elapsed: f32,
    },
    UsingSkill {
        phase: AttackPhase,
        elapsed: f32,
        target: Option<Entity>,
    },
    /// Терминальное (hit pipeline убил игрока)
    Dead,
}

impl PlayerActionState {
    pub fn name(&self) -> &'static str {
        match self {
            PlayerActionState::Idle => "Idle",
            PlayerActionState::Locomotion => "Locomotion",
            PlayerActionState::Dodging { .. } => "Dodging",
            PlayerActionState::Attacking { .. } => "Attacking",
            PlayerActionState::Guarding => "Guarding",
            PlayerActionState::Parrying { .. } => "Parrying",
            PlayerActionState::UsingSkill { .. } => "UsingSkill",
            PlayerActionState::Dead => "Dead",
        }
    }

    /// Новое действие может стартовать только отсюда.
    pub fn is_free(&self) -> bool {
        matches!(self, PlayerActionState::Idle | PlayerActionState::Locomotion)
    }

    /// Timed-действие, во время которого locomotion input игнорируется.
    pub fn is_busy(&self) -> bool {
        matches!(
            self,
            PlayerActionState::Dodging { .. }
                | PlayerActionState::Attacking { .. }
                | PlayerActionState::Parrying { .. }
                | PlayerActionState::UsingSkill { .. }
        )
    }
}

/// Lock-on цель глазами state machine: entity + root position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LockOnView {
    pub target: Entity,
    pub position: Vec3,
}

/// Всё, что контроллер читает из мира за тик.
#[derive(Debug, Clone, Copy)]
pub struct PlayerTickContext {
    /// Scaled dt (0 во время hitstop)
    pub dt: f32,
    /// Unscaled simulation time (cooldowns)
    pub now: f64,
    pub position: Vec3,
    pub rotation: Quat,
    pub grounded: bool,
    pub lock_on: Option<LockOnView>,
    /// Позиция цели, захваченной активной атакой/скиллом (None: цели больше нет)
    pub action_target: Option<Vec3>,
}

impl PlayerTickContext {
    pub fn new(dt: f32, now: f64, position: Vec3, rotation: Quat) -> Self {
        Self {
            dt,
            now,
            position,
            rotation,
            grounded: true,
            lock_on: None,
            action_target: None,
        }
    }
}

/// Результат тика: смещение для locomotion collaborator + итоговая ориентация.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerMotion {
    pub translation: Vec3,
    pub rotation: Quat,
}

#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
#[require(PlayerInput)]
pub struct PlayerController {
    pub state: PlayerActionState,
    pub config: PlayerConfig,
    pub skill_cooldown: CooldownTimer,
    /// Movement lock после пропущенного удара
    pub stagger_remaining: f32,
    pub vertical_velocity: f32,
    /// Guard input (level) на последнем тике
    pub guard_held: bool,
}

impl Default for PlayerController {
    fn default() -> Self {
        Self::new(PlayerConfig::default())
    }
}

/// Рабочее состояние одного тика (накопленное смещение + ориентация).
struct Step {
    translation: Vec3,
    rotation: Quat,
}

impl PlayerController {
    pub fn new(config: PlayerConfig) -> Self {
        Self {
            state: PlayerActionState::Idle,
            config,
            skill_cooldown: CooldownTimer::default(),
            stagger_remaining: 0.0,
            vertical_velocity: 0.0,
            guard_held: false,
        }
    }

    /// Как `new`, но отвергает невалидные тайминги.
    pub fn try_new(config: PlayerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(config))
    }

    pub fn is_dead(&self) -> bool {
        matches!(self.state, PlayerActionState::Dead)
    }

    pub fn is_staggered(&self) -> bool {
        self.stagger_remaining > 0.0
    }

    /// Entity, захваченная активной атакой/скиллом.
    pub fn action_target(&self) -> Option<Entity> {
        match self.state {
            PlayerActionState::Attacking { target, .. } | PlayerActionState::UsingSkill { target, .. } => {
                target
            }
            _ => None,
        }
    }

    /// `onTick(dt, input)`
    pub fn tick(
        &mut self,
        ctx: &PlayerTickContext,
        input: &PlayerInput,
        anim: &mut AnimationRequests,
    ) -> PlayerMotion {
        let mut step = Step {
            translation: Vec3::ZERO,
            rotation: ctx.rotation,
        };

        if !self.is_dead() {
            if self.stagger_remaining > 0.0 {
                self.stagger_remaining = (self.stagger_remaining - ctx.dt).max(0.0);
            }

            self.advance_action(ctx, &mut step);
            self.update_guard(input);

            if !self.is_staggered() {
                if input.dodge {
                    self.start_dodge(ctx, input, anim, &mut step);
                }
                if input.attack {
                    self.start_attack_or_parry(ctx, anim, &mut step);
                }
                if input.skill {
                    self.start_skill(ctx, anim, &mut step);
                }
            }

            self.locomotion(ctx, input, anim, &mut step);
            anim.guard = self.guard_animation();
        }

        self.apply_gravity(ctx, &mut step);

        PlayerMotion {
            translation: step.translation,
            rotation: step.rotation,
        }
    }

    // ------------------------------------------------------------------
    // Timed states
    // ------------------------------------------------------------------

    fn advance_action(&mut self, ctx: &PlayerTickContext, step: &mut Step) {
        let dt = ctx.dt;
        match self.state {
            PlayerActionState::Dodging { dir, elapsed } => {
                let elapsed = elapsed + dt;
                if elapsed >= self.config.dodge_duration {
                    self.finish_action("Dodge");
                } else {
                    self.state = PlayerActionState::Dodging { dir, elapsed };
                    self.dodge_step(dir, dt, step);
                }
            }
            PlayerActionState::Attacking { elapsed, target, .. } => {
                let elapsed = elapsed + dt;
                if elapsed >= self.config.attack_duration {
                    self.finish_action("Attack");
                } else if elapsed < self.config.attack_step_duration {
                    self.state = PlayerActionState::Attacking {
                        phase: AttackPhase::HomingStep,
                        elapsed,
                        target,
                    };
                    self.homing_step(
                        ctx,
                        ctx.action_target,
                        self.config.attack_rotation_speed,
                        self.config.attack_step_speed(),
                        step,
                    );
                } else {
                    self.state = PlayerActionState::Attacking {
                        phase: AttackPhase::Recovery,
                        elapsed,
                        target,
                    };
                }
            }
            PlayerActionState::UsingSkill { elapsed, target, .. } => {
                let elapsed = elapsed + dt;
                if elapsed >= self.config.skill_duration {
                    self.finish_action("Skill");
                } else if elapsed < self.config.skill_step_time {
                    self.state = PlayerActionState::UsingSkill {
                        phase: AttackPhase::HomingStep,
                        elapsed,
                        target,
                    };
                    self.homing_step(
                        ctx,
                        ctx.action_target,
                        self.config.skill_rotation_speed(),
                        self.config.skill_step_speed(),
                        step,
                    );
                } else {
                    self.state = PlayerActionState::UsingSkill {
                        phase: AttackPhase::Recovery,
                        elapsed,
                        target,
                    };
                }
            }
            PlayerActionState::Parrying { elapsed, .. } => {
                let elapsed = elapsed + dt;
                if elapsed >= self.config.parry_cooldown {
                    self.finish_action("Parry");
                } else {
                    self.state = PlayerActionState::Parrying {
                        window_open: elapsed < self.config.parry_window,
                        elapsed,
                    };
                }
            }
            _ => {}
        }
    }

    fn finish_action(&mut self, action: &str) {
        logger::log(&format!("🎮 Player: {} finished → Idle", action));
        self.state = PlayerActionState::Idle;
    }

    fn dodge_step(&self, dir: Vec3, dt: f32, step: &mut Step) {
        step.translation += dir * self.config.dodge_speed * dt;
        step.translation += Vec3::NEG_Y * self.config.dodge_down_force * dt;
    }

    /// Homing: если цель в `homing_range`: довернуть к ней и шагнуть вперёд,
    /// пока дальше `min_contact_distance`.
    fn homing_step(
        &self,
        ctx: &PlayerTickContext,
        target: Option<Vec3>,
        rotation_speed: f32,
        step_speed: f32,
        step: &mut Step,
    ) {
        let Some(target) = target else {
            return;
        };
        let distance = ctx.position.distance(target);
        if distance > self.config.homing_range {
            return;
        }

        if let Some(look) = yaw_towards(target - ctx.position) {
            step.rotation = step.rotation.slerp(look, (rotation_speed * ctx.dt).min(1.0));
        }
        if distance > self.config.min_contact_distance {
            step.translation += (step.rotation * Vec3::NEG_Z) * step_speed * ctx.dt;
        }
    }

    // ------------------------------------------------------------------
    // Guard (level-triggered)
    // ------------------------------------------------------------------

    fn update_guard(&mut self, input: &PlayerInput) {
        self.guard_held = input.guard;
        match self.state {
            PlayerActionState::Guarding if !input.guard => {
                logger::log("🛡️ Player: guard released");
                self.state = PlayerActionState::Idle;
            }
            state if state.is_free() && input.guard && !self.is_staggered() => {
                logger::log("🛡️ Player: guard raised");
                self.state = PlayerActionState::Guarding;
            }
            _ => {}
        }
    }

    fn guard_animation(&self) -> bool {
        match self.state {
            PlayerActionState::Guarding => true,
            PlayerActionState::Parrying { .. } => self.guard_held,
            _ => false,
        }
    }

    // ------------------------------------------------------------------
    // Action starts
    // ------------------------------------------------------------------

    /// Dodge: отвергается во время Attack (и любого другого timed действия),
    /// Guarding сначала снимается, потом стартует рывок.
    fn start_dodge(
        &mut self,
        ctx: &PlayerTickContext,
        input: &PlayerInput,
        anim: &mut AnimationRequests,
        step: &mut Step,
    ) -> bool {
        if self.is_dead() || self.is_staggered() {
            return false;
        }
        match self.state {
            PlayerActionState::Guarding => {
                logger::log("🛡️ Player: guard cancelled by dodge");
                self.state = PlayerActionState::Idle;
            }
            state if state.is_free() => {}
            state => {
                logger::log(&format!("🎮 Player: dodge rejected ({})", state.name()));
                return false;
            }
        }

        // Strafe определяется уже после снятия guard: остаётся только lock-on
        let strafe = ctx.lock_on.is_some();

        let has_input = input.move_axis.length_squared() >= 0.01;
        let snap = if has_input {
            input.move_axis.normalize()
        } else {
            Vec2::Y
        };
        let dir = if has_input {
            let forward = input.camera_facing();
            let right = forward.cross(Vec3::Y);
            (forward * snap.y + right * snap.x).normalize_or_zero()
        } else {
            step.rotation * Vec3::NEG_Z
        };

        anim.input_x = snap.x;
        anim.input_y = snap.y;
        anim.trigger(AnimationTrigger::Dodge);

        if !strafe {
            if let Some(look) = yaw_towards(dir) {
                step.rotation = look;
            }
        }

        logger::log(&format!(
            "💨 Player: dodge dir=({:.2}, {:.2}) strafe={}",
            dir.x, dir.z, strafe
        ));
        self.state = PlayerActionState::Dodging { dir, elapsed: 0.0 };
        self.dodge_step(dir, ctx.dt, step);
        true
    }

    /// Attack input: из Guarding → Parry, из Idle/Locomotion → Attack.
    fn start_attack_or_parry(
        &mut self,
        ctx: &PlayerTickContext,
        anim: &mut AnimationRequests,
        step: &mut Step,
    ) -> bool {
        if self.is_dead() || self.is_staggered() {
            return false;
        }
        match self.state {
            PlayerActionState::Guarding => {
                anim.input_x = 0.0;
                anim.input_y = 0.0;
                anim.trigger(AnimationTrigger::Parry);
                logger::log("🛡️ Player: parry window open");
                self.state = PlayerActionState::Parrying {
                    window_open: true,
                    elapsed: 0.0,
                };
                true
            }
            state if state.is_free() => {
                let target = ctx.lock_on.map(|lock| lock.target);
                anim.input_x = 0.0;
                anim.input_y = 0.0;
                anim.trigger(AnimationTrigger::Attack);
                logger::log(&format!("⚔️ Player: attack (homing target {:?})", target));
                self.state = PlayerActionState::Attacking {
                    phase: AttackPhase::HomingStep,
                    elapsed: 0.0,
                    target,
                };
                self.homing_step(
                    ctx,
                    ctx.lock_on.map(|lock| lock.position),
                    self.config.attack_rotation_speed,
                    self.config.attack_step_speed(),
                    step,
                );
                true
            }
            state => {
                logger::log(&format!("🎮 Player: attack rejected ({})", state.name()));
                false
            }
        }
    }

    /// Skill: только из Idle/Locomotion и только при готовом cooldown.
    fn start_skill(
        &mut self,
        ctx: &PlayerTickContext,
        anim: &mut AnimationRequests,
        step: &mut Step,
    ) -> bool {
        if self.is_dead() || self.is_staggered() {
            return false;
        }
        if !self.state.is_free() {
            logger::log(&format!("🎮 Player: skill rejected ({})", self.state.name()));
            return false;
        }
        if !self.skill_cooldown.is_ready(ctx.now) {
            logger::log(&format!(
                "⏳ Player: skill on cooldown, {:.2}s left",
                self.skill_cooldown.remaining(ctx.now)
            ));
            return false;
        }

        self.skill_cooldown.start(ctx.now, self.config.skill_cooldown);
        let target = ctx.lock_on.map(|lock| lock.target);
        anim.zero_locomotion();
        anim.trigger(AnimationTrigger::Skill);
        logger::log_info(&format!("✨ Player: skill (homing target {:?})", target));
        self.state = PlayerActionState::UsingSkill {
            phase: AttackPhase::HomingStep,
            elapsed: 0.0,
            target,
        };
        self.homing_step(
            ctx,
            ctx.lock_on.map(|lock| lock.position),
            self.config.skill_rotation_speed(),
            self.config.skill_step_speed(),
            step,
        );
        true
    }

    // ------------------------------------------------------------------
    // Locomotion + gravity
    // ------------------------------------------------------------------

    fn locomotion(
        &mut self,
        ctx: &PlayerTickContext,
        input: &PlayerInput,
        anim: &mut AnimationRequests,
        step: &mut Step,
    ) {
        if self.state.is_busy() {
            return;
        }
        if self.is_staggered() {
            anim.zero_locomotion();
            return;
        }

        let guarding = matches!(self.state, PlayerActionState::Guarding);
        let move_dir = if input.move_axis.length_squared() > 0.01 {
            input.camera_relative_move()
        } else {
            Vec3::ZERO
        };

        let speed = if guarding {
            self.config.guard_speed
        } else if input.run {
            self.config.run_speed
        } else {
            self.config.walk_speed
        };
        step.translation += move_dir * speed * ctx.dt;

        let turn = (self.config.rotation_speed * ctx.dt).min(1.0);
        if ctx.lock_on.is_some() || guarding {
            // Strafe: лицом к цели (или по камере), оси в animator как есть
            let facing = match ctx.lock_on {
                Some(lock) => lock.position - ctx.position,
                None => input.camera_facing(),
            };
            if let Some(look) = yaw_towards(facing) {
                step.rotation = step.rotation.slerp(look, turn);
            }
            anim.set_strafe_axes(input.move_axis.x, input.move_axis.y);
        } else {
            if let Some(look) = yaw_towards(move_dir) {
                step.rotation = step.rotation.slerp(look, turn);
            }
            let mut forward = input.move_axis.length();
            if input.run {
                forward *= 2.0;
            }
            anim.set_forward_speed(forward);
        }

        if !guarding {
            self.state = if move_dir == Vec3::ZERO {
                PlayerActionState::Idle
            } else {
                PlayerActionState::Locomotion
            };
        }
    }

    fn apply_gravity(&mut self, ctx: &PlayerTickContext, step: &mut Step) {
        if ctx.grounded && self.vertical_velocity < 0.0 {
            self.vertical_velocity = self.config.grounded_vertical_velocity;
        }
        self.vertical_velocity += self.config.gravity * ctx.dt;
        step.translation.y += self.vertical_velocity * ctx.dt;
    }

    // ------------------------------------------------------------------
    // Hit pipeline hooks
    // ------------------------------------------------------------------

    /// Текущая защитная стойка для классификации удара.
    pub fn defense_stance(&self) -> DefenseStance {
        match self.state {
            PlayerActionState::Parrying { window_open: true, .. } => DefenseStance::ParryWindow,
            PlayerActionState::Guarding => DefenseStance::Guarding,
            PlayerActionState::Parrying { window_open: false, .. } if self.guard_held => {
                DefenseStance::Guarding
            }
            _ => DefenseStance::Exposed,
        }
    }

    /// `onHit(damage)`: отменяет текущее действие и включает короткий stagger lock.
    pub fn on_hit(&mut self, damage: u32, anim: &mut AnimationRequests) -> bool {
        if self.is_dead() {
            return false;
        }
        logger::log(&format!(
            "💥 Player: hit for {} during {} → stagger {:.2}s",
            damage,
            self.state.name(),
            self.config.hit_stagger_duration
        ));
        self.state = PlayerActionState::Idle;
        self.stagger_remaining = self.config.hit_stagger_duration;
        anim.zero_locomotion();
        anim.trigger(AnimationTrigger::GetHit);
        true
    }

    /// Терминальный переход. Повторный вызов: no-op (false).
    pub fn on_killed(&mut self, anim: &mut AnimationRequests) -> bool {
        if self.is_dead() {
            return false;
        }
        logger::log_info("☠️ Player: killed");
        self.state = PlayerActionState::Dead;
        self.stagger_remaining = 0.0;
        anim.zero_locomotion();
        anim.guard = false;
        anim.trigger(AnimationTrigger::IsDead);
        true
    }

    /// Strike window активной атаки/скилла (включает WeaponHitbox).
    pub fn strike_active(&self) -> bool {
        match self.state {
            PlayerActionState::Attacking { elapsed, .. } => {
                elapsed >= self.config.attack_strike_start && elapsed < self.config.attack_strike_end
            }
            PlayerActionState::UsingSkill { elapsed, .. } => {
                elapsed >= self.config.skill_strike_start && elapsed < self.config.skill_strike_end
            }
            _ => false,
        }
    }
}

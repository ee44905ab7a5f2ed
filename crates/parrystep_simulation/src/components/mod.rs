//! ECS Components для боевых entity
//!
//! Организация по доменам:
//! - actor: команда и здоровье (Actor, Team, Health)
//! - animation: запросы к animator'у (AnimationRequests, AnimationTrigger)
//! - movement: locomotion collaborator (LocomotionIntent, LocomotionState, NavAgent)
//! - cooldown: монотонный cooldown stamp (CooldownTimer)
//! - input: input contract игрока (PlayerInput)

pub mod actor;
pub mod animation;
pub mod cooldown;
pub mod input;
pub mod movement;

// Re-exports для удобного импорта
pub use actor::*;
pub use animation::*;
pub use cooldown::*;
pub use input::*;
pub use movement::*;

//! Physics / locomotion module
//!
//! Адаптеры locomotion collaborator: headless интегратор и Rapier character controller.

pub mod movement;

// Re-export основных типов
pub use movement::{
    drive_character_controllers, integrate_locomotion, kinematic_character_bundle,
    locomotion_delta, read_character_controller_output, HeadlessLocomotionPlugin,
    RapierLocomotionPlugin, SubmittedStep,
};

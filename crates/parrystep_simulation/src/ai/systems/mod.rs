//! AI systems

pub mod fsm;

// Re-export all systems
pub use fsm::*;

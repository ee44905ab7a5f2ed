//! Combat systems

pub mod resolution;


pub use resolution::resolve_hits;

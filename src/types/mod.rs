// Treemark shared type definitions
// Each submodule defines types used across the engine.

pub mod errors;
pub mod node;
pub mod patch;

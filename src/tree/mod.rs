//! The bookmark tree engine: canonical shape, self-healing repair,
//! recursive lookup primitives and structural edit operations.

pub mod codec;
pub mod id;
pub mod index;
pub mod mutator;
pub mod repair;

//! Deterministic simulation module
//!
//! All swarm behavior lives here. This module must be pure and deterministic:
//! - Driven only by the caller's `(now, elapsed)` clock
//! - Seeded RNG only
//! - Stable iteration order (by insertion, entities carry stable ids)
//! - No rendering or platform dependencies

pub mod logo;
pub mod rect;
pub mod step;
pub mod world;

pub use logo::{Logo, SpriteId};
pub use rect::{Rect, same_signs};
pub use step::step;
pub use world::{Pose, World};

//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only (one call to `tick` = one step)
//! - Seeded RNG only
//! - Stable iteration order (obstacles ordered by x, oldest first)
//! - No rendering, persistence or platform dependencies

pub mod collision;
pub mod obstacle;
pub mod physics;
pub mod state;
pub mod tick;

pub use collision::{Aabb, body_hitbox, collides, in_collision_window};
pub use obstacle::{GapGenerator, Obstacle, ObstacleField, ObstacleId};
pub use physics::integrate;
pub use state::{Body, EndCause, GameEvent, GamePhase, GameState};
pub use tick::{TickInput, tick};

//! Game state and core simulation types
//!
//! Everything the tick mutates lives here. Presentation reads it through
//! `RenderSnapshot`, never directly.

use serde::{Deserialize, Serialize};

use super::obstacle::{ObstacleField, ObstacleId};
use crate::settings::Settings;

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Pre-game / menu
    #[default]
    Idle,
    /// Simulation running
    Active,
    /// Run ended, simulation frozen
    Ended,
}

/// Why a session ended. Only used for logging; outward events are uniform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndCause {
    Ground,
    Ceiling,
    Obstacle(ObstacleId),
    /// Ended from outside the tick (quit, shutdown)
    Requested,
}

/// Something the tick did that collaborators care about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// A pending flap was applied this tick
    Flapped,
    /// An obstacle crossed the scoring line
    Scored { obstacle: ObstacleId, score: u32 },
    /// The session transitioned to `Ended`
    Ended { cause: EndCause, score: u32 },
}

/// The flapping body. Its x is fixed at `Settings::body_x`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Body {
    /// Top edge, screen coordinates (down is positive)
    pub y: f32,
    /// Per-tick vertical velocity (negative is upward)
    pub velocity: f32,
}

impl Body {
    pub fn at(y: f32) -> Self {
        Self { y, velocity: 0.0 }
    }
}

/// Complete simulation state (deterministic for a given seed and input stream)
#[derive(Debug, Clone)]
pub struct GameState {
    pub phase: GamePhase,
    /// Obstacles passed this session
    pub score: u32,
    pub body: Body,
    pub field: ObstacleField,
    /// Ticks since the session started
    pub time_ticks: u64,
    /// Seed of the current session's obstacle stream
    pub seed: u64,
}

impl GameState {
    /// Idle state with an empty field
    pub fn new(seed: u64) -> Self {
        Self {
            phase: GamePhase::Idle,
            score: 0,
            body: Body::default(),
            field: ObstacleField::new(seed),
            time_ticks: 0,
            seed,
        }
    }

    /// Begin a new session: reset body, score and field, go `Active`.
    ///
    /// Only valid from `Idle` or `Ended`; returns false (no-op) otherwise.
    pub fn start(&mut self, settings: &Settings, seed: u64) -> bool {
        if self.phase == GamePhase::Active {
            return false;
        }
        self.seed = seed;
        self.score = 0;
        self.time_ticks = 0;
        self.body = Body::at(settings.start_y());
        self.field.reset(settings, seed);
        self.phase = GamePhase::Active;
        true
    }

    /// Transition to `Ended`. Idempotent: only the first call returns true.
    pub fn end(&mut self) -> bool {
        if self.phase != GamePhase::Active {
            return false;
        }
        self.phase = GamePhase::Ended;
        true
    }

    pub fn is_active(&self) -> bool {
        self.phase == GamePhase::Active
    }
}

//! Flapper - a side-scrolling flap-through-the-gaps game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, obstacles, collisions, game state)
//! - `session`: Session state machine wiring the sim to its collaborators
//! - `clock`: Fixed-rate tick scheduler
//! - `runner`: Threaded game loop combining session and clock
//! - `highscores`: Best score persistence
//! - `feedback`: Haptic/audio event sink
//! - `snapshot`: Read-only render snapshots for presentation
//! - `settings`: Data-driven game tuning

pub mod clock;
pub mod error;
pub mod feedback;
pub mod highscores;
pub mod runner;
pub mod session;
pub mod settings;
pub mod sim;
pub mod snapshot;

pub use clock::Clock;
pub use error::{ClockError, ConfigError, Error, FeedbackError, StoreError};
pub use feedback::{FeedbackEvent, FeedbackSink, Haptic, LogFeedback, NullFeedback};
pub use highscores::{BestScore, JsonFileScoreStore, MemoryScoreStore, ScoreStore};
pub use runner::Game;
pub use session::{FlapHandle, Session};
pub use settings::Settings;
pub use snapshot::{ObstacleView, PresentationSink, RenderSnapshot};

/// Game configuration constants
pub mod consts {
    /// Logical simulation rate (ticks per second)
    pub const SIM_HZ: u32 = 60;

    /// Default logical screen size
    pub const SCREEN_WIDTH: f32 = 400.0;
    pub const SCREEN_HEIGHT: f32 = 800.0;

    /// Body (the flapping player) defaults
    pub const BODY_SIZE: f32 = 50.0;
    pub const BODY_X: f32 = 100.0;
    /// Distance above screen middle where the body starts
    pub const BODY_START_OFFSET: f32 = 150.0;

    /// Per-tick downward acceleration
    pub const GRAVITY: f32 = 0.6;
    /// Velocity set (not added) by a flap - negative is upward
    pub const FLAP_STRENGTH: f32 = -12.0;

    /// Obstacle defaults
    pub const OBSTACLE_WIDTH: f32 = 60.0;
    pub const GAP_SIZE: f32 = 220.0;
    pub const MIN_GAP_TOP: f32 = 120.0;
    /// Horizontal scroll per tick
    pub const SCROLL_SPEED: f32 = 3.0;

    /// Height of the ground strip at the bottom of the screen
    pub const GROUND_BAND: f32 = 80.0;
    /// Inward hitbox shrink applied to the body
    pub const COLLISION_PADDING: f32 = 8.0;

    /// Obstacle trailing edge must cross this x to score
    pub const SCORING_LINE: f32 = 90.0;
    /// Obstacles are retired once fully this far past the left edge
    pub const RETIRE_MARGIN: f32 = 50.0;
    /// Spawn when the newest obstacle is this far inside the right edge
    pub const SPAWN_THRESHOLD: f32 = 250.0;
    /// New obstacles appear this far past the right edge
    pub const SPAWN_OFFSET: f32 = 50.0;
    /// First seeded obstacle sits this far past the right edge
    pub const FIRST_OBSTACLE_OFFSET: f32 = 100.0;

    /// Maximum visual tilt of the body (degrees)
    pub const MAX_TILT_DEGREES: f32 = 30.0;
}

//! Error types
//!
//! The simulation itself never fails; these cover configuration, persistence
//! and the clock thread.

use std::path::PathBuf;

use thiserror::Error;

/// Invalid tuning values. Fatal at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{field} must be a finite number (got {value})")]
    NotFinite { field: &'static str, value: f32 },

    #[error("{field} must be positive (got {value})")]
    NotPositive { field: &'static str, value: f32 },

    #[error("flap_strength must be negative (upward), got {0}")]
    FlapNotUpward(f32),

    #[error("gap does not fit the playable band: max gap top {max_gap_top} < min gap top {min_gap_top}")]
    GapDoesNotFit { min_gap_top: f32, max_gap_top: f32 },

    #[error("collision_padding {padding} leaves no hitbox for body_size {body_size}")]
    PaddingTooLarge { padding: f32, body_size: f32 },

    #[error("start height {start_y} is outside the playable band (0, {ground_y})")]
    StartOutOfBounds { start_y: f32, ground_y: f32 },

    #[error(
        "spawn_offset {spawn_offset} + spawn_threshold {spawn_threshold} must cover one scroll step of {scroll_speed}"
    )]
    SpawnTooEager {
        spawn_offset: f32,
        spawn_threshold: f32,
        scroll_speed: f32,
    },

    #[error("tick_hz must be at least 1")]
    ZeroTickRate,

    #[error("failed to read settings from {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse settings from {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Best score persistence failures. Always recovered locally.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("score store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("score store data is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("score store unavailable: {0}")]
    Unavailable(String),
}

/// Haptic/audio device failures. Ignored by the session.
#[derive(Debug, Error)]
#[error("feedback device unavailable: {0}")]
pub struct FeedbackError(pub String);

/// Clock thread failures.
#[derive(Debug, Error)]
pub enum ClockError {
    #[error("failed to spawn clock thread: {0}")]
    Spawn(#[source] std::io::Error),
}

/// Application-level error for the launcher.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Clock(#[from] ClockError),

    #[error("terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

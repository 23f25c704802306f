//! Game tuning
//!
//! Loaded from a JSON file; every field falls back to its default when absent.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

/// Simulation tuning values (world units are logical pixels, rates per tick)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === World ===
    /// Visible width
    pub width: f32,
    /// Visible height, including the ground band
    pub height: f32,
    /// Ground strip at the bottom, not playable
    pub ground_band: f32,

    // === Body ===
    pub body_size: f32,
    /// Fixed horizontal position of the body's left edge
    pub body_x: f32,
    /// Start height is `height / 2 - start_offset`
    pub start_offset: f32,
    pub gravity: f32,
    pub flap_strength: f32,
    /// Inward shrink of the body's hitbox
    pub collision_padding: f32,

    // === Obstacles ===
    pub obstacle_width: f32,
    pub gap_size: f32,
    pub min_gap_top: f32,
    pub scroll_speed: f32,
    pub scoring_line: f32,
    pub retire_margin: f32,
    pub spawn_threshold: f32,
    pub spawn_offset: f32,
    pub first_obstacle_offset: f32,

    // === Timing ===
    pub tick_hz: u32,

    /// Fixed seed for reproducible runs; entropy when unset
    pub seed: Option<u64>,

    /// Where the best score lives; platform data dir when unset
    pub best_score_path: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            width: SCREEN_WIDTH,
            height: SCREEN_HEIGHT,
            ground_band: GROUND_BAND,

            body_size: BODY_SIZE,
            body_x: BODY_X,
            start_offset: BODY_START_OFFSET,
            gravity: GRAVITY,
            flap_strength: FLAP_STRENGTH,
            collision_padding: COLLISION_PADDING,

            obstacle_width: OBSTACLE_WIDTH,
            gap_size: GAP_SIZE,
            min_gap_top: MIN_GAP_TOP,
            scroll_speed: SCROLL_SPEED,
            scoring_line: SCORING_LINE,
            retire_margin: RETIRE_MARGIN,
            spawn_threshold: SPAWN_THRESHOLD,
            spawn_offset: SPAWN_OFFSET,
            first_obstacle_offset: FIRST_OBSTACLE_OFFSET,

            tick_hz: SIM_HZ,

            seed: None,
            best_score_path: None,
        }
    }
}

impl Settings {
    /// Load settings from a JSON file and validate them
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let settings: Settings =
            serde_json::from_str(&json).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        settings.validate()?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Highest allowed gap top so gap plus margins stay inside the playable band
    pub fn max_gap_top(&self) -> f32 {
        self.height - self.gap_size - self.min_gap_top - self.ground_band
    }

    /// Body y at or past this touches the ground
    pub fn ground_y(&self) -> f32 {
        self.height - self.ground_band - self.body_size
    }

    /// Body y at session start
    pub fn start_y(&self) -> f32 {
        self.height / 2.0 - self.start_offset
    }

    /// Fixed tick period
    pub fn tick_period(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.tick_hz.max(1)))
    }

    /// Reject tuning that would break simulation invariants
    pub fn validate(&self) -> Result<(), ConfigError> {
        let all = [
            ("width", self.width),
            ("height", self.height),
            ("ground_band", self.ground_band),
            ("body_size", self.body_size),
            ("body_x", self.body_x),
            ("start_offset", self.start_offset),
            ("gravity", self.gravity),
            ("flap_strength", self.flap_strength),
            ("collision_padding", self.collision_padding),
            ("obstacle_width", self.obstacle_width),
            ("gap_size", self.gap_size),
            ("min_gap_top", self.min_gap_top),
            ("scroll_speed", self.scroll_speed),
            ("scoring_line", self.scoring_line),
            ("retire_margin", self.retire_margin),
            ("spawn_threshold", self.spawn_threshold),
            ("spawn_offset", self.spawn_offset),
            ("first_obstacle_offset", self.first_obstacle_offset),
        ];
        // JSON numbers past f32::MAX parse as infinity
        if let Some((field, value)) = all.into_iter().find(|(_, v)| !v.is_finite()) {
            return Err(ConfigError::NotFinite { field, value });
        }

        let positive = [
            ("width", self.width),
            ("height", self.height),
            ("body_size", self.body_size),
            ("gravity", self.gravity),
            ("obstacle_width", self.obstacle_width),
            ("gap_size", self.gap_size),
            ("scroll_speed", self.scroll_speed),
        ];
        for (field, value) in positive {
            if value <= 0.0 {
                return Err(ConfigError::NotPositive { field, value });
            }
        }

        if !(self.flap_strength < 0.0) {
            return Err(ConfigError::FlapNotUpward(self.flap_strength));
        }

        let max_gap_top = self.max_gap_top();
        if !max_gap_top.is_finite() || max_gap_top < self.min_gap_top {
            return Err(ConfigError::GapDoesNotFit {
                min_gap_top: self.min_gap_top,
                max_gap_top,
            });
        }

        if self.collision_padding * 2.0 >= self.body_size {
            return Err(ConfigError::PaddingTooLarge {
                padding: self.collision_padding,
                body_size: self.body_size,
            });
        }

        let (start_y, ground_y) = (self.start_y(), self.ground_y());
        if !(start_y > 0.0 && start_y < ground_y) {
            return Err(ConfigError::StartOutOfBounds { start_y, ground_y });
        }

        // A fresh obstacle must still sit beyond the threshold after one
        // scroll, or the field would spawn on every tick
        if self.spawn_offset + self.spawn_threshold < self.scroll_speed {
            return Err(ConfigError::SpawnTooEager {
                spawn_offset: self.spawn_offset,
                spawn_threshold: self.spawn_threshold,
                scroll_speed: self.scroll_speed,
            });
        }

        if self.tick_hz == 0 {
            return Err(ConfigError::ZeroTickRate);
        }

        Ok(())
    }
}

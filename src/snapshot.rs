//! Read-only render snapshots
//!
//! The session publishes one [`RenderSnapshot`] per tick. Presentation reads
//! it and derives anything visual (like tilt) without touching the sim.

use serde::{Deserialize, Serialize};

use crate::consts::MAX_TILT_DEGREES;
use crate::sim::{GamePhase, GameState, Obstacle, ObstacleId};

/// Obstacle as presentation sees it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObstacleView {
    pub id: ObstacleId,
    pub x: f32,
    pub gap_top: f32,
    pub gap_bottom: f32,
}

impl From<&Obstacle> for ObstacleView {
    fn from(o: &Obstacle) -> Self {
        Self {
            id: o.id,
            x: o.x,
            gap_top: o.gap_top,
            gap_bottom: o.gap_bottom,
        }
    }
}

/// Everything a frame needs, copied out of the simulation
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RenderSnapshot {
    pub phase: GamePhase,
    pub score: u32,
    pub best_score: u32,
    pub body_y: f32,
    pub body_velocity: f32,
    /// Ordered oldest (leftmost) first
    pub obstacles: Vec<ObstacleView>,
    /// Ended run beat the previous best
    pub new_record: bool,
    /// Ticks since the session started
    pub tick: u64,
}

impl RenderSnapshot {
    pub fn capture(state: &GameState, best_score: u32, new_record: bool) -> Self {
        Self {
            phase: state.phase,
            score: state.score,
            best_score,
            body_y: state.body.y,
            body_velocity: state.body.velocity,
            obstacles: state.field.iter().map(ObstacleView::from).collect(),
            new_record,
            tick: state.time_ticks,
        }
    }

    /// Visual nose tilt in degrees, positive is nose-down
    pub fn body_tilt_degrees(&self) -> f32 {
        (self.body_velocity * 2.0).clamp(-MAX_TILT_DEGREES, MAX_TILT_DEGREES)
    }
}

/// Consumer of per-tick snapshots (renderer, HUD, recorder)
pub trait PresentationSink: Send {
    fn present(&mut self, snapshot: &RenderSnapshot);
}

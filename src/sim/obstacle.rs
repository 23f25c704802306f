//! Obstacle field: spawning, scrolling, scoring and retirement
//!
//! Obstacles are created at the right, scroll left at a constant speed and are
//! dropped once fully past the left margin, so the field stays ordered by x
//! (oldest first) without sorting.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::settings::Settings;

/// Unique obstacle identity. Never reused, even across sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObstacleId(pub u64);

/// A pair of columns with a passable gap between them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: ObstacleId,
    /// Left edge
    pub x: f32,
    /// Bottom of the upper column
    pub gap_top: f32,
    /// Top of the lower column (`gap_top + gap_size`)
    pub gap_bottom: f32,
    /// Whether this obstacle has already awarded its point
    pub scored: bool,
}

impl Obstacle {
    /// Right edge
    #[inline]
    pub fn right(&self, width: f32) -> f32 {
        self.x + width
    }
}

/// Seeded source of gap heights
#[derive(Debug, Clone)]
pub struct GapGenerator {
    rng: Pcg32,
}

impl GapGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Uniform gap top in `[min_gap_top, max_gap_top]` for these settings
    pub fn gap_top(&mut self, settings: &Settings) -> f32 {
        let min = settings.min_gap_top;
        let max = settings.max_gap_top();
        // Settings::validate rejects max < min; stay total anyway
        if max <= min {
            return min;
        }
        self.rng.random_range(min..=max)
    }
}

/// The active obstacles of a session
#[derive(Debug, Clone)]
pub struct ObstacleField {
    obstacles: Vec<Obstacle>,
    gaps: GapGenerator,
    next_id: u64,
}

impl ObstacleField {
    pub fn new(seed: u64) -> Self {
        Self {
            obstacles: Vec::new(),
            gaps: GapGenerator::new(seed),
            next_id: 1,
        }
    }

    /// Drop every obstacle, reseed, and place the two opening obstacles
    pub fn reset(&mut self, settings: &Settings, seed: u64) {
        self.obstacles.clear();
        self.gaps = GapGenerator::new(seed);

        let first_x = settings.width + settings.first_obstacle_offset;
        self.spawn(first_x, settings);
        self.spawn(first_x + settings.width / 2.0, settings);
    }

    fn next_obstacle_id(&mut self) -> ObstacleId {
        let id = ObstacleId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Append an obstacle at `x` with a randomly drawn gap
    pub fn spawn(&mut self, x: f32, settings: &Settings) -> ObstacleId {
        let gap_top = self.gaps.gap_top(settings);
        self.spawn_with_gap(x, gap_top, settings)
    }

    /// Append an obstacle at `x` with a chosen gap top
    pub fn spawn_with_gap(&mut self, x: f32, gap_top: f32, settings: &Settings) -> ObstacleId {
        let id = self.next_obstacle_id();
        self.obstacles.push(Obstacle {
            id,
            x,
            gap_top,
            gap_bottom: gap_top + settings.gap_size,
            scored: false,
        });
        id
    }

    /// One tick of field movement. Returns the obstacles that scored, in order.
    ///
    /// 1. scroll everything left
    /// 2. award unscored obstacles whose right edge crossed the scoring line
    /// 3. retire obstacles fully past the left margin
    /// 4. spawn at the right when the newest obstacle has come far enough in
    pub fn update(&mut self, settings: &Settings) -> Vec<ObstacleId> {
        let width = settings.obstacle_width;
        let mut scored = Vec::new();

        for obstacle in &mut self.obstacles {
            obstacle.x -= settings.scroll_speed;

            if !obstacle.scored && obstacle.right(width) < settings.scoring_line {
                obstacle.scored = true;
                scored.push(obstacle.id);
            }
        }

        self.obstacles
            .retain(|o| o.right(width) > -settings.retire_margin);

        let spawn_line = settings.width - settings.spawn_threshold;
        let needs_spawn = self.obstacles.last().is_none_or(|o| o.x < spawn_line);
        if needs_spawn {
            let id = self.spawn(settings.width + settings.spawn_offset, settings);
            log::trace!("Spawned obstacle {:?}", id);
        }

        scored
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn iter(&self) -> impl Iterator<Item = &Obstacle> {
        self.obstacles.iter()
    }

    pub fn get(&self, id: ObstacleId) -> Option<&Obstacle> {
        self.obstacles.iter().find(|o| o.id == id)
    }

    /// Rightmost (newest) obstacle
    pub fn last(&self) -> Option<&Obstacle> {
        self.obstacles.last()
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }
}

//! Collision detection between the body and obstacles
//!
//! Everything is an axis-aligned rectangle. The body's hitbox is shrunk by
//! `collision_padding` on every side so grazing a column's sprite is forgiven.

use glam::Vec2;

use super::obstacle::Obstacle;
use crate::settings::Settings;

/// Axis-aligned bounding box in screen coordinates (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Box of `size` with top-left corner at `origin`
    pub fn from_origin_size(origin: Vec2, size: Vec2) -> Self {
        Self::new(origin, origin + size)
    }

    /// Shrink by `amount` on every side
    pub fn shrink(&self, amount: f32) -> Self {
        Self::new(self.min + Vec2::splat(amount), self.max - Vec2::splat(amount))
    }

    /// Whether horizontal extents touch or overlap
    #[inline]
    pub fn overlaps_x(&self, left: f32, right: f32) -> bool {
        !(self.max.x < left || self.min.x > right)
    }
}

/// Padded hitbox of the body with its top edge at `body_y`
pub fn body_hitbox(settings: &Settings, body_y: f32) -> Aabb {
    Aabb::from_origin_size(
        Vec2::new(settings.body_x, body_y),
        Vec2::splat(settings.body_size),
    )
    .shrink(settings.collision_padding)
}

/// Whether an obstacle's columns horizontally overlap the body's sprite.
/// Only these obstacles are handed to [`collides`].
#[inline]
pub fn in_collision_window(settings: &Settings, obstacle: &Obstacle) -> bool {
    obstacle.x < settings.body_x + settings.body_size
        && obstacle.right(settings.obstacle_width) > settings.body_x
}

/// Does the body at `body_y` hit either column of `obstacle`?
///
/// No horizontal overlap means no hit, whatever the height. Otherwise the
/// body hits when its padded top is above the gap or its padded bottom is
/// below it.
pub fn collides(settings: &Settings, body_y: f32, obstacle: &Obstacle) -> bool {
    let hitbox = body_hitbox(settings, body_y);

    if !hitbox.overlaps_x(obstacle.x, obstacle.right(settings.obstacle_width)) {
        return false;
    }

    hitbox.min.y < obstacle.gap_top || hitbox.max.y > obstacle.gap_bottom
}

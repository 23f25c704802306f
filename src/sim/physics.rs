//! Vertical physics for the body
//!
//! The world scrolls; the body only ever moves up and down.

use super::state::Body;

/// Advance the body by one tick.
///
/// A flap *replaces* the velocity with `flap_strength` and skips gravity for
/// that tick. Without a flap, gravity is added. Position then moves by the
/// new velocity.
#[inline]
pub fn integrate(body: &mut Body, flap: bool, gravity: f32, flap_strength: f32) {
    body.velocity = if flap {
        flap_strength
    } else {
        body.velocity + gravity
    };
    body.y += body.velocity;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{FLAP_STRENGTH, GRAVITY};
    use proptest::prelude::*;

    #[test]
    fn test_gravity_accumulates() {
        let mut body = Body::at(250.0);
        for _ in 0..10 {
            integrate(&mut body, false, GRAVITY, FLAP_STRENGTH);
        }
        // sum of i * g for i in 1..=10 = 55g
        assert!((body.velocity - 10.0 * GRAVITY).abs() < 1e-4);
        assert!((body.y - (250.0 + 55.0 * GRAVITY)).abs() < 1e-3);
    }

    #[test]
    fn test_flap_overrides_not_adds() {
        let mut body = Body {
            y: 300.0,
            velocity: 9.0,
        };
        integrate(&mut body, true, GRAVITY, FLAP_STRENGTH);
        assert_eq!(body.velocity, FLAP_STRENGTH);
        assert!((body.y - (300.0 + FLAP_STRENGTH)).abs() < 1e-4);

        // Already rising fast: flap still sets, never stacks
        let mut body = Body {
            y: 300.0,
            velocity: -20.0,
        };
        integrate(&mut body, true, GRAVITY, FLAP_STRENGTH);
        assert_eq!(body.velocity, FLAP_STRENGTH);
    }

    #[test]
    fn test_falls_once_velocity_positive() {
        let mut body = Body {
            y: 300.0,
            velocity: FLAP_STRENGTH,
        };
        let mut last_y = body.y;
        let mut last_v = body.velocity;
        for _ in 0..60 {
            integrate(&mut body, false, GRAVITY, FLAP_STRENGTH);
            assert!(body.velocity > last_v);
            if body.velocity > 0.0 {
                assert!(body.y > last_y);
            }
            last_y = body.y;
            last_v = body.velocity;
        }
    }

    proptest! {
        #[test]
        fn prop_flap_sets_exact_velocity(v in -50.0f32..50.0, y in 0.0f32..800.0) {
            let mut body = Body { y, velocity: v };
            integrate(&mut body, true, GRAVITY, FLAP_STRENGTH);
            prop_assert_eq!(body.velocity, FLAP_STRENGTH);
        }
    }
}

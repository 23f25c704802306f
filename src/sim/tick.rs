//! Fixed timestep simulation tick
//!
//! Core game loop step that advances the simulation deterministically.

use super::collision::{collides, in_collision_window};
use super::physics::integrate;
use super::state::{EndCause, GameEvent, GameState};
use crate::settings::Settings;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Flap requested since the previous tick
    pub flap: bool,
}

/// Advance the game state by one fixed timestep.
///
/// Does nothing outside `Active`. Leaving the playable band ends the session
/// before obstacles move or collisions are checked.
pub fn tick(state: &mut GameState, input: &TickInput, settings: &Settings) -> Vec<GameEvent> {
    let mut events = Vec::new();
    if !state.is_active() {
        return events;
    }

    state.time_ticks += 1;

    integrate(
        &mut state.body,
        input.flap,
        settings.gravity,
        settings.flap_strength,
    );
    if input.flap {
        events.push(GameEvent::Flapped);
    }

    let out_of_bounds = if state.body.y >= settings.ground_y() {
        Some(EndCause::Ground)
    } else if state.body.y <= 0.0 {
        Some(EndCause::Ceiling)
    } else {
        None
    };
    if let Some(cause) = out_of_bounds {
        end(state, cause, &mut events);
        return events;
    }

    for obstacle in state.field.update(settings) {
        state.score += 1;
        events.push(GameEvent::Scored {
            obstacle,
            score: state.score,
        });
    }

    let hit = state
        .field
        .iter()
        .filter(|o| in_collision_window(settings, o))
        .find(|o| collides(settings, state.body.y, o))
        .map(|o| o.id);
    if let Some(id) = hit {
        end(state, EndCause::Obstacle(id), &mut events);
    }

    events
}

fn end(state: &mut GameState, cause: EndCause, events: &mut Vec<GameEvent>) {
    if state.end() {
        events.push(GameEvent::Ended {
            cause,
            score: state.score,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::GamePhase;

    const FALL: TickInput = TickInput { flap: false };
    const FLAP: TickInput = TickInput { flap: true };

    fn active_state(settings: &Settings, seed: u64) -> GameState {
        let mut state = GameState::new(seed);
        state.start(settings, seed);
        state
    }

    #[test]
    fn test_idle_does_not_tick() {
        let settings = Settings::default();
        let mut state = GameState::new(1);
        assert!(tick(&mut state, &FLAP, &settings).is_empty());
        assert_eq!(state.time_ticks, 0);
        assert_eq!(state.phase, GamePhase::Idle);
    }

    #[test]
    fn test_ten_ticks_of_free_fall() {
        let settings = Settings::default();
        let mut state = active_state(&settings, 1);
        let start_y = settings.height / 2.0 - 150.0;
        assert_eq!(state.body.y, start_y);

        for _ in 0..10 {
            tick(&mut state, &FALL, &settings);
        }

        assert_eq!(state.phase, GamePhase::Active);
        assert!((state.body.velocity - 10.0 * settings.gravity).abs() < 1e-4);
        let expected = start_y + (1..=10).map(|i| i as f32 * settings.gravity).sum::<f32>();
        assert!((state.body.y - expected).abs() < 1e-3);
    }

    #[test]
    fn test_flap_event_and_override() {
        let settings = Settings::default();
        let mut state = active_state(&settings, 1);
        for _ in 0..5 {
            tick(&mut state, &FALL, &settings);
        }
        let events = tick(&mut state, &FLAP, &settings);
        assert_eq!(events, vec![GameEvent::Flapped]);
        assert_eq!(state.body.velocity, settings.flap_strength);
    }

    #[test]
    fn test_ground_ends_without_collision_check() {
        let settings = Settings::default();
        let mut state = active_state(&settings, 1);
        state.body.y = settings.ground_y() - 0.1;
        state.body.velocity = 0.0;
        // An obstacle sitting on the body whose gap is nowhere near it
        state.field.spawn_with_gap(settings.body_x, 120.0, &settings);
        let xs: Vec<f32> = state.field.iter().map(|o| o.x).collect();

        let events = tick(&mut state, &FALL, &settings);

        assert_eq!(state.phase, GamePhase::Ended);
        assert_eq!(
            events,
            vec![GameEvent::Ended {
                cause: EndCause::Ground,
                score: 0
            }]
        );
        // Field untouched that tick
        let after: Vec<f32> = state.field.iter().map(|o| o.x).collect();
        assert_eq!(xs, after);
    }

    #[test]
    fn test_ceiling_ends_session() {
        let settings = Settings::default();
        let mut state = active_state(&settings, 1);
        state.body.y = 5.0;
        let events = tick(&mut state, &FLAP, &settings);
        assert_eq!(state.phase, GamePhase::Ended);
        assert!(matches!(
            events.last(),
            Some(GameEvent::Ended {
                cause: EndCause::Ceiling,
                ..
            })
        ));
    }

    #[test]
    fn test_obstacle_hit_ends_once() {
        let settings = Settings::default();
        let mut state = active_state(&settings, 1);
        // Two columns over the body, both with gaps far below it
        let first = state.field.spawn_with_gap(settings.body_x + 3.0, 500.0, &settings);
        state.field.spawn_with_gap(settings.body_x + 10.0, 500.0, &settings);

        let events = tick(&mut state, &FALL, &settings);
        let ends: Vec<_> = events
            .iter()
            .filter(|e| matches!(e, GameEvent::Ended { .. }))
            .collect();
        assert_eq!(ends.len(), 1);
        assert_eq!(
            ends[0],
            &GameEvent::Ended {
                cause: EndCause::Obstacle(first),
                score: 0
            }
        );

        // Frozen afterwards
        let y = state.body.y;
        assert!(tick(&mut state, &FALL, &settings).is_empty());
        assert_eq!(state.body.y, y);
    }

    #[test]
    fn test_passing_through_gap_scores() {
        let settings = Settings::default();
        let mut state = active_state(&settings, 1);
        // Already over the body; free fall from 250 stays inside 230..450
        // while the columns overlap it
        let id = state
            .field
            .spawn_with_gap(settings.body_x - 10.0, 230.0, &settings);

        let mut scored = Vec::new();
        for _ in 0..25 {
            for event in tick(&mut state, &FALL, &settings) {
                if let GameEvent::Scored { obstacle, score } = event {
                    scored.push((obstacle, score));
                }
            }
        }

        assert_eq!(state.phase, GamePhase::Active);
        assert_eq!(scored, vec![(id, 1)]);
        assert_eq!(state.score, 1);
    }

    #[test]
    fn test_determinism() {
        // Same seed and inputs, same event stream and final state
        let settings = Settings::default();
        let mut state1 = active_state(&settings, 99999);
        let mut state2 = active_state(&settings, 99999);

        for i in 0..300u32 {
            let input = TickInput { flap: i % 18 == 0 };
            let e1 = tick(&mut state1, &input, &settings);
            let e2 = tick(&mut state2, &input, &settings);
            assert_eq!(e1, e2);
        }

        assert_eq!(state1.phase, state2.phase);
        assert_eq!(state1.time_ticks, state2.time_ticks);
        assert_eq!(state1.score, state2.score);
        assert_eq!(state1.body, state2.body);
        assert_eq!(state1.field.obstacles(), state2.field.obstacles());
    }
}
